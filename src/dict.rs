//! The dictionary: a power-of-two bucket table of record chains, indexed by
//! the secret-keyed hash.
//!
//! Every mutating operation takes `&mut self`, so a value borrow handed out
//! by [`Dict::get`] is statically ended before the next insert, removal, or
//! rehash can run; the compiler enforces the borrow-invalidation contract
//! rather than a runtime convention.

use crate::chain::{self, Chain};
use crate::hash::bucket_index;
use crate::secret::Secret;
use core::fmt;
use core::iter::repeat_with;

/// Insertion failures. Absence on lookup or removal is a normal outcome and
/// never surfaces here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertError {
    /// A record with this exact key already exists; the dictionary is
    /// unchanged.
    DuplicateKey,
    /// The key buffer does not match the dictionary's fixed key length.
    KeyLength { expected: usize, actual: usize },
    /// The value buffer does not match the dictionary's fixed value length.
    ValueLength { expected: usize, actual: usize },
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::DuplicateKey => f.write_str("key already present"),
            InsertError::KeyLength { expected, actual } => {
                write!(f, "key is {actual} bytes, dictionary stores {expected}")
            }
            InsertError::ValueLength { expected, actual } => {
                write!(f, "value is {actual} bytes, dictionary stores {expected}")
            }
        }
    }
}

impl std::error::Error for InsertError {}

/// Rehash failures. Only possible when a shrinking key length collapses two
/// previously distinct keys; the source dictionary is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RehashError {
    TruncatedKeyCollision,
}

impl fmt::Display for RehashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RehashError::TruncatedKeyCollision => {
                f.write_str("shrinking the key length collapsed two distinct keys")
            }
        }
    }
}

impl std::error::Error for RehashError {}

/// A fixed-record chained hash dictionary keyed by a secret.
///
/// All keys in one dictionary share one byte length, as do all values. The
/// bucket index of a key is its SipHash under the dictionary's secret,
/// reduced modulo the power-of-two bucket count.
#[derive(Clone)]
pub struct Dict {
    keylen: usize,
    vallen: usize,
    /// `bucket_count - 1`; bucket counts are powers of two by construction.
    mask: u64,
    secret: Secret,
    buckets: Vec<Chain>,
    len: usize,
}

impl Dict {
    /// Create an empty dictionary holding `keylen`-byte keys and
    /// `vallen`-byte values. `bucket_count` is rounded up to the next power
    /// of two (minimum 1). The secret is copied into dictionary-owned
    /// storage; the caller's copy is never retained or referenced again.
    pub fn new(keylen: usize, vallen: usize, bucket_count: usize, secret: &Secret) -> Self {
        let bucket_count = bucket_count.max(1).next_power_of_two();
        Dict {
            keylen,
            vallen,
            mask: (bucket_count - 1) as u64,
            secret: *secret,
            buckets: repeat_with(Chain::new).take(bucket_count).collect(),
            len: 0,
        }
    }

    /// Fixed key length in bytes.
    pub fn keylen(&self) -> usize {
        self.keylen
    }

    /// Fixed value length in bytes.
    pub fn vallen(&self) -> usize {
        self.vallen
    }

    /// Current bucket count; always a power of two.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn chain(&self, key: &[u8]) -> &Chain {
        &self.buckets[bucket_index(key, &self.secret, self.mask)]
    }

    /// Presence check: walk the key's bucket comparing full fixed-width key
    /// buffers. Performs no allocation and returns no data. A key whose
    /// length differs from [`Dict::keylen`] cannot be present and reports
    /// `false`.
    pub fn contains_key(&self, key: &[u8]) -> bool {
        key.len() == self.keylen && self.chain(key).find(key).is_some()
    }

    /// Borrowed lookup: the value bytes stored inside the record, or `None`
    /// on a miss. The borrow is tied to `&self`, so it cannot outlive the
    /// next mutating call.
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        if key.len() != self.keylen {
            return None;
        }
        self.chain(key).find(key).map(|rec| rec.value.as_ref())
    }

    /// Owned lookup: a freshly allocated copy of the value bytes, or `None`
    /// on a miss. The returned buffer never aliases dictionary storage and
    /// survives any later mutation.
    pub fn get_owned(&self, key: &[u8]) -> Option<Box<[u8]>> {
        self.get(key).map(Box::from)
    }

    /// Insert a record, copying both buffers into dictionary-owned storage.
    /// Fails without changing the dictionary if either buffer's length is
    /// wrong or a record with this key already exists.
    pub fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<(), InsertError> {
        if key.len() != self.keylen {
            return Err(InsertError::KeyLength {
                expected: self.keylen,
                actual: key.len(),
            });
        }
        if value.len() != self.vallen {
            return Err(InsertError::ValueLength {
                expected: self.vallen,
                actual: value.len(),
            });
        }
        let idx = bucket_index(key, &self.secret, self.mask);
        let chain = &mut self.buckets[idx];
        if chain.find(key).is_some() {
            return Err(InsertError::DuplicateKey);
        }
        chain.push(Box::from(key), Box::from(value));
        self.len += 1;
        Ok(())
    }

    /// Unlink and release the record matching `key`. Returns whether a
    /// record was removed; absence is a normal outcome.
    pub fn remove(&mut self, key: &[u8]) -> bool {
        if key.len() != self.keylen {
            return false;
        }
        let idx = bucket_index(key, &self.secret, self.mask);
        match self.buckets[idx].remove(key) {
            Some(_) => {
                self.len -= 1;
                true
            }
            None => false,
        }
    }

    /// Iterate over `(key, value)` byte slices of every record. Order is
    /// unspecified.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            buckets: self.buckets.iter(),
            chain: Chain::empty_iter(),
        }
    }

    /// Destructive, in-place rehash: re-bucket every record under a new
    /// bucket count (rounded up to a power of two) and a new secret,
    /// optionally changing the record geometry.
    ///
    /// When `new_keylen`/`new_vallen` equal the current lengths, records are
    /// re-linked into the new table without copying and the call cannot
    /// fail. When a length changes, record bytes are truncated or
    /// zero-padded to fit (see [`Dict::rehash_snapshot`] for the policy);
    /// the rebuilt table replaces the old one only on full success, so a
    /// failed rehash leaves the dictionary in its prior valid state.
    pub fn rehash(
        &mut self,
        new_keylen: usize,
        new_vallen: usize,
        new_bucket_count: usize,
        new_secret: &Secret,
    ) -> Result<(), RehashError> {
        let bucket_count = new_bucket_count.max(1).next_power_of_two();
        let mask = (bucket_count - 1) as u64;
        if new_keylen == self.keylen && new_vallen == self.vallen {
            let mut new_buckets: Vec<Chain> = repeat_with(Chain::new).take(bucket_count).collect();
            for old in self.buckets.iter_mut() {
                while let Some(rec) = old.pop() {
                    let idx = bucket_index(&rec.key, new_secret, mask);
                    new_buckets[idx].relink(rec);
                }
            }
            self.buckets = new_buckets;
        } else {
            self.buckets =
                self.rebucket_copy(new_keylen, new_vallen, bucket_count, mask, new_secret)?;
            self.keylen = new_keylen;
            self.vallen = new_vallen;
        }
        self.mask = mask;
        self.secret = *new_secret;
        Ok(())
    }

    /// Non-destructive snapshot rehash: build a wholly independent
    /// dictionary containing a copy of every record, re-bucketed under the
    /// new parameters. The source dictionary, and any value borrows taken
    /// from it, remain valid; no storage is shared between the two.
    ///
    /// Record geometry may change: bytes are truncated when the new length
    /// is shorter and zero-padded when longer, for keys and values alike.
    /// Growing preserves key distinctness; a shrink that collapses two keys
    /// fails with [`RehashError::TruncatedKeyCollision`] rather than
    /// silently dropping a record.
    pub fn rehash_snapshot(
        &self,
        new_keylen: usize,
        new_vallen: usize,
        new_bucket_count: usize,
        new_secret: &Secret,
    ) -> Result<Dict, RehashError> {
        let bucket_count = new_bucket_count.max(1).next_power_of_two();
        let mask = (bucket_count - 1) as u64;
        let buckets = self.rebucket_copy(new_keylen, new_vallen, bucket_count, mask, new_secret)?;
        Ok(Dict {
            keylen: new_keylen,
            vallen: new_vallen,
            mask,
            secret: *new_secret,
            buckets,
            len: self.len,
        })
    }

    /// Copy every record into a fresh bucket table under new parameters,
    /// leaving `self` untouched. Shared by the snapshot variant and the
    /// geometry-changing arm of the in-place variant.
    fn rebucket_copy(
        &self,
        keylen: usize,
        vallen: usize,
        bucket_count: usize,
        mask: u64,
        secret: &Secret,
    ) -> Result<Vec<Chain>, RehashError> {
        let mut buckets: Vec<Chain> = repeat_with(Chain::new).take(bucket_count).collect();
        for (key, value) in self.iter() {
            let key = resize_bytes(key, keylen);
            let value = resize_bytes(value, vallen);
            let idx = bucket_index(&key, secret, mask);
            let chain = &mut buckets[idx];
            // Equal keys land in the same bucket, so the target chain is the
            // only place a truncation collision can surface.
            if chain.find(&key).is_some() {
                return Err(RehashError::TruncatedKeyCollision);
            }
            chain.push(key, value);
        }
        Ok(buckets)
    }
}

impl fmt::Debug for Dict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dict")
            .field("keylen", &self.keylen)
            .field("vallen", &self.vallen)
            .field("bucket_count", &self.buckets.len())
            .field("len", &self.len)
            .field("secret", &self.secret)
            .finish()
    }
}

/// Truncate or zero-pad `src` to exactly `len` bytes.
fn resize_bytes(src: &[u8], len: usize) -> Box<[u8]> {
    let mut out = vec![0u8; len];
    let n = src.len().min(len);
    out[..n].copy_from_slice(&src[..n]);
    out.into_boxed_slice()
}

/// Iterator over every record's `(key, value)` slices, bucket by bucket.
pub struct Iter<'a> {
    buckets: core::slice::Iter<'a, Chain>,
    chain: chain::Iter<'a>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a [u8], &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(rec) = self.chain.next() {
                return Some((rec.key.as_ref(), rec.value.as_ref()));
            }
            self.chain = self.buckets.next()?.iter();
        }
    }
}
