//! Record storage: fixed-width records linked into per-bucket chains.
//!
//! A `Record` owns exactly `keylen` key bytes and `vallen` value bytes; the
//! chain owns every record linked into it, and a record belongs to exactly
//! one chain at a time. Length discipline is enforced one layer up, in
//! `dict`; this layer only stores and compares full buffers.
//!
//! Drop and clone walk the chain iteratively. A flooded table can put every
//! record into one chain, and recursive teardown of a chain that long would
//! overflow the stack.

pub(crate) struct Record {
    pub(crate) key: Box<[u8]>,
    pub(crate) value: Box<[u8]>,
    next: Option<Box<Record>>,
}

/// Head of one bucket's singly linked record chain. Intra-chain order is an
/// implementation detail; callers may only rely on set membership.
pub(crate) struct Chain {
    head: Option<Box<Record>>,
}

impl Chain {
    pub(crate) fn new() -> Self {
        Chain { head: None }
    }

    /// Walk the chain comparing full fixed-width key buffers.
    pub(crate) fn find(&self, key: &[u8]) -> Option<&Record> {
        self.iter().find(|rec| rec.key.as_ref() == key)
    }

    /// Link a freshly built record into the chain.
    pub(crate) fn push(&mut self, key: Box<[u8]>, value: Box<[u8]>) {
        self.relink(Box::new(Record {
            key,
            value,
            next: None,
        }));
    }

    /// Link an existing record into this chain. The record's previous chain
    /// must already have released ownership of it.
    pub(crate) fn relink(&mut self, mut rec: Box<Record>) {
        rec.next = self.head.take();
        self.head = Some(rec);
    }

    /// Unlink and return the record matching `key`, if any.
    pub(crate) fn remove(&mut self, key: &[u8]) -> Option<Box<Record>> {
        let mut cur = &mut self.head;
        loop {
            let matched = match cur.as_deref() {
                None => return None,
                Some(rec) => rec.key.as_ref() == key,
            };
            if matched {
                let mut rec = cur.take()?;
                *cur = rec.next.take();
                return Some(rec);
            }
            cur = &mut cur.as_mut()?.next;
        }
    }

    /// Detach one record from the chain, used to drain a bucket during an
    /// in-place rehash. Which record comes off first is unspecified.
    pub(crate) fn pop(&mut self) -> Option<Box<Record>> {
        let mut rec = self.head.take()?;
        self.head = rec.next.take();
        Some(rec)
    }

    pub(crate) fn iter(&self) -> Iter<'_> {
        Iter {
            cur: self.head.as_deref(),
        }
    }

    pub(crate) fn empty_iter() -> Iter<'static> {
        Iter { cur: None }
    }
}

impl Clone for Chain {
    fn clone(&self) -> Self {
        let mut out = Chain::new();
        let mut tail = &mut out.head;
        for rec in self.iter() {
            *tail = Some(Box::new(Record {
                key: rec.key.clone(),
                value: rec.value.clone(),
                next: None,
            }));
            tail = match tail.as_mut() {
                Some(rec) => &mut rec.next,
                None => unreachable!("tail was just linked"),
            };
        }
        out
    }
}

impl Drop for Chain {
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(mut rec) = next {
            next = rec.next.take();
        }
    }
}

pub(crate) struct Iter<'a> {
    cur: Option<&'a Record>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        let rec = self.cur?;
        self.cur = rec.next.as_deref();
        Some(rec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn k(n: u32) -> Box<[u8]> {
        Box::from(n.to_le_bytes().as_slice())
    }

    fn chain_of(keys: &[u32]) -> Chain {
        let mut c = Chain::new();
        for &n in keys {
            c.push(k(n), k(n + 100));
        }
        c
    }

    /// Invariant: every pushed record is findable with its exact key bytes
    /// and carries its exact value bytes; absent keys are not found.
    #[test]
    fn push_then_find() {
        let c = chain_of(&[1, 2, 3]);
        for n in [1u32, 2, 3] {
            let rec = c.find(&k(n)).expect("pushed record present");
            assert_eq!(rec.value, k(n + 100));
        }
        assert!(c.find(&k(4)).is_none());
    }

    /// Invariant: `remove` unlinks exactly the matching record, wherever it
    /// sits in the chain, and leaves the rest reachable.
    #[test]
    fn remove_any_position() {
        for victim in [1u32, 2, 3] {
            let mut c = chain_of(&[1, 2, 3]);
            let rec = c.remove(&k(victim)).expect("victim present");
            assert_eq!(rec.key, k(victim));
            assert!(c.find(&k(victim)).is_none());
            for survivor in [1u32, 2, 3] {
                if survivor != victim {
                    assert!(c.find(&k(survivor)).is_some());
                }
            }
        }
    }

    /// Invariant: `remove` of an absent key is a no-op returning None.
    #[test]
    fn remove_absent_is_noop() {
        let mut c = chain_of(&[1, 2]);
        assert!(c.remove(&k(9)).is_none());
        assert_eq!(c.iter().count(), 2);
    }

    /// Invariant: `pop` drains the chain record by record, yielding each
    /// record exactly once.
    #[test]
    fn pop_drains() {
        let mut c = chain_of(&[1, 2, 3]);
        let mut seen: Vec<Box<[u8]>> = Vec::new();
        while let Some(rec) = c.pop() {
            seen.push(rec.key.clone());
        }
        assert!(c.find(&k(1)).is_none());
        seen.sort();
        assert_eq!(seen, vec![k(1), k(2), k(3)]);
    }

    /// Invariant: clone is a deep copy; mutating the clone leaves the
    /// source chain untouched.
    #[test]
    fn clone_is_deep() {
        let c = chain_of(&[1, 2, 3]);
        let mut d = c.clone();
        d.remove(&k(2)).expect("present in clone");
        assert!(c.find(&k(2)).is_some());
        assert!(d.find(&k(2)).is_none());
        assert_eq!(c.iter().count(), 3);
        assert_eq!(d.iter().count(), 2);
    }

    /// Teardown and clone of a chain with hundreds of thousands of records
    /// must not recurse per record. This is the flooded-table shape: every
    /// record in one chain.
    #[test]
    fn deep_chain_drop_and_clone_are_iterative() {
        let mut c = Chain::new();
        for n in 0u32..262_144 {
            c.push(k(n), Box::from(&[][..]));
        }
        let d = c.clone();
        assert!(d.find(&k(0)).is_some());
        drop(c);
        drop(d);
    }
}
