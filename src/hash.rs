//! Keyed hash: SipHash-2-4 under the dictionary's secret.
//!
//! SipHash is a keyed pseudorandom function; without the secret an adversary
//! cannot predict bucket indices, so it cannot force the chains into the
//! degenerate single-bucket shape that makes chained tables quadratic.

use crate::secret::Secret;
use core::hash::Hasher;
use siphasher::sip::SipHasher24;

/// Bucket index for `key` under `secret`. `mask` must be `bucket_count - 1`
/// for a power-of-two bucket count, so masking equals the mod reduction.
#[inline]
pub(crate) fn bucket_index(key: &[u8], secret: &Secret, mask: u64) -> usize {
    let mut h = SipHasher24::new_with_key(secret.as_bytes());
    h.write(key);
    (h.finish() & mask) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: the index is a pure function of (key, secret, mask).
    #[test]
    fn deterministic_for_fixed_inputs() {
        let s = Secret::from_bytes([3u8; Secret::LEN]);
        let a = bucket_index(b"abcdefg\0", &s, 127);
        let b = bucket_index(b"abcdefg\0", &s, 127);
        assert_eq!(a, b);
    }

    /// Invariant: the masked index never exceeds the bucket range.
    #[test]
    fn index_respects_mask() {
        let s = Secret::from_bytes([9u8; Secret::LEN]);
        for i in 0u32..256 {
            let key = i.to_le_bytes();
            assert!(bucket_index(&key, &s, 7) < 8);
            assert_eq!(bucket_index(&key, &s, 0), 0);
        }
    }

    /// Different secrets must re-key the function: with 256 keys over 256
    /// buckets, two secrets producing identical placements for every key
    /// would mean the secret does not key the hash at all.
    #[test]
    fn secret_changes_placement() {
        let s1 = Secret::from_bytes([1u8; Secret::LEN]);
        let s2 = Secret::from_bytes([2u8; Secret::LEN]);
        let differing = (0u32..256)
            .filter(|i| {
                let key = i.to_le_bytes();
                bucket_index(&key, &s1, 255) != bucket_index(&key, &s2, 255)
            })
            .count();
        assert!(differing > 0);
    }
}
