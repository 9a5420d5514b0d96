//! Secret key material for the keyed hash.
//!
//! The dictionary's collision resistance against adversarial keys holds only
//! if this secret is unpredictable to the adversary. `Secret::generate` pulls
//! from the OS CSPRNG; `Secret::from_bytes` exists for deterministic,
//! reproducible dictionaries in tests. The dictionary always stores its own
//! copy and never inspects how the bytes were produced.

use core::fmt;
use rand::rngs::OsRng;
use rand::RngCore;

/// Opaque 128-bit key material parameterizing the hash function.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Secret([u8; Secret::LEN]);

impl Secret {
    /// Width of the hash function's key, in bytes (SipHash-2-4).
    pub const LEN: usize = 16;

    /// Build a secret from caller-supplied bytes. The array is copied; the
    /// caller's storage is never retained.
    pub fn from_bytes(bytes: [u8; Secret::LEN]) -> Self {
        Secret(bytes)
    }

    /// Generate a fresh secret from the operating system's CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; Secret::LEN];
        OsRng.fill_bytes(&mut bytes);
        Secret(bytes)
    }

    pub(crate) fn as_bytes(&self) -> &[u8; Secret::LEN] {
        &self.0
    }
}

// Redacted: key material must not leak through debug/log output.
impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(..)")
    }
}
