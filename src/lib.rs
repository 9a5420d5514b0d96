//! keyed-dict: a fixed-record, chained hash dictionary hardened against
//! hash-flooding by keying its hash function with a secret.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: build the dictionary in small, verifiable layers so each piece
//!   can be reasoned about independently.
//! - Layers:
//!   - secret::Secret: opaque 128-bit key material for the hash function;
//!     OS-CSPRNG generation, deterministic construction for tests, and a
//!     redacting Debug so the secret never leaks through logs.
//!   - hash: SipHash-2-4 of the key bytes under the secret, masked to the
//!     power-of-two bucket count. A keyed PRF, so an adversary without the
//!     secret cannot aim keys at one bucket.
//!   - chain::Chain: per-bucket singly linked chains of fixed-width
//!     records; the chain owns its records; drop and clone are iterative
//!     so the flooded single-chain shape cannot overflow the stack.
//!   - dict::Dict: public API; bucket table, length discipline, the two
//!     rehash strategies, and deep clone.
//!
//! Constraints
//! - All records in one dictionary share one fixed key length and one
//!   fixed value length; buffers are length-checked at every mutating
//!   entry point.
//! - Bucket counts are powers of two by construction (requests round up).
//! - Duplicate keys are rejected; lookups never allocate on the borrowed
//!   path.
//! - No internal locking: `&mut self` on every mutator is the exclusion
//!   discipline, and the borrow checker ends any outstanding value borrow
//!   before a mutation can run.
//!
//! Resize strategies
//! - `Dict::rehash` is destructive and in-place: records are re-linked
//!   (moved, not copied) into the new table when the record geometry is
//!   unchanged, and the same handle continues under the new layout.
//! - `Dict::rehash_snapshot` is non-destructive: it builds a wholly
//!   independent dictionary, copying every byte, so the original and any
//!   borrows from it stay valid while readers migrate at their own pace.
//! - Either variant may change key/value lengths; bytes are truncated or
//!   zero-padded, and a shrink that collapses two keys fails cleanly.
//!
//! Notes and non-goals
//! - Intra-bucket ordering is unspecified; rely on set membership only.
//! - A dictionary is a plain owned value: `Send`/`Sync` fall out of the
//!   owned representation, but concurrent mutation still requires external
//!   synchronization, as for any `&mut` API.
//! - No persistence, wire format, or iteration-order guarantees.

mod chain;
mod chain_proptest;
mod dict;
mod hash;
mod secret;

// Public surface
pub use dict::{Dict, InsertError, Iter, RehashError};
pub use secret::Secret;
