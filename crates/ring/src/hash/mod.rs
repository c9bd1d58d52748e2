//! Hash function abstraction for ring placement and key resolution.
//!
//! The same function places virtual nodes and resolves keys, so it must stay
//! fixed for the lifetime of a ring. Swapping it means rebuilding the ring.

pub mod algorithm;
pub mod crc32;
pub mod fnv;
pub mod sip;
pub mod traits;
pub mod xxh3;

pub use algorithm::HashAlgorithm;
pub use crc32::Crc32;
pub use fnv::{Fnv1_32, Fnv1a32};
pub use sip::Sip13;
pub use traits::HashFunction;
pub use xxh3::Xxh3;

use std::sync::Arc;

/// The hash function installed when a caller does not supply one.
pub fn default_hash() -> Arc<dyn HashFunction> {
    Arc::new(Crc32)
}

/// Folds a 64-bit digest into the 32-bit ring space, keeping entropy from both halves.
#[inline]
pub(crate) fn fold64(h: u64) -> u32 {
    (h ^ (h >> 32)) as u32
}
