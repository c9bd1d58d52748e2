//! XXH3 hash folded to 32 bits.

use crate::hash::fold64;
use crate::hash::traits::HashFunction;
use xxhash_rust::xxh3::xxh3_64;

/// XXH3-64 via `xxhash-rust`, folded into the 32-bit ring space.
#[derive(Clone, Copy, Debug, Default)]
pub struct Xxh3;

impl HashFunction for Xxh3 {
    #[inline]
    fn hash(&self, bytes: &[u8]) -> u32 {
        fold64(xxh3_64(bytes))
    }

    fn name(&self) -> &'static str {
        "xxh3"
    }
}
