//! CRC-32 (IEEE) hash, the default ring hash.

use crate::hash::traits::HashFunction;

/// CRC-32/IEEE checksum via `crc32fast`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Crc32;

impl HashFunction for Crc32 {
    #[inline]
    fn hash(&self, bytes: &[u8]) -> u32 {
        crc32fast::hash(bytes)
    }

    fn name(&self) -> &'static str {
        "crc32"
    }
}
