//! 32-bit Fowler–Noll–Vo hashes.

use crate::hash::traits::HashFunction;

const OFFSET_BASIS: u32 = 0x811c_9dc5;
const PRIME: u32 = 0x0100_0193;

/// FNV-1a, 32-bit: xor then multiply.
#[derive(Clone, Copy, Debug, Default)]
pub struct Fnv1a32;

impl HashFunction for Fnv1a32 {
    fn hash(&self, bytes: &[u8]) -> u32 {
        bytes.iter().fold(OFFSET_BASIS, |h, &b| {
            (h ^ u32::from(b)).wrapping_mul(PRIME)
        })
    }

    fn name(&self) -> &'static str {
        "fnv1a"
    }
}

/// FNV-1, 32-bit: multiply then xor.
///
/// The last byte only touches the low bits, so it spreads short
/// sequential keys poorly. Prefer [`Fnv1a32`] unless parity with an existing
/// FNV-1 deployment matters.
#[derive(Clone, Copy, Debug, Default)]
pub struct Fnv1_32;

impl HashFunction for Fnv1_32 {
    fn hash(&self, bytes: &[u8]) -> u32 {
        bytes.iter().fold(OFFSET_BASIS, |h, &b| {
            h.wrapping_mul(PRIME) ^ u32::from(b)
        })
    }

    fn name(&self) -> &'static str {
        "fnv1"
    }
}
