//! SipHash-1-3 folded to 32 bits.

use crate::hash::fold64;
use crate::hash::traits::HashFunction;
use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// SipHash-1-3 with fixed zero keys, folded into the 32-bit ring space.
///
/// Keys are fixed so every process in the fleet places peers identically.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sip13;

impl HashFunction for Sip13 {
    fn hash(&self, bytes: &[u8]) -> u32 {
        let mut hasher = SipHasher13::new();
        hasher.write(bytes);
        fold64(hasher.finish())
    }

    fn name(&self) -> &'static str {
        "siphash13"
    }
}
