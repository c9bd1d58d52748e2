//! Core hash function trait definitions.

/// Maps a byte sequence onto the 32-bit ring.
///
/// Implementations must be pure and deterministic: the same bytes always
/// produce the same value, with no side effects and no failure mode. They are
/// shared between threads, so they must also be `Send + Sync`.
///
/// Plain functions and closures of type `Fn(&[u8]) -> u32` implement this
/// trait, which makes injecting an experimental hash a one-liner:
///
/// ```rust
/// use peer_ring::hash::HashFunction;
///
/// let h = |bytes: &[u8]| bytes.len() as u32;
/// assert_eq!(h.hash(b"abc"), 3);
/// ```
pub trait HashFunction: Send + Sync {
    /// Hashes `bytes` to a ring position.
    fn hash(&self, bytes: &[u8]) -> u32;

    /// Returns the name of this hash function (for logging/debugging).
    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<F> HashFunction for F
where
    F: Fn(&[u8]) -> u32 + Send + Sync,
{
    fn hash(&self, bytes: &[u8]) -> u32 {
        self(bytes)
    }
}
