//! Virtual node abstractions.
//!
//! # Virtual Nodes (VNodes) Concept
//!
//! A physical peer placed at a single ring position would own an arc of the
//! ring whose length is entirely up to the hash function. Giving each peer `R`
//! positions (the replication factor) averages those arcs out:
//!
//! 1. **Better Load Distribution**: more positions = smoother share of keys
//! 2. **Gradual Rebalancing**: a joining/leaving peer takes/gives ~1/N of keys,
//!    drawn from every other peer rather than a single neighbour
//!
//! # Performance Characteristics
//!
//! - **Memory**: O(N * R) entries of one `u32` plus one `Arc` each
//! - **Lookup**: O(log V) binary search, V = N * R
//! - **Insert**: O(V + R log R) per peer, one sorted merge
//! - **Remove**: O(V) per peer
//! - **Rebuild** (`set_peers`): O(V log V), one stable sort
//!
//! The ring targets tens to low hundreds of peers, where the sorted `Vec`
//! beats a tree on lookups and memory.

use crate::hash::HashFunction;
use std::fmt;
use std::sync::Arc;

/// Separator between the peer address and the replica index in a vnode key.
pub const VNODE_KEY_SEPARATOR: char = ':';

/// Builds the key hashed to place replica `index` of the peer at `address`.
///
/// Format: `"address:index"`.
pub fn vnode_key(address: &str, index: usize) -> String {
    format!("{}{}{}", address, VNODE_KEY_SEPARATOR, index)
}

/// Computes the ring position of replica `index` for `address`.
#[inline]
pub fn vnode_position(hasher: &dyn HashFunction, address: &str, index: usize) -> u32 {
    hasher.hash(vnode_key(address, index).as_bytes())
}

/// Positions for replicas `0..replicas` of the peer at `address`.
pub fn vnode_points(hasher: &dyn HashFunction, address: &str, replicas: usize) -> Vec<u32> {
    (0..replicas)
        .map(|i| vnode_position(hasher, address, i))
        .collect()
}

/// A virtual node on the hash ring.
///
/// # Invariants
///
/// - Within one ring, no two `VirtualNode`s share a hash
/// - `owner` is registered with the ring's peer index for as long as this
///   entry is on the ring
pub struct VirtualNode<P> {
    /// Position on the ring.
    pub hash: u32,

    /// The physical peer that owns this position.
    ///
    /// Shared with the caller; the ring never creates or tears down peers.
    pub owner: Arc<P>,
}

impl<P> VirtualNode<P> {
    #[inline]
    pub fn new(hash: u32, owner: Arc<P>) -> Self {
        Self { hash, owner }
    }

    /// Clockwise distance from this position to `other`, wrapping at `u32::MAX`.
    ///
    /// A vnode owns the arc from its predecessor up to itself; see
    /// [`crate::ring::Ring::ownership`].
    #[inline]
    pub fn distance_to(&self, other: &Self) -> u32 {
        other.hash.wrapping_sub(self.hash)
    }
}

// Manual impl: a derive would require `P: Clone`, but only the `Arc` is cloned.
impl<P> Clone for VirtualNode<P> {
    fn clone(&self) -> Self {
        Self {
            hash: self.hash,
            owner: Arc::clone(&self.owner),
        }
    }
}

impl<P: crate::peer::Peer> fmt::Debug for VirtualNode<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualNode")
            .field("hash", &format_args!("{:08x}", self.hash))
            .field("owner", &self.owner.address())
            .finish()
    }
}

impl<P: crate::peer::Peer> fmt::Display for VirtualNode<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VNode(hash={:08x}, peer={})", self.hash, self.owner.address())
    }
}
