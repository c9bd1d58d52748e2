//! Sorted virtual-node table with successor lookup.

use crate::error::{Result, RingError};
use crate::hash::HashFunction;
use crate::peer::Peer;
use crate::vnode::{vnode_points, VirtualNode};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Size of the hash space, 2^32.
pub const FULL_RING: u64 = 1 << 32;

/// Sorted table of virtual nodes.
///
/// Entries are strictly ascending by hash. When two placements collide,
/// the entry already on the ring wins and the newcomer is dropped, so the
/// outcome depends only on insertion order.
pub struct Ring<P> {
    hasher: Arc<dyn HashFunction>,
    vnodes: Vec<VirtualNode<P>>,
}

impl<P: Peer> Ring<P> {
    pub fn new(hasher: Arc<dyn HashFunction>) -> Self {
        Self {
            hasher,
            vnodes: Vec::new(),
        }
    }

    /// Builds a ring from placements given in insertion order.
    ///
    /// Where several placements share a hash, the earliest one is kept, the
    /// same outcome as inserting them one by one.
    pub fn from_placements(hasher: Arc<dyn HashFunction>, mut vnodes: Vec<VirtualNode<P>>) -> Self {
        let placed = vnodes.len();
        // Stable sort, so dedup keeps the first-inserted entry of each hash.
        vnodes.sort_by_key(|v| v.hash);
        vnodes.dedup_by_key(|v| v.hash);
        if vnodes.len() < placed {
            trace!(dropped = placed - vnodes.len(), "vnode collisions; kept earliest entries");
        }
        Self { hasher, vnodes }
    }

    /// Ring positions for `replicas` virtual nodes of the peer at `address`.
    ///
    /// Pure function of the address and the hash, so callers can compute it
    /// before taking a lock.
    pub fn points_for(&self, address: &str, replicas: usize) -> Vec<u32> {
        vnode_points(self.hasher.as_ref(), address, replicas)
    }

    /// Places `replicas` virtual nodes for `peer`.
    ///
    /// Returns how many were inserted; the difference from `replicas` is the
    /// number dropped on collision.
    pub fn insert(&mut self, peer: Arc<P>, replicas: usize) -> usize {
        let points = self.points_for(peer.address(), replicas);
        self.insert_points(peer, &points)
    }

    /// Places `peer` at precomputed `points`, skipping any already taken.
    pub fn insert_points(&mut self, peer: Arc<P>, points: &[u32]) -> usize {
        let mut points = points.to_vec();
        points.sort_unstable();
        points.dedup();
        self.insert_sorted_points(peer, &points)
    }

    /// Like [`Ring::insert_points`], for `points` already strictly ascending.
    ///
    /// Merges both sorted runs in one pass: O(V + R) for V entries on the
    /// ring and R new points.
    pub fn insert_sorted_points(&mut self, peer: Arc<P>, points: &[u32]) -> usize {
        debug_assert!(points.windows(2).all(|w| w[0] < w[1]));

        let existing = std::mem::take(&mut self.vnodes);
        let mut merged = Vec::with_capacity(existing.len() + points.len());
        let mut fresh = points.iter().copied().peekable();
        let mut inserted = 0;

        for vnode in existing {
            while let Some(&hash) = fresh.peek() {
                if hash > vnode.hash {
                    break;
                }
                if hash < vnode.hash {
                    merged.push(VirtualNode::new(hash, Arc::clone(&peer)));
                    inserted += 1;
                } else {
                    trace!(
                        hash,
                        address = peer.address(),
                        holder = vnode.owner.address(),
                        "vnode collision; keeping existing entry"
                    );
                }
                fresh.next();
            }
            merged.push(vnode);
        }
        for hash in fresh {
            merged.push(VirtualNode::new(hash, Arc::clone(&peer)));
            inserted += 1;
        }

        self.vnodes = merged;
        inserted
    }

    /// Removes every virtual node owned by `address`. Returns how many went.
    pub fn remove(&mut self, address: &str) -> usize {
        let before = self.vnodes.len();
        self.vnodes.retain(|v| v.owner.address() != address);
        before - self.vnodes.len()
    }

    /// Finds the owner of `key_hash`: the first vnode at or after it,
    /// wrapping past the top of the ring to the first entry.
    ///
    /// # Performance
    /// - **Time**: O(log V) for V virtual nodes
    pub fn lookup(&self, key_hash: u32) -> Result<&Arc<P>> {
        if self.vnodes.is_empty() {
            return Err(RingError::EmptyRing);
        }
        let idx = self.vnodes.partition_point(|v| v.hash < key_hash);
        let idx = if idx == self.vnodes.len() { 0 } else { idx };
        Ok(&self.vnodes[idx].owner)
    }

    /// Hashes `key` and resolves its owner.
    pub fn get(&self, key: &[u8]) -> Result<&Arc<P>> {
        self.lookup(self.hasher.hash(key))
    }

    /// Length of ring arc owned by each peer address, in hash units.
    ///
    /// A vnode owns the keys from just past its predecessor up to itself, so
    /// the arcs sum to 2^32 on any non-empty ring.
    pub fn ownership(&self) -> BTreeMap<String, u64> {
        let mut owned = BTreeMap::new();
        let Some(mut prev) = self.vnodes.last() else {
            return owned;
        };
        if self.vnodes.len() == 1 {
            owned.insert(prev.owner.address().to_string(), FULL_RING);
            return owned;
        }
        for vnode in &self.vnodes {
            *owned.entry(vnode.owner.address().to_string()).or_insert(0) +=
                u64::from(prev.distance_to(vnode));
            prev = vnode;
        }
        owned
    }

    /// Number of virtual nodes on the ring.
    pub fn len(&self) -> usize {
        self.vnodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vnodes.is_empty()
    }

    /// Virtual nodes in ascending hash order.
    pub fn iter(&self) -> impl Iterator<Item = &VirtualNode<P>> {
        self.vnodes.iter()
    }
}

impl<P: Peer> fmt::Debug for Ring<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ring")
            .field("hasher", &self.hasher.name())
            .field("vnodes", &self.vnodes.len())
            .finish()
    }
}
