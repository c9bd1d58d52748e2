//! Thread-safe ring manager: the ring plus a peer index behind one lock.

use crate::config::DEFAULT_REPLICAS;
use crate::error::{Result, RingError};
use crate::hash::{default_hash, HashFunction};
use crate::peer::{Peer, PeerInfo};
use crate::ring::Ring;
use crate::vnode::{vnode_points, VirtualNode};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

struct Inner<P> {
    ring: Ring<P>,
    peers: HashMap<String, Arc<P>>,
}

impl<P: Peer> Inner<P> {
    fn new(hasher: Arc<dyn HashFunction>) -> Self {
        Self {
            ring: Ring::new(hasher),
            peers: HashMap::new(),
        }
    }
}

/// Consistent-hash peer picker.
///
/// Resolves keys to the peer that owns them, and lets the membership layer
/// add and remove peers while requests are being routed.
///
/// # Thread Safety
///
/// A single `RwLock` covers the ring and the peer index. Lookups share it;
/// membership changes hold it exclusively, so a reader never sees a peer
/// half-added or half-removed. Hashing always happens before the lock is
/// taken.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use peer_ring::{ConsistentHash, PeerInfo};
///
/// let ring = ConsistentHash::new(None);
/// ring.add(Arc::new(PeerInfo::new("a.svc.local")));
/// ring.add(Arc::new(PeerInfo::new("b.svc.local")));
///
/// let owner = ring.get("account:42").unwrap();
/// assert!(["a.svc.local", "b.svc.local"].contains(&owner.address.as_str()));
/// ```
pub struct ConsistentHash<P> {
    hasher: Arc<dyn HashFunction>,
    replicas: usize,
    inner: RwLock<Inner<P>>,
}

impl<P: Peer> ConsistentHash<P> {
    /// Creates an empty ring with [`DEFAULT_REPLICAS`] vnodes per peer.
    ///
    /// `None` installs the default hash (CRC-32).
    pub fn new(hasher: Option<Arc<dyn HashFunction>>) -> Self {
        Self::with_replicas(hasher, DEFAULT_REPLICAS)
    }

    /// Creates an empty ring with `replicas` vnodes per peer.
    ///
    /// A peer needs at least one position, so `0` is raised to `1`.
    pub fn with_replicas(hasher: Option<Arc<dyn HashFunction>>, replicas: usize) -> Self {
        let hasher = hasher.unwrap_or_else(default_hash);
        let replicas = if replicas == 0 {
            warn!("replicas must be at least 1; using 1");
            1
        } else {
            replicas
        };
        Self {
            inner: RwLock::new(Inner::new(Arc::clone(&hasher))),
            hasher,
            replicas,
        }
    }

    /// Returns an empty ring with the same hash and replica count.
    ///
    /// Lets the membership layer build the next ring off to the side and
    /// swap it in once complete.
    pub fn new_empty(&self) -> Self {
        Self::with_replicas(Some(Arc::clone(&self.hasher)), self.replicas)
    }

    /// Registers `peer`. Returns `false` if its address was already present,
    /// in which case nothing changes.
    pub fn add(&self, peer: Arc<P>) -> bool {
        let address = peer.address().to_string();
        if self.inner.read().peers.contains_key(&address) {
            return false;
        }

        // Sorting here keeps the locked section to a single linear merge.
        let mut points = vnode_points(self.hasher.as_ref(), &address, self.replicas);
        points.sort_unstable();
        points.dedup();

        let inserted = {
            let mut inner = self.inner.write();
            // Re-check: another writer may have won the race since the read.
            if inner.peers.contains_key(&address) {
                return false;
            }
            let inserted = inner.ring.insert_sorted_points(Arc::clone(&peer), &points);
            inner.peers.insert(address.clone(), peer);
            inserted
        };

        debug!(%address, replicas = self.replicas, inserted, "added peer to ring");
        true
    }

    /// Unregisters the peer at `info.address`, with all of its vnodes.
    /// Returns `false` if it was not registered.
    pub fn remove(&self, info: &PeerInfo) -> bool {
        let removed = {
            let mut inner = self.inner.write();
            if inner.peers.remove(&info.address).is_none() {
                return false;
            }
            inner.ring.remove(&info.address)
        };

        debug!(address = %info.address, removed, "removed peer from ring");
        true
    }

    /// Replaces the whole membership with `peers` in one step.
    ///
    /// Readers observe either the previous ring or the new one. When an address
    /// appears more than once, the first occurrence is kept.
    pub fn set_peers<I>(&self, peers: I)
    where
        I: IntoIterator<Item = Arc<P>>,
    {
        let mut index = HashMap::new();
        let mut placements = Vec::new();
        for peer in peers {
            if index.contains_key(peer.address()) {
                continue;
            }
            placements.extend(
                vnode_points(self.hasher.as_ref(), peer.address(), self.replicas)
                    .into_iter()
                    .map(|hash| VirtualNode::new(hash, Arc::clone(&peer))),
            );
            index.insert(peer.address().to_string(), peer);
        }
        let next = Inner {
            ring: Ring::from_placements(Arc::clone(&self.hasher), placements),
            peers: index,
        };

        let (count, vnodes) = (next.peers.len(), next.ring.len());
        *self.inner.write() = next;

        debug!(peers = count, vnodes, "replaced ring membership");
    }

    /// Returns the peer that owns `key`.
    pub fn get<K: AsRef<[u8]>>(&self, key: K) -> Result<Arc<P>> {
        let hash = self.hasher.hash(key.as_ref());
        let inner = self.inner.read();
        let owner = inner.ring.lookup(hash)?;
        Ok(Arc::clone(owner))
    }

    /// Returns the registered peer object for `info.address`, without hashing.
    pub fn get_by_peer_info(&self, info: &PeerInfo) -> Result<Arc<P>> {
        self.inner
            .read()
            .peers
            .get(&info.address)
            .cloned()
            .ok_or_else(|| RingError::peer_not_found(&info.address))
    }

    /// Number of registered physical peers.
    pub fn size(&self) -> usize {
        self.inner.read().peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Every registered peer, ordered by address.
    pub fn peers(&self) -> Vec<Arc<P>> {
        let mut peers: Vec<Arc<P>> = self.inner.read().peers.values().cloned().collect();
        peers.sort_by(|a, b| a.address().cmp(b.address()));
        peers
    }

    /// Ring arc owned by each peer address, in hash units summing to 2^32.
    pub fn ownership(&self) -> BTreeMap<String, u64> {
        self.inner.read().ring.ownership()
    }

    /// Number of virtual nodes on the ring (collisions excluded).
    pub fn vnode_count(&self) -> usize {
        self.inner.read().ring.len()
    }

    pub fn replicas(&self) -> usize {
        self.replicas
    }

    pub fn hash_name(&self) -> &'static str {
        self.hasher.name()
    }
}

impl<P: Peer> Default for ConsistentHash<P> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<P: Peer> fmt::Debug for ConsistentHash<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("ConsistentHash")
            .field("hash", &self.hasher.name())
            .field("replicas", &self.replicas)
            .field("peers", &inner.peers.len())
            .field("vnodes", &inner.ring.len())
            .finish()
    }
}
