//! The resolver surface consumed by request routing.

use crate::error::Result;
use crate::manager::ConsistentHash;
use crate::peer::{Peer, PeerInfo};
use std::sync::Arc;

/// Picks the peer responsible for a key.
///
/// Routers hold a `dyn PeerPicker` so the placement scheme can be swapped
/// without touching request handling. Implementations must be safe to call
/// from many request tasks at once while membership changes.
pub trait PeerPicker<P: Peer>: Send + Sync {
    /// Returns the peer that owns `key`.
    fn get(&self, key: &[u8]) -> Result<Arc<P>>;

    /// Returns the registered peer object for an address.
    fn get_by_peer_info(&self, info: &PeerInfo) -> Result<Arc<P>>;

    /// Number of registered physical peers.
    fn size(&self) -> usize;

    /// Every registered peer.
    fn peers(&self) -> Vec<Arc<P>>;

    fn add(&self, peer: Arc<P>) -> bool;

    fn remove(&self, info: &PeerInfo) -> bool;

    /// An empty picker configured like this one.
    fn new_empty(&self) -> Box<dyn PeerPicker<P>>;
}

impl<P: Peer + 'static> PeerPicker<P> for ConsistentHash<P> {
    fn get(&self, key: &[u8]) -> Result<Arc<P>> {
        ConsistentHash::get(self, key)
    }

    fn get_by_peer_info(&self, info: &PeerInfo) -> Result<Arc<P>> {
        ConsistentHash::get_by_peer_info(self, info)
    }

    fn size(&self) -> usize {
        ConsistentHash::size(self)
    }

    fn peers(&self) -> Vec<Arc<P>> {
        ConsistentHash::peers(self)
    }

    fn add(&self, peer: Arc<P>) -> bool {
        ConsistentHash::add(self, peer)
    }

    fn remove(&self, info: &PeerInfo) -> bool {
        ConsistentHash::remove(self, info)
    }

    fn new_empty(&self) -> Box<dyn PeerPicker<P>> {
        Box::new(ConsistentHash::new_empty(self))
    }
}
