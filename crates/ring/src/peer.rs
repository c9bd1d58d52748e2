//! Peer abstractions for the ring.
//!
//! The ring only needs a stable address from each member. Transport state
//! (connections, clients, health) stays with the caller's own peer type,
//! which exposes its identity through [`Peer`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a cluster peer.
///
/// Two peers are the same peer if and only if their addresses are equal.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PeerInfo {
    /// Address the peer is reachable at, e.g. `"10.0.0.7:1051"`.
    pub address: String,
}

impl PeerInfo {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

impl fmt::Display for PeerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

impl From<&str> for PeerInfo {
    fn from(address: &str) -> Self {
        PeerInfo::new(address)
    }
}

impl From<String> for PeerInfo {
    fn from(address: String) -> Self {
        PeerInfo::new(address)
    }
}

/// Anything that can be registered on the ring.
///
/// The address returned by `info()` must not change while the peer is
/// registered; it is read once at registration and again on removal.
pub trait Peer: Send + Sync {
    fn info(&self) -> &PeerInfo;

    #[inline]
    fn address(&self) -> &str {
        &self.info().address
    }
}

impl Peer for PeerInfo {
    #[inline]
    fn info(&self) -> &PeerInfo {
        self
    }
}
