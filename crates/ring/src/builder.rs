//! Fluent construction of a populated ring.

use crate::config::{RingConfig, DEFAULT_REPLICAS};
use crate::hash::{HashAlgorithm, HashFunction};
use crate::manager::ConsistentHash;
use crate::peer::Peer;
use std::sync::Arc;

/// Builder for [`ConsistentHash`].
///
/// ```rust
/// use std::sync::Arc;
/// use peer_ring::{HashAlgorithm, PeerInfo, RingBuilder};
///
/// let ring = RingBuilder::new()
///     .with_replicas(128)
///     .with_algorithm(HashAlgorithm::Fnv1a)
///     .add_peer(Arc::new(PeerInfo::new("a.svc.local")))
///     .add_peer(Arc::new(PeerInfo::new("b.svc.local")))
///     .build();
///
/// assert_eq!(ring.size(), 2);
/// assert_eq!(ring.hash_name(), "fnv1a");
/// ```
pub struct RingBuilder<P> {
    replicas: usize,
    hasher: Option<Arc<dyn HashFunction>>,
    peers: Vec<Arc<P>>,
}

impl<P: Peer> RingBuilder<P> {
    pub fn new() -> Self {
        Self {
            replicas: DEFAULT_REPLICAS,
            hasher: None,
            peers: Vec::new(),
        }
    }

    pub fn from_config(config: &RingConfig) -> Self {
        Self::new()
            .with_replicas(config.replicas)
            .with_algorithm(config.hash)
    }

    /// Sets the number of virtual nodes per peer.
    pub fn with_replicas(mut self, replicas: usize) -> Self {
        self.replicas = replicas;
        self
    }

    /// Installs a caller-supplied hash function.
    pub fn with_hash(mut self, hasher: Arc<dyn HashFunction>) -> Self {
        self.hasher = Some(hasher);
        self
    }

    pub fn with_algorithm(self, algorithm: HashAlgorithm) -> Self {
        self.with_hash(algorithm.build())
    }

    pub fn add_peer(mut self, peer: Arc<P>) -> Self {
        self.peers.push(peer);
        self
    }

    pub fn add_peers<I>(mut self, peers: I) -> Self
    where
        I: IntoIterator<Item = Arc<P>>,
    {
        self.peers.extend(peers);
        self
    }

    pub fn build(self) -> ConsistentHash<P> {
        let ring = ConsistentHash::with_replicas(self.hasher, self.replicas);
        if !self.peers.is_empty() {
            ring.set_peers(self.peers);
        }
        ring
    }
}

impl<P: Peer> Default for RingBuilder<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peer::PeerInfo;

    #[test]
    fn test_builder_defaults() {
        let ring = RingBuilder::<PeerInfo>::new()
            .add_peer(Arc::new(PeerInfo::new("a")))
            .build();
        assert_eq!(ring.replicas(), DEFAULT_REPLICAS);
        assert_eq!(ring.hash_name(), "crc32");
        assert_eq!(ring.size(), 1);
    }

    #[test]
    fn test_builder_from_config() {
        let config = RingConfig {
            replicas: 32,
            hash: HashAlgorithm::Sip13,
        };
        let ring = RingBuilder::from_config(&config)
            .add_peers(["a", "b", "c"].map(|a| Arc::new(PeerInfo::new(a))))
            .build();
        assert_eq!(ring.replicas(), 32);
        assert_eq!(ring.hash_name(), "siphash13");
        assert_eq!(ring.size(), 3);
    }

    #[test]
    fn test_builder_with_closure_hash() {
        let ring = RingBuilder::new()
            .with_hash(Arc::new(|bytes: &[u8]| bytes.len() as u32))
            .add_peer(Arc::new(PeerInfo::new("a")))
            .build();
        assert_eq!(ring.hash_name(), "custom");
        assert!(ring.get("anything").is_ok());
    }
}
