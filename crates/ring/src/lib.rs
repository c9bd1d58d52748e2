//! Key-to-peer routing for a distributed rate-limiting cluster.
//!
//! This crate provides the consistent-hashing pieces:
//! - Pluggable 32-bit hash functions
//! - Peer identity and virtual node placement
//! - The sorted ring with successor lookup
//! - A lock-protected manager that routes keys while membership changes

pub mod builder;
pub mod config;
pub mod error;
pub mod hash;
pub mod manager;
pub mod peer;
pub mod picker;
pub mod ring;
pub mod vnode;

pub use builder::RingBuilder;
pub use config::{RingConfig, DEFAULT_REPLICAS};
pub use error::{Result, RingError};
pub use hash::{HashAlgorithm, HashFunction};
pub use manager::ConsistentHash;
pub use peer::{Peer, PeerInfo};
pub use picker::PeerPicker;
pub use ring::{Ring, FULL_RING};
pub use vnode::VirtualNode;
