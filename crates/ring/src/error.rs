//! Error types for the peer ring.

use thiserror::Error;

/// Result type alias for the peer ring.
pub type Result<T> = std::result::Result<T, RingError>;

/// Errors returned by ring lookups and configuration parsing.
///
/// Every variant is recoverable; nothing in this crate treats them as fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RingError {
    /// A key was resolved while no peers were registered.
    #[error("unable to pick a peer; the ring is empty")]
    EmptyRing,

    /// An identity lookup named an address that is not registered.
    #[error("peer '{address}' is not registered")]
    PeerNotFound { address: String },

    /// A hash algorithm name did not match any built-in implementation.
    #[error("unknown hash algorithm '{0}'")]
    UnknownHashAlgorithm(String),
}

impl RingError {
    pub(crate) fn peer_not_found(address: impl Into<String>) -> Self {
        RingError::PeerNotFound {
            address: address.into(),
        }
    }
}
