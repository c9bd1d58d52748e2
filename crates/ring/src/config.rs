//! Ring configuration.

use crate::hash::HashAlgorithm;
use serde::{Deserialize, Serialize};

/// Virtual nodes per peer when none is configured.
///
/// At 512, each of three peers receives between 20% and 45% of uniformly
/// sampled IPv4-shaped keys under each built-in hash.
pub const DEFAULT_REPLICAS: usize = 512;

/// Settings that fix ring placement.
///
/// Every process routing to the same cluster must use identical values, or
/// they will disagree on key ownership.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    /// Virtual nodes per physical peer (the replication factor).
    pub replicas: usize,
    /// Hash used for both placement and key resolution.
    pub hash: HashAlgorithm,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            replicas: DEFAULT_REPLICAS,
            hash: HashAlgorithm::default(),
        }
    }
}
