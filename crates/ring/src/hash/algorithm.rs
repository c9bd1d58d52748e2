//! Named selection of the built-in hash functions.

use crate::error::RingError;
use crate::hash::traits::HashFunction;
use crate::hash::{Crc32, Fnv1_32, Fnv1a32, Sip13, Xxh3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Built-in hash functions, selectable by name from config or the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Crc32,
    Fnv1,
    Fnv1a,
    Xxh3,
    #[serde(rename = "siphash13")]
    Sip13,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 5] = [
        HashAlgorithm::Crc32,
        HashAlgorithm::Fnv1,
        HashAlgorithm::Fnv1a,
        HashAlgorithm::Xxh3,
        HashAlgorithm::Sip13,
    ];

    /// Instantiates the hash function.
    pub fn build(self) -> Arc<dyn HashFunction> {
        match self {
            HashAlgorithm::Crc32 => Arc::new(Crc32),
            HashAlgorithm::Fnv1 => Arc::new(Fnv1_32),
            HashAlgorithm::Fnv1a => Arc::new(Fnv1a32),
            HashAlgorithm::Xxh3 => Arc::new(Xxh3),
            HashAlgorithm::Sip13 => Arc::new(Sip13),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HashAlgorithm::Crc32 => "crc32",
            HashAlgorithm::Fnv1 => "fnv1",
            HashAlgorithm::Fnv1a => "fnv1a",
            HashAlgorithm::Xxh3 => "xxh3",
            HashAlgorithm::Sip13 => "siphash13",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = RingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        HashAlgorithm::ALL
            .into_iter()
            .find(|alg| alg.as_str() == wanted)
            .ok_or_else(|| RingError::UnknownHashAlgorithm(s.to_string()))
    }
}
