//! Consistent hash ring implementation.
//!
//! [`Ring`] is the bare sorted table and is not synchronized. Shared,
//! concurrent use goes through [`crate::manager::ConsistentHash`].

#[allow(clippy::module_inception)]
pub mod ring;

pub use ring::{Ring, FULL_RING};
