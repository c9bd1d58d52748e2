//! CLI tool for inspecting consistent hash rings.
//!
//! Provides commands for:
//! - Routing keys to their owning peer
//! - Sampling the key distribution across peers
//! - Measuring how many keys move on a membership change

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
