//! Command-line arguments and ring settings resolution.

use crate::commands::{Command, CommandResult};
use anyhow::Context;
use clap::{Args, Parser};
use peer_ring::{HashAlgorithm, RingConfig};
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "ringctl", version, about = "Inspect routing on a consistent-hash peer ring")]
pub struct CliConfig {
    /// JSON file with ring settings (`{"replicas": 512, "hash": "crc32"}`)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Ring membership and placement flags shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct RingArgs {
    /// Peer addresses (e.g. "a.svc.local,b.svc.local,c.svc.local")
    #[arg(long, value_delimiter = ',', required = true)]
    pub peers: Vec<String>,

    /// Virtual nodes per peer; overrides the config file
    #[arg(long)]
    pub replicas: Option<usize>,
}

impl CliConfig {
    /// Loads the config file, if any, falling back to defaults.
    pub fn ring_config(&self) -> anyhow::Result<RingConfig> {
        let Some(path) = &self.config else {
            return Ok(RingConfig::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: RingConfig = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        debug!(?config, path = %path.display(), "loaded ring config");
        Ok(config)
    }

    pub fn run(&self) -> anyhow::Result<()> {
        let base = self.ring_config()?;
        let result = self.command.execute(&base)?;
        self.print(&result)
    }

    fn print(&self, result: &CommandResult) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(result)?);
        } else {
            print!("{}", result);
        }
        Ok(())
    }
}

impl RingArgs {
    /// Applies flag overrides on top of the file/default settings.
    pub fn resolve(&self, base: &RingConfig, hash: Option<HashAlgorithm>) -> RingConfig {
        RingConfig {
            replicas: self.replicas.unwrap_or(base.replicas),
            hash: hash.unwrap_or(base.hash),
        }
    }
}
