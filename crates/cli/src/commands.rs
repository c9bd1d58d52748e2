//! Subcommands and their results.

use crate::config::RingArgs;
use anyhow::{bail, Context};
use clap::{Args, Subcommand};
use peer_ring::{ConsistentHash, HashAlgorithm, PeerInfo, RingBuilder, RingConfig, FULL_RING};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the peer that owns each key
    Route {
        #[command(flatten)]
        ring: RingArgs,
        /// Hash algorithm; overrides the config file
        #[arg(long)]
        hash: Option<HashAlgorithm>,
        /// Keys to resolve
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Sample random IPv4-shaped keys and report each peer's share
    Distribution {
        #[command(flatten)]
        ring: RingArgs,
        /// Hash algorithms to compare (repeatable); defaults to the configured one
        #[arg(long = "hash")]
        hashes: Vec<HashAlgorithm>,
        #[arg(long, default_value_t = 10_000)]
        samples: usize,
        /// Seed for key generation, for repeatable runs
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Report how many keys move when one peer joins or leaves
    Churn {
        #[command(flatten)]
        ring: RingArgs,
        #[arg(long)]
        hash: Option<HashAlgorithm>,
        #[command(flatten)]
        change: Change,
        #[arg(long, default_value_t = 10_000)]
        samples: usize,
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// The membership change applied by `churn`.
#[derive(Debug, Clone, Args)]
#[group(required = true, multiple = false)]
pub struct Change {
    /// Peer address that joins the ring
    #[arg(long)]
    pub add: Option<String>,
    /// Peer address that leaves the ring
    #[arg(long)]
    pub remove: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum CommandResult {
    Route {
        hash: HashAlgorithm,
        replicas: usize,
        routes: Vec<Route>,
    },
    Distribution {
        samples: usize,
        replicas: usize,
        runs: Vec<DistributionRun>,
    },
    Churn(ChurnReport),
}

#[derive(Debug, Serialize)]
pub struct Route {
    pub key: String,
    pub peer: String,
}

#[derive(Debug, Serialize)]
pub struct DistributionRun {
    pub hash: HashAlgorithm,
    pub shares: Vec<PeerShare>,
}

#[derive(Debug, Serialize)]
pub struct PeerShare {
    pub peer: String,
    pub keys: usize,
    /// Fraction of sampled keys routed to this peer.
    pub share: f64,
    /// Fraction of the hash space this peer's vnodes cover.
    pub arc: f64,
}

#[derive(Debug, Serialize)]
pub struct ChurnReport {
    pub hash: HashAlgorithm,
    pub replicas: usize,
    pub samples: usize,
    /// `+addr` for a join, `-addr` for a leave.
    pub change: String,
    /// Keys whose owner changed.
    pub moved: usize,
    pub moved_share: f64,
    /// Keys that moved between two peers neither of which was the changed one.
    /// Always zero on a healthy ring.
    pub crossed: usize,
}

impl Command {
    pub fn execute(&self, base: &RingConfig) -> anyhow::Result<CommandResult> {
        match self {
            Command::Route { ring, hash, keys } => {
                let cfg = ring.resolve(base, *hash);
                let picker = build_ring(&ring.peers, &cfg);
                let routes = keys
                    .iter()
                    .map(|key| -> anyhow::Result<Route> {
                        let peer = picker.get(key)?;
                        Ok(Route {
                            key: key.clone(),
                            peer: peer.address.clone(),
                        })
                    })
                    .collect::<anyhow::Result<Vec<_>>>()?;
                Ok(CommandResult::Route {
                    hash: cfg.hash,
                    replicas: cfg.replicas,
                    routes,
                })
            }
            Command::Distribution {
                ring,
                hashes,
                samples,
                seed,
            } => {
                let hashes = if hashes.is_empty() {
                    vec![base.hash]
                } else {
                    hashes.clone()
                };
                let keys = ip_keys(*samples, *seed);
                let mut runs = Vec::with_capacity(hashes.len());
                for hash in hashes {
                    let cfg = ring.resolve(base, Some(hash));
                    let picker = build_ring(&ring.peers, &cfg);
                    runs.push(distribution(&picker, hash, &keys)?);
                }
                Ok(CommandResult::Distribution {
                    samples: keys.len(),
                    replicas: ring.replicas.unwrap_or(base.replicas),
                    runs,
                })
            }
            Command::Churn {
                ring,
                hash,
                change,
                samples,
                seed,
            } => {
                let cfg = ring.resolve(base, *hash);
                let picker = build_ring(&ring.peers, &cfg);
                let keys = ip_keys(*samples, *seed);
                churn(&picker, &cfg, change, &keys).map(CommandResult::Churn)
            }
        }
    }
}

fn build_ring(peers: &[String], cfg: &RingConfig) -> ConsistentHash<PeerInfo> {
    RingBuilder::from_config(cfg)
        .add_peers(peers.iter().map(|p| Arc::new(PeerInfo::new(p.trim()))))
        .build()
}

/// Random addresses in 192.0.0.0/8.
fn ip_keys(count: usize, seed: Option<u64>) -> Vec<String> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    (0..count)
        .map(|_| {
            let [_, b, c, d] = rng.gen::<u32>().to_be_bytes();
            Ipv4Addr::new(192, b, c, d).to_string()
        })
        .collect()
}

fn distribution(
    picker: &ConsistentHash<PeerInfo>,
    hash: HashAlgorithm,
    keys: &[String],
) -> anyhow::Result<DistributionRun> {
    let mut counts: BTreeMap<String, usize> = picker
        .peers()
        .iter()
        .map(|p| (p.address.clone(), 0))
        .collect();
    for key in keys {
        *counts.entry(picker.get(key)?.address.clone()).or_default() += 1;
    }

    let owned = picker.ownership();
    let total = keys.len().max(1) as f64;
    let shares = counts
        .into_iter()
        .map(|(peer, keys)| {
            let arc = owned.get(&peer).copied().unwrap_or(0) as f64 / FULL_RING as f64;
            PeerShare {
                peer,
                keys,
                share: keys as f64 / total,
                arc,
            }
        })
        .collect();
    info!(%hash, samples = keys.len(), "sampled key distribution");
    Ok(DistributionRun { hash, shares })
}

fn churn(
    picker: &ConsistentHash<PeerInfo>,
    cfg: &RingConfig,
    change: &Change,
    keys: &[String],
) -> anyhow::Result<ChurnReport> {
    let before = owners(picker, keys)?;

    let (changed, label) = match (&change.add, &change.remove) {
        (Some(addr), _) => {
            if !picker.add(Arc::new(PeerInfo::new(addr.as_str()))) {
                bail!("peer '{addr}' is already on the ring");
            }
            (addr.as_str(), format!("+{addr}"))
        }
        (None, Some(addr)) => {
            if !picker.remove(&PeerInfo::new(addr.as_str())) {
                bail!("peer '{addr}' is not on the ring");
            }
            (addr.as_str(), format!("-{addr}"))
        }
        (None, None) => bail!("churn needs --add or --remove"),
    };

    let after = owners(picker, keys).context("resolving keys after the change")?;

    let mut moved = 0;
    let mut crossed = 0;
    for (old, new) in before.iter().zip(&after) {
        if old != new {
            moved += 1;
            if old != changed && new != changed {
                crossed += 1;
            }
        }
    }

    Ok(ChurnReport {
        hash: cfg.hash,
        replicas: cfg.replicas,
        samples: keys.len(),
        change: label,
        moved,
        moved_share: moved as f64 / keys.len().max(1) as f64,
        crossed,
    })
}

fn owners(picker: &ConsistentHash<PeerInfo>, keys: &[String]) -> anyhow::Result<Vec<String>> {
    keys.iter()
        .map(|k| -> anyhow::Result<String> { Ok(picker.get(k)?.address.clone()) })
        .collect()
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandResult::Route { routes, .. } => {
                for route in routes {
                    writeln!(f, "{}\t{}", route.key, route.peer)?;
                }
                Ok(())
            }
            CommandResult::Distribution {
                samples,
                replicas,
                runs,
            } => {
                writeln!(f, "{samples} keys, {replicas} replicas per peer")?;
                for run in runs {
                    writeln!(f, "{}:", run.hash)?;
                    for share in &run.shares {
                        writeln!(
                            f,
                            "  {:<24} {:>7} {:>6.2}%  arc {:>6.2}%",
                            share.peer,
                            share.keys,
                            share.share * 100.0,
                            share.arc * 100.0
                        )?;
                    }
                }
                Ok(())
            }
            CommandResult::Churn(report) => {
                writeln!(
                    f,
                    "{} ({}, {} replicas): {}/{} keys moved ({:.2}%)",
                    report.change,
                    report.hash,
                    report.replicas,
                    report.moved,
                    report.samples,
                    report.moved_share * 100.0
                )?;
                if report.crossed > 0 {
                    writeln!(
                        f,
                        "warning: {} keys moved between unchanged peers",
                        report.crossed
                    )?;
                }
                Ok(())
            }
        }
    }
}
