//! Integration tests for the peer ring.
//!
//! # Test Strategy
//!
//! 1. **Basic functionality**: Empty ring, add/lookup, remove, identity lookup
//! 2. **Multiple peers**: Coverage, determinism, distribution
//! 3. **Membership churn**: Keys move only to/from the changed peer
//! 4. **Thread safety**: Lookups racing membership changes

use peer_ring::hash::{Crc32, Fnv1_32, Fnv1a32, HashFunction, Sip13, Xxh3};
use peer_ring::{ConsistentHash, Peer, PeerInfo, RingError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

const HOSTS: [&str; 3] = ["a.svc.local", "b.svc.local", "c.svc.local"];
const SAMPLES: usize = 10_000;

/// A richer peer type, standing in for a transport client.
#[derive(Debug)]
struct PeerClient {
    info: PeerInfo,
    shard: usize,
}

impl Peer for PeerClient {
    fn info(&self) -> &PeerInfo {
        &self.info
    }
}

fn client(address: &str, shard: usize) -> Arc<PeerClient> {
    Arc::new(PeerClient {
        info: PeerInfo::new(address),
        shard,
    })
}

fn ring_with(hosts: &[&str], hasher: Option<Arc<dyn HashFunction>>) -> ConsistentHash<PeerInfo> {
    let ring = ConsistentHash::new(hasher);
    for host in hosts {
        ring.add(Arc::new(PeerInfo::new(*host)));
    }
    ring
}

/// IPv4-shaped keys in 192.0.0.0/8, seeded for repeatability.
fn ip_keys(count: usize, seed: u64) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let r: u32 = rng.gen();
            format!("192.{}.{}.{}", (r >> 16) as u8, (r >> 8) as u8, r as u8)
        })
        .collect()
}

fn owners(ring: &ConsistentHash<PeerInfo>, keys: &[String]) -> Vec<String> {
    keys.iter()
        .map(|k| ring.get(k).expect("ring is populated").address.clone())
        .collect()
}

// ============================================================================
// Basic Functionality Tests
// ============================================================================

#[test]
fn test_empty_ring_lookup() {
    let ring = ConsistentHash::<PeerInfo>::new(None);
    assert_eq!(ring.get("a").unwrap_err(), RingError::EmptyRing);
    assert_eq!(ring.get("").unwrap_err(), RingError::EmptyRing);
    assert_eq!(ring.size(), 0);
    assert_eq!(ring.vnode_count(), 0);
}

#[test]
fn test_empty_again_after_removing_everything() {
    let ring = ring_with(&HOSTS, None);
    for host in HOSTS {
        assert!(ring.remove(&PeerInfo::new(host)));
    }
    assert_eq!(ring.get("foobar").unwrap_err(), RingError::EmptyRing);
}

#[test]
fn test_size() {
    let ring = ring_with(&HOSTS, None);
    assert_eq!(ring.size(), HOSTS.len());

    // Size counts physical peers, whatever the replica count.
    let small = ConsistentHash::with_replicas(None, 3);
    for host in HOSTS {
        small.add(Arc::new(PeerInfo::new(host)));
    }
    assert_eq!(small.size(), HOSTS.len());
    assert_eq!(small.vnode_count(), 9);
}

#[test]
fn test_get_by_peer_info_returns_exact_object() {
    let ring = ConsistentHash::new(None);
    let mut by_host = HashMap::new();
    for (i, host) in HOSTS.iter().enumerate() {
        let peer = client(host, i);
        ring.add(Arc::clone(&peer));
        by_host.insert(*host, peer);
    }

    for (host, peer) in &by_host {
        let got = ring.get_by_peer_info(&PeerInfo::new(*host)).unwrap();
        assert!(Arc::ptr_eq(&got, peer), "should return the object passed to add");
        assert_eq!(got.shard, peer.shard);
    }
}

#[test]
fn test_get_by_peer_info_not_found() {
    let ring = ring_with(&HOSTS, None);

    assert_eq!(
        ring.get_by_peer_info(&PeerInfo::new("d.svc.local")).unwrap_err(),
        RingError::PeerNotFound {
            address: "d.svc.local".to_string()
        }
    );

    ring.remove(&PeerInfo::new("b.svc.local"));
    assert!(matches!(
        ring.get_by_peer_info(&PeerInfo::new("b.svc.local")),
        Err(RingError::PeerNotFound { .. })
    ));
}

#[test]
fn test_idempotent_add() {
    let ring = ring_with(&HOSTS, None);
    let keys = ip_keys(1_000, 7);
    let before = owners(&ring, &keys);
    let vnodes = ring.vnode_count();

    for host in HOSTS {
        assert!(!ring.add(Arc::new(PeerInfo::new(host))));
    }

    assert_eq!(ring.size(), HOSTS.len());
    assert_eq!(ring.vnode_count(), vnodes);
    assert_eq!(owners(&ring, &keys), before);
}

#[test]
fn test_add_remove_add() {
    let ring = ring_with(&HOSTS, None);
    let keys = ip_keys(1_000, 11);
    let before = owners(&ring, &keys);

    ring.remove(&PeerInfo::new("c.svc.local"));
    ring.add(Arc::new(PeerInfo::new("c.svc.local")));

    // Placement depends only on membership, so the old mapping is restored.
    assert_eq!(owners(&ring, &keys), before);
}

// ============================================================================
// Multiple Peers Tests
// ============================================================================

#[test]
fn test_coverage_and_determinism() {
    let ring = ring_with(&HOSTS, None);

    for key in ["a", "foobar", "192.168.1.2", "5f46bb53-6c30-49dc-adb4-b7355058adb6"] {
        let first = ring.get(key).unwrap();
        assert!(HOSTS.contains(&first.address.as_str()), "{key} mapped outside the ring");
        for _ in 0..10 {
            assert_eq!(ring.get(key).unwrap().address, first.address);
        }
    }
}

#[test]
fn test_independent_rings_agree() {
    // No hidden shared state: two rings with equal membership route identically.
    let keys = ip_keys(1_000, 3);
    let one = ring_with(&HOSTS, None);
    let two = ring_with(&["c.svc.local", "a.svc.local", "b.svc.local"], None);
    assert_eq!(owners(&one, &keys), owners(&two, &keys));
}

#[test]
fn test_distribution() {
    let keys = ip_keys(SAMPLES, 42);
    let hashers: Vec<Arc<dyn HashFunction>> = vec![
        Arc::new(Crc32),
        Arc::new(Fnv1_32),
        Arc::new(Fnv1a32),
        Arc::new(Xxh3),
        Arc::new(Sip13),
    ];

    for hasher in hashers {
        let name = hasher.name();
        let ring = ring_with(&HOSTS, Some(hasher));
        let mut counts: HashMap<String, usize> = HashMap::new();
        for owner in owners(&ring, &keys) {
            *counts.entry(owner).or_default() += 1;
        }

        assert_eq!(counts.len(), HOSTS.len(), "{name}: every peer should own keys");
        for (host, count) in counts {
            let share = count as f64 / SAMPLES as f64;
            assert!(
                (0.20..=0.45).contains(&share),
                "{name}: {host} received {share:.3} of keys"
            );
        }
    }
}

// ============================================================================
// Membership Churn Tests
// ============================================================================

#[test]
fn test_minimal_disruption_on_removal() {
    let keys = ip_keys(SAMPLES, 1);
    let ring = ring_with(&HOSTS, None);
    let before = owners(&ring, &keys);

    ring.remove(&PeerInfo::new("c.svc.local"));
    let after = owners(&ring, &keys);

    for (old, new) in before.iter().zip(&after) {
        if old != "c.svc.local" {
            assert_eq!(old, new, "a key owned by a surviving peer moved");
        } else {
            assert_ne!(new, "c.svc.local");
        }
    }
}

#[test]
fn test_minimal_disruption_on_addition() {
    let keys = ip_keys(SAMPLES, 2);
    let ring = ring_with(&HOSTS[..2], None);
    let before = owners(&ring, &keys);

    ring.add(Arc::new(PeerInfo::new("c.svc.local")));
    let after = owners(&ring, &keys);

    let mut moved = 0;
    for (old, new) in before.iter().zip(&after) {
        if old != new {
            assert_eq!(new, "c.svc.local", "a key moved between existing peers");
            moved += 1;
        }
    }
    assert!(moved > 0, "the new peer should take over some keys");
}

#[test]
fn test_set_peers_matches_incremental_adds() {
    let keys = ip_keys(1_000, 5);
    let incremental = ring_with(&HOSTS, None);

    let bulk = ConsistentHash::new(None);
    bulk.add(Arc::new(PeerInfo::new("z.svc.local")));
    bulk.set_peers(HOSTS.iter().map(|h| Arc::new(PeerInfo::new(*h))));

    assert_eq!(bulk.size(), HOSTS.len());
    assert_eq!(owners(&bulk, &keys), owners(&incremental, &keys));
}

// ============================================================================
// Thread Safety Tests
// ============================================================================

#[test]
fn test_concurrent_lookups_during_churn() {
    let ring = Arc::new(ConsistentHash::with_replicas(None, 64));
    ring.add(Arc::new(PeerInfo::new("a.svc.local")));
    ring.add(Arc::new(PeerInfo::new("b.svc.local")));
    let stop = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|t| {
            let ring = Arc::clone(&ring);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let keys = ip_keys(500, t);
                while !stop.load(Ordering::Relaxed) {
                    for key in &keys {
                        let owner = ring.get(key).expect("a and b are never removed");
                        assert!(HOSTS.contains(&owner.address.as_str()));
                    }
                }
            })
        })
        .collect();

    let c = PeerInfo::new("c.svc.local");
    for _ in 0..200 {
        ring.add(Arc::new(c.clone()));
        assert_eq!(ring.size(), 3);
        ring.remove(&c);
        assert_eq!(ring.size(), 2);
    }
    stop.store(true, Ordering::Relaxed);

    for reader in readers {
        reader.join().expect("reader panicked");
    }
    assert_eq!(ring.vnode_count(), 128);
}
