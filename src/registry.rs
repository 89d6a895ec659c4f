//! Client registry - identity -> (token bucket, last seen)
//!
//! Backed by a sharded `DashMap`, so requests for different identities only
//! contend when they hash to the same shard. `get_or_create` and
//! `evict_idle_older_than` are the only mutation points.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::config::LimiterConfig;
use crate::rate_limit::TokenBucket;

pub struct ClientEntry {
    pub bucket: Arc<TokenBucket>,
    pub last_seen: Instant,
}

pub struct ClientRegistry {
    clients: DashMap<String, ClientEntry>,
    capacity: u32,
    refill_rate: f64,
}

impl ClientRegistry {
    pub fn new(capacity: u32, refill_rate: f64) -> Self {
        Self {
            clients: DashMap::new(),
            capacity,
            refill_rate,
        }
    }

    pub fn from_config(config: &LimiterConfig) -> Self {
        Self::new(config.capacity, config.refill_rate)
    }

    /// Returns the bucket for `identity`, creating it on first sight, and
    /// refreshes the entry's `last_seen`.
    pub fn get_or_create(&self, identity: &str) -> Arc<TokenBucket> {
        self.get_or_create_at(identity, Instant::now())
    }

    pub fn get_or_create_at(&self, identity: &str, now: Instant) -> Arc<TokenBucket> {
        // fast path, no key allocation; guard must drop before `entry` below
        if let Some(mut entry) = self.clients.get_mut(identity) {
            touch(&mut entry, now);
            return Arc::clone(&entry.bucket);
        }

        // entry() holds the shard write lock across check and insert, so two
        // first requests for one identity end up sharing a single bucket
        let mut entry = self
            .clients
            .entry(identity.to_string())
            .or_insert_with(|| {
                tracing::debug!(identity, "new client");
                ClientEntry {
                    bucket: Arc::new(TokenBucket::new_at(self.capacity, self.refill_rate, now)),
                    last_seen: now,
                }
            });
        touch(&mut entry, now);
        Arc::clone(&entry.bucket)
    }

    /// Removes every entry whose `last_seen` is more than `threshold` ago.
    /// Returns how many were removed.
    pub fn evict_idle_older_than(&self, threshold: Duration) -> usize {
        self.evict_idle_older_than_at(threshold, Instant::now())
    }

    pub fn evict_idle_older_than_at(&self, threshold: Duration, now: Instant) -> usize {
        let mut removed = 0;
        // retain decides under each shard's write lock, so a concurrent touch
        // is either seen here or lands after the entry is gone
        self.clients.retain(|_, entry| {
            let keep = now.saturating_duration_since(entry.last_seen) <= threshold;
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.clients.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn last_seen(&self, identity: &str) -> Option<Instant> {
        self.clients.get(identity).map(|entry| entry.last_seen)
    }
}

fn touch(entry: &mut ClientEntry, now: Instant) {
    if now > entry.last_seen {
        entry.last_seen = now;
    }
}
