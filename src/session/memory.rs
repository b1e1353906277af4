// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process session cache.
//!
//! Entries live in a fixed set of LRU shards, each behind its own mutex, so
//! operations on unrelated tokens rarely contend. A key always maps to the
//! same shard, which is what makes same-key operations linearizable.
//!
//! Expiry is lazy (checked on read) plus an optional active sweep through
//! [`InMemorySessionCache::purge_expired`], driven by the
//! [`SessionReaper`](super::SessionReaper).
//!
//! Capacity is bounded. A full shard first drops its expired entries; only
//! when every entry is still live is the least recently used session
//! evicted, which logs that principal out early.

use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lru::LruCache;

use super::{CacheError, SessionCache};
use crate::auth::clock::{Clock, SystemClock};

const SHARD_COUNT: usize = 16;

/// Cached session: bound principal + absolute expiry.
struct SessionEntry {
    principal: String,
    expires_at: DateTime<Utc>,
}

impl SessionEntry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Sharded in-process LRU session store with per-entry TTL.
pub struct InMemorySessionCache {
    shards: Vec<Mutex<LruCache<String, SessionEntry>>>,
    hasher: RandomState,
    clock: Arc<dyn Clock>,
}

impl InMemorySessionCache {
    /// Create a cache holding at most roughly `capacity` sessions, measuring
    /// TTLs against the wall clock.
    pub fn new(capacity: usize) -> Self {
        Self::with_clock(capacity, Arc::new(SystemClock))
    }

    /// Create a cache that measures TTLs against `clock`.
    pub fn with_clock(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        let per_shard = capacity.div_ceil(SHARD_COUNT).max(1);
        let per_shard = NonZeroUsize::new(per_shard).unwrap_or(NonZeroUsize::MIN);
        Self {
            shards: (0..SHARD_COUNT)
                .map(|_| Mutex::new(LruCache::new(per_shard)))
                .collect(),
            hasher: RandomState::new(),
            clock,
        }
    }

    fn shard_index(&self, key: &str) -> usize {
        (self.hasher.hash_one(key) as usize) % self.shards.len()
    }

    fn shard(&self, key: &str) -> Result<MutexGuard<'_, LruCache<String, SessionEntry>>, CacheError> {
        self.shards[self.shard_index(key)]
            .lock()
            .map_err(|_| CacheError::Unavailable("session shard lock poisoned".to_string()))
    }

    fn expiry_for(&self, ttl: Duration) -> DateTime<Utc> {
        let now = self.clock.now();
        chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut removed = 0;
        for shard in &self.shards {
            let Ok(mut cache) = shard.lock() else {
                continue;
            };
            removed += drop_expired(&mut cache, now);
        }
        removed
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .filter_map(|shard| shard.lock().ok().map(|cache| cache.len()))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn drop_expired(cache: &mut LruCache<String, SessionEntry>, now: DateTime<Utc>) -> usize {
    let expired: Vec<String> = cache
        .iter()
        .filter(|(_, entry)| !entry.is_live(now))
        .map(|(key, _)| key.clone())
        .collect();
    for key in &expired {
        cache.pop(key);
    }
    expired.len()
}

impl Default for InMemorySessionCache {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_CACHE_CAPACITY)
    }
}

#[async_trait]
impl SessionCache for InMemorySessionCache {
    async fn put_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let now = self.clock.now();
        let entry = SessionEntry {
            principal: value.to_string(),
            expires_at: self.expiry_for(ttl),
        };
        let mut cache = self.shard(key)?;
        // LRU eviction must never pick a live session while dead ones remain
        if cache.len() >= cache.cap().get() && !cache.contains(key) {
            drop_expired(&mut cache, now);
        }
        cache.put(key.to_string(), entry);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = self.clock.now();
        let mut cache = self.shard(key)?;
        if let Some(entry) = cache.get(key) {
            if entry.is_live(now) {
                return Ok(Some(entry.principal.clone()));
            }
            // Expired, drop it
            cache.pop(key);
        }
        Ok(None)
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.shard(key)?.pop(key);
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        for shard in &self.shards {
            shard
                .lock()
                .map_err(|_| CacheError::Unavailable("session shard lock poisoned".to_string()))?;
        }
        Ok(())
    }
}
