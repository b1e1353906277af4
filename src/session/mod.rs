// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Session Cache
//!
//! Key-value store mapping an opaque token string to the principal it was
//! issued to, with a per-entry absolute expiry.
//!
//! Presence of an entry is the authoritative "token is live" marker: the
//! token manager treats a well-formed, correctly signed, unexpired token
//! with no entry here as invalid. Deleting the entry is how logout works.
//!
//! ## Contract
//!
//! - `put_with_expiry` overwrites unconditionally and is visible to `get`
//!   immediately; the entry is gone once its TTL elapses.
//! - `get` never blocks indefinitely; `None` is a normal outcome.
//! - `delete` is idempotent.
//! - Operations on the same key are linearizable. Nothing is promised
//!   across keys.
//!
//! [`InMemorySessionCache`] is the in-process implementation. A networked
//! store can be plugged in by implementing [`SessionCache`].

use std::time::Duration;

use async_trait::async_trait;

pub mod memory;
pub mod reaper;

pub use memory::InMemorySessionCache;
pub use reaper::SessionReaper;

/// Session cache failure.
///
/// Always transient from the caller's point of view; never a statement about
/// the token itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    #[error("session cache unavailable: {0}")]
    Unavailable(String),
}

/// Capability interface for the session store.
#[async_trait]
pub trait SessionCache: Send + Sync + 'static {
    /// Store `value` under `key`, replacing any previous entry, expiring
    /// after `ttl`.
    async fn put_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Look up a live entry.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Remove an entry. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Cheap reachability check used by the readiness endpoint. Must
    /// actually reach the backing store.
    async fn ping(&self) -> Result<(), CacheError>;
}
