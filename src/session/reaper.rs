// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Session Reaper
//!
//! Background task that periodically purges expired entries from the
//! in-process session cache. Reads already ignore expired entries; the
//! sweep only bounds memory held by sessions nobody presents again.
//!
//! ## Shutdown
//!
//! Uses `tokio_util::sync::CancellationToken` for graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::InMemorySessionCache;
use crate::config::DEFAULT_REAPER_INTERVAL;

/// Periodic expiry sweep over an [`InMemorySessionCache`].
pub struct SessionReaper {
    cache: Arc<InMemorySessionCache>,
    interval: Duration,
}

impl SessionReaper {
    pub fn new(cache: Arc<InMemorySessionCache>) -> Self {
        Self {
            cache,
            interval: DEFAULT_REAPER_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Run until the cancellation token is triggered.
    ///
    /// ```rust,ignore
    /// tokio::spawn(reaper.run(shutdown.clone()));
    /// ```
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            interval_secs = self.interval.as_secs(),
            "Session reaper starting"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {},
                _ = shutdown.cancelled() => {
                    info!("Session reaper shutting down");
                    return;
                }
            }

            self.sweep();
        }
    }

    /// One purge pass. Returns the number of entries removed.
    pub fn sweep(&self) -> usize {
        let removed = self.cache.purge_expired();
        if removed > 0 {
            debug!(removed, remaining = self.cache.len(), "Purged expired sessions");
        }
        removed
    }
}
