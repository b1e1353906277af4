// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values, and the
//! immutable [`AuthConfig`] value injected into the token manager. Configuration
//! is loaded from the environment once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `AUTH_SECRET_KEY` | Base64-encoded HMAC key material | Required |
//! | `AUTH_EXPIRE_TIME_SECONDS` | Token lifetime in seconds | `86400` |
//! | `SESSION_CACHE_TIMEOUT_MS` | Upper bound on a single cache call | `500` |
//! | `SESSION_CACHE_CAPACITY` | Max live sessions held in process | `100000` |
//! | `SESSION_REAPER_INTERVAL_SECONDS` | Active expiry sweep interval | `60` |
//! | `AUTH_USERS` | Dev credentials, `user:<base64 sha256>` comma separated | empty |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::time::Duration;

use base64ct::{Base64, Encoding};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const SECRET_KEY_ENV: &str = "AUTH_SECRET_KEY";
pub const EXPIRE_TIME_ENV: &str = "AUTH_EXPIRE_TIME_SECONDS";
pub const CACHE_TIMEOUT_ENV: &str = "SESSION_CACHE_TIMEOUT_MS";
pub const CACHE_CAPACITY_ENV: &str = "SESSION_CACHE_CAPACITY";
pub const REAPER_INTERVAL_ENV: &str = "SESSION_REAPER_INTERVAL_SECONDS";
pub const USERS_ENV: &str = "AUTH_USERS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default token lifetime (one day).
pub const DEFAULT_EXPIRE_TIME_SECONDS: u64 = 86_400;

/// Default bound on a single session cache call.
pub const DEFAULT_CACHE_TIMEOUT: Duration = Duration::from_millis(500);

pub const DEFAULT_CACHE_CAPACITY: usize = 100_000;

pub const DEFAULT_REAPER_INTERVAL: Duration = Duration::from_secs(60);

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("{name} is not valid base64")]
    InvalidBase64 { name: &'static str },

    #[error("{name} must not be empty")]
    Empty { name: &'static str },

    #[error("{name} must be a positive integer, got {value:?}")]
    NotPositive { name: &'static str, value: String },
}

/// Token signing and session settings.
///
/// Built once at startup and shared read-only; nothing in the token core
/// looks configuration up from the environment after this point.
#[derive(Clone)]
pub struct AuthConfig {
    secret_key: Vec<u8>,
    expire_time: Duration,
    cache_timeout: Duration,
}

impl AuthConfig {
    /// Create a configuration from already-decoded key material.
    pub fn new(secret_key: Vec<u8>, expire_time_seconds: u64) -> Result<Self, ConfigError> {
        if secret_key.is_empty() {
            return Err(ConfigError::Empty {
                name: SECRET_KEY_ENV,
            });
        }
        if expire_time_seconds == 0 {
            return Err(ConfigError::NotPositive {
                name: EXPIRE_TIME_ENV,
                value: "0".to_string(),
            });
        }
        Ok(Self {
            secret_key,
            expire_time: Duration::from_secs(expire_time_seconds),
            cache_timeout: DEFAULT_CACHE_TIMEOUT,
        })
    }

    /// Create a configuration from a base64-encoded secret.
    pub fn from_base64(secret_key: &str, expire_time_seconds: u64) -> Result<Self, ConfigError> {
        let decoded = Base64::decode_vec(secret_key.trim()).map_err(|_| ConfigError::InvalidBase64 {
            name: SECRET_KEY_ENV,
        })?;
        Self::new(decoded, expire_time_seconds)
    }

    /// Load from `AUTH_SECRET_KEY`, `AUTH_EXPIRE_TIME_SECONDS` and
    /// `SESSION_CACHE_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = std::env::var(SECRET_KEY_ENV).map_err(|_| ConfigError::Missing(SECRET_KEY_ENV))?;
        let expire = env_positive(EXPIRE_TIME_ENV)?.unwrap_or(DEFAULT_EXPIRE_TIME_SECONDS);
        let mut config = Self::from_base64(&secret, expire)?;
        if let Some(ms) = env_positive(CACHE_TIMEOUT_ENV)? {
            config.cache_timeout = Duration::from_millis(ms);
        }
        Ok(config)
    }

    /// Override the cache call timeout.
    pub fn with_cache_timeout(mut self, timeout: Duration) -> Self {
        self.cache_timeout = timeout;
        self
    }

    pub fn secret_key(&self) -> &[u8] {
        &self.secret_key
    }

    pub fn expire_time(&self) -> Duration {
        self.expire_time
    }

    pub fn cache_timeout(&self) -> Duration {
        self.cache_timeout
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material
        f.debug_struct("AuthConfig")
            .field("secret_key", &"***")
            .field("expire_time", &self.expire_time)
            .field("cache_timeout", &self.cache_timeout)
            .finish()
    }
}

/// Read an optional positive integer from the environment.
pub fn env_positive(name: &'static str) -> Result<Option<u64>, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => parse_positive(name, &raw).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_positive(name: &'static str, raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigError::NotPositive {
            name,
            value: raw.to_string(),
        }),
    }
}
