// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token manager: issue, validate and revoke session tokens.
//!
//! The codec answers "is this token well-formed, authentic and unexpired";
//! the session cache answers "is it still live". A token must pass both.
//! The cache therefore acts as an inverted revocation list: presence means
//! allowed, and logout is a delete.
//!
//! The manager holds no lock of its own. Per-key linearizability of the
//! cache is all that concurrent issue/validate/revoke calls rely on.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use super::clock::{Clock, SystemClock};
use super::codec::{CodecError, TokenCodec};
use crate::config::AuthConfig;
use crate::session::{CacheError, SessionCache};

/// Coarse reason reported to the unauthorized entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    Expire,
    Invalid,
}

impl TokenState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenState::Expire => "EXPIRE",
            TokenState::Invalid => "INVALID",
        }
    }
}

impl std::fmt::Display for TokenState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures surfaced by the token manager.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Claims-level expiry exceeded
    #[error("token has expired")]
    TokenExpired,

    /// Bad signature, malformed structure, or no live session
    #[error("token is invalid")]
    TokenInvalid,

    /// Issuance was asked for an unusable subject
    #[error("cannot encode token: {0}")]
    EncodingError(String),

    /// Transient infrastructure failure; says nothing about the token
    #[error("session cache unavailable: {0}")]
    CacheUnavailable(String),
}

impl TokenError {
    /// Reason string for auth-specific failures, `None` for the rest.
    pub fn state(&self) -> Option<TokenState> {
        match self {
            TokenError::TokenExpired => Some(TokenState::Expire),
            TokenError::TokenInvalid => Some(TokenState::Invalid),
            TokenError::EncodingError(_) | TokenError::CacheUnavailable(_) => None,
        }
    }
}

impl From<CacheError> for TokenError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::Unavailable(msg) => TokenError::CacheUnavailable(msg),
        }
    }
}

/// Issues, validates and revokes bearer tokens.
pub struct TokenManager {
    codec: TokenCodec,
    cache: Arc<dyn SessionCache>,
    clock: Arc<dyn Clock>,
    expire_time: Duration,
    cache_timeout: Duration,
}

impl TokenManager {
    pub fn new(config: &AuthConfig, cache: Arc<dyn SessionCache>) -> Self {
        Self::with_clock(config, cache, Arc::new(SystemClock))
    }

    /// Build a manager on an explicit clock. The session cache should
    /// measure TTLs against the same clock.
    pub fn with_clock(config: &AuthConfig, cache: Arc<dyn SessionCache>, clock: Arc<dyn Clock>) -> Self {
        Self {
            codec: TokenCodec::new(config.secret_key()),
            cache,
            clock,
            expire_time: config.expire_time(),
            cache_timeout: config.cache_timeout(),
        }
    }

    /// Token lifetime applied at issuance.
    pub fn expire_time(&self) -> Duration {
        self.expire_time
    }

    /// Upper bound applied to every session cache call.
    pub fn cache_timeout(&self) -> Duration {
        self.cache_timeout
    }

    /// Issue a token for an already-verified principal and open its session.
    pub async fn issue(&self, subject: &str) -> Result<String, TokenError> {
        let issued_at = self.clock.now();
        let expires_at = chrono::Duration::from_std(self.expire_time)
            .ok()
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
            .ok_or_else(|| TokenError::EncodingError("token lifetime out of range".to_string()))?;

        let token = self
            .codec
            .encode(subject, issued_at, expires_at)
            .map_err(|e| TokenError::EncodingError(e.to_string()))?;

        self.bounded(
            "put_with_expiry",
            self.cache.put_with_expiry(&token, subject, self.expire_time),
        )
        .await?;

        debug!(
            subject = %subject,
            expires_at = %expires_at,
            "Issued session token"
        );
        Ok(token)
    }

    /// Resolve a presented token to its principal.
    ///
    /// Does not extend the session.
    pub async fn validate(&self, token: &str) -> Result<String, TokenError> {
        let claims = self
            .codec
            .decode(token, self.clock.now())
            .map_err(|e| {
                debug!(cause = %e, "Token rejected by codec");
                match e {
                    CodecError::TokenExpired => TokenError::TokenExpired,
                    _ => TokenError::TokenInvalid,
                }
            })?;

        match self.bounded("get", self.cache.get(token)).await? {
            Some(principal) => Ok(principal),
            None => {
                debug!(subject = %claims.subject(), "Token has no live session");
                Err(TokenError::TokenInvalid)
            }
        }
    }

    /// End a session. Succeeds whether or not the token was ever live.
    pub async fn revoke(&self, token: &str) -> Result<(), TokenError> {
        self.bounded("delete", self.cache.delete(token)).await
    }

    /// Apply the cache timeout and translate cache failures.
    async fn bounded<T>(
        &self,
        op: &'static str,
        call: impl Future<Output = Result<T, CacheError>>,
    ) -> Result<T, TokenError> {
        match tokio::time::timeout(self.cache_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                warn!(op, error = %e, "Session cache call failed");
                Err(e.into())
            }
            Err(_) => {
                warn!(
                    op,
                    timeout_ms = self.cache_timeout.as_millis() as u64,
                    "Session cache call timed out"
                );
                Err(TokenError::CacheUnavailable(format!(
                    "{op} timed out after {}ms",
                    self.cache_timeout.as_millis()
                )))
            }
        }
    }
}
