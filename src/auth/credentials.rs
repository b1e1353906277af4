// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential verification boundary.
//!
//! User lookup and password policy live outside the token core. The login
//! handler only needs something that turns a username/password pair into a
//! verified principal identifier.

use std::collections::HashMap;

use async_trait::async_trait;
use base64ct::{Base64, Encoding};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::config::{ConfigError, USERS_ENV};

/// Verifies login credentials.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Returns the principal identifier on success.
    async fn verify(&self, username: &str, password: &str) -> Option<String>;
}

/// Fixed user table keyed by username, storing SHA-256 password digests.
///
/// Digests are unsalted, so this store is not for production. It serves
/// development and tests; production deployments plug in their user store
/// behind [`CredentialVerifier`]. Digests are compared in constant time.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    users: HashMap<String, [u8; 32]>,
}

impl StaticCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user from a plaintext password.
    pub fn with_user(mut self, username: impl Into<String>, password: &str) -> Self {
        self.users.insert(username.into(), digest(password));
        self
    }

    /// Parse `user:<base64 sha256>` entries separated by commas.
    pub fn parse(entries: &str) -> Result<Self, ConfigError> {
        let mut users = HashMap::new();
        for entry in entries.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (username, encoded) = entry
                .split_once(':')
                .ok_or(ConfigError::InvalidBase64 { name: USERS_ENV })?;
            let decoded = Base64::decode_vec(encoded.trim())
                .map_err(|_| ConfigError::InvalidBase64 { name: USERS_ENV })?;
            let digest: [u8; 32] = decoded
                .try_into()
                .map_err(|_| ConfigError::InvalidBase64 { name: USERS_ENV })?;
            users.insert(username.trim().to_string(), digest);
        }
        Ok(Self { users })
    }

    /// Load from `AUTH_USERS`; unset means no users.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(USERS_ENV) {
            Ok(entries) => Self::parse(&entries),
            Err(_) => Ok(Self::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl CredentialVerifier for StaticCredentials {
    async fn verify(&self, username: &str, password: &str) -> Option<String> {
        let expected = self.users.get(username)?;
        let matches: bool = expected.as_slice().ct_eq(digest(password).as_slice()).into();
        matches.then(|| username.to_string())
    }
}

fn digest(password: &str) -> [u8; 32] {
    Sha256::digest(password.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn verifies_known_user() {
        let creds = StaticCredentials::new().with_user("alice", "wonderland");
        assert_eq!(
            creds.verify("alice", "wonderland").await.as_deref(),
            Some("alice")
        );
        assert_eq!(creds.verify("alice", "wrong").await, None);
        assert_eq!(creds.verify("bob", "wonderland").await, None);
    }

    #[tokio::test]
    async fn rejects_password_sharing_a_digest_prefix() {
        let creds = StaticCredentials::new().with_user("alice", "wonderland");
        let stored = digest("wonderland");
        let found = (0u32..)
            .map(|i| format!("guess-{i}"))
            .find(|guess| digest(guess)[0] == stored[0])
            .unwrap();
        assert_eq!(creds.verify("alice", &found).await, None);
        assert_eq!(creds.verify("alice", "").await, None);
    }

    #[tokio::test]
    async fn parses_digest_list() {
        let encoded = Base64::encode_string(&digest("wonderland"));
        let creds = StaticCredentials::parse(&format!("alice:{encoded}, ")).unwrap();
        assert_eq!(creds.len(), 1);
        assert!(creds.verify("alice", "wonderland").await.is_some());
    }

    #[test]
    fn rejects_bad_entries() {
        assert!(StaticCredentials::parse("alice").is_err());
        assert!(StaticCredentials::parse("alice:!!!").is_err());
        // Valid base64, wrong length
        assert!(StaticCredentials::parse("alice:c2hvcnQ=").is_err());
        assert!(StaticCredentials::parse("").unwrap().is_empty());
    }
}
