// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{
    AccessPolicy, CredentialVerifier, JsonEntryPoint, TokenManager, UnauthorizedEntryPoint,
};
use crate::session::SessionCache;

#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenManager>,
    pub sessions: Arc<dyn SessionCache>,
    pub credentials: Arc<dyn CredentialVerifier>,
    pub access: Arc<AccessPolicy>,
    pub entry_point: Arc<dyn UnauthorizedEntryPoint>,
}

impl AppState {
    /// `sessions` must be the cache `tokens` was built on; it is kept here
    /// for health probes.
    pub fn new(
        tokens: Arc<TokenManager>,
        sessions: Arc<dyn SessionCache>,
        credentials: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            tokens,
            sessions,
            credentials,
            access: Arc::new(AccessPolicy::service_defaults()),
            entry_point: Arc::new(JsonEntryPoint),
        }
    }

    pub fn with_access_policy(mut self, access: AccessPolicy) -> Self {
        self.access = Arc::new(access);
        self
    }

    pub fn with_entry_point(mut self, entry_point: Arc<dyn UnauthorizedEntryPoint>) -> Self {
        self.entry_point = entry_point;
        self
    }

    /// In-memory state with user `alice` / `wonderland` and a 60 second
    /// token lifetime.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        use crate::auth::StaticCredentials;
        use crate::config::AuthConfig;
        use crate::session::InMemorySessionCache;

        let config = AuthConfig::new(b"test-secret".to_vec(), 60).expect("valid test config");
        let sessions: Arc<dyn SessionCache> = Arc::new(InMemorySessionCache::new(1024));
        let tokens = Arc::new(TokenManager::new(&config, sessions.clone()));
        let credentials = Arc::new(StaticCredentials::new().with_user("alice", "wonderland"));
        Self::new(tokens, sessions, credentials)
    }
}
