// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, net::SocketAddr, sync::Arc, time::Duration};

use session_token_server::{
    api::router,
    auth::{StaticCredentials, TokenManager},
    config::{
        env_positive, AuthConfig, CACHE_CAPACITY_ENV, DEFAULT_CACHE_CAPACITY, HOST_ENV,
        LOG_FORMAT_ENV, PORT_ENV, REAPER_INTERVAL_ENV,
    },
    session::{InMemorySessionCache, SessionCache, SessionReaper},
    state::AppState,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AuthConfig::from_env().expect("Invalid authentication configuration");
    let capacity = env_positive(CACHE_CAPACITY_ENV)
        .expect("Invalid session cache capacity")
        .map(|c| c as usize)
        .unwrap_or(DEFAULT_CACHE_CAPACITY);
    let reaper_interval = env_positive(REAPER_INTERVAL_ENV)
        .expect("Invalid session reaper interval")
        .map(Duration::from_secs);

    let credentials = StaticCredentials::from_env().expect("Invalid AUTH_USERS entry");
    if credentials.is_empty() {
        warn!("No users configured; every login will be rejected");
    }

    // Initialize session store and token manager
    let cache = Arc::new(InMemorySessionCache::new(capacity));
    let sessions: Arc<dyn SessionCache> = cache.clone();
    let tokens = Arc::new(TokenManager::new(&config, sessions.clone()));
    let state = AppState::new(tokens, sessions, Arc::new(credentials));
    let app = router(state);

    let shutdown = CancellationToken::new();
    let mut reaper = SessionReaper::new(cache);
    if let Some(interval) = reaper_interval {
        reaper = reaper.with_interval(interval);
    }
    let reaper_handle = tokio::spawn(reaper.run(shutdown.clone()));

    // Parse bind address
    let host = env::var(HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var(PORT_ENV)
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    info!(
        %addr,
        expire_secs = config.expire_time().as_secs(),
        capacity,
        "Session token server listening (docs at /docs)"
    );

    let signal = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for shutdown signal");
            }
            signal.cancel();
        })
        .await
        .expect("HTTP server failed");

    shutdown.cancel();
    if let Err(e) = reaper_handle.await {
        warn!(error = %e, "Session reaper did not shut down cleanly");
    }
    info!("Server stopped");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let json = env::var(LOG_FORMAT_ENV)
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
