// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for the authenticated principal.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(principal): Auth) -> impl IntoResponse {
//!     // principal.subject is the authenticated user
//! }
//! ```
//!
//! The principal is placed in the request extensions by the
//! [`authenticate`](super::middleware::authenticate) filter; the extractor
//! only reads it back.

use axum::{extract::FromRequestParts, http::request::Parts, response::Response};

use super::{middleware::TokenRejection, Principal};
use crate::state::AppState;

/// Extractor for an authenticated principal.
///
/// Rejects through the configured unauthorized entry point when the filter
/// did not bind a principal to the request.
pub struct Auth(pub Principal);

impl FromRequestParts<AppState> for Auth {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(principal) = parts.extensions.get::<Principal>().cloned() {
            return Ok(Auth(principal));
        }

        let reason = parts.extensions.get::<TokenRejection>().map(|r| r.0);
        Err(state.entry_point.commence(parts.uri.path(), reason))
    }
}
