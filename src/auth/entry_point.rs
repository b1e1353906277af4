// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Unauthorized entry point.
//!
//! Produces the rejection response whenever a protected resource is reached
//! without a valid principal. The token core only hands over the reason.

use axum::response::{IntoResponse, Response};
use tracing::debug;

use super::error::AuthError;
use super::manager::TokenState;

/// Builds the response for an unauthorized request.
pub trait UnauthorizedEntryPoint: Send + Sync {
    /// `reason` is `None` when no token was presented at all.
    fn commence(&self, path: &str, reason: Option<TokenState>) -> Response;
}

/// Default entry point: 401 with the JSON [`AuthError`] body.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEntryPoint;

impl UnauthorizedEntryPoint for JsonEntryPoint {
    fn commence(&self, path: &str, reason: Option<TokenState>) -> Response {
        debug!(path, reason = ?reason, "Rejecting unauthorized request");
        match reason {
            Some(state) => AuthError::from(state).into_response(),
            None => AuthError::Unauthenticated.into_response(),
        }
    }
}
