// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication enforcement filter.
//!
//! Runs once per request, before routing to handlers:
//!
//! 1. No bearer token → continue unauthenticated; the [`Auth`](super::Auth)
//!    extractor decides whether the handler needs a principal.
//! 2. Token validates → insert [`Principal`] into the request extensions.
//! 3. Token expired or invalid → on a permit-all route continue without a
//!    principal (recording a [`TokenRejection`]); otherwise hand over to the
//!    unauthorized entry point.
//!
//! A session store outage is answered with 503 and never treated as a bad
//! token. The filter never retries.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/protected", get(protected_handler))
//!     .layer(axum::middleware::from_fn_with_state(state.clone(), authenticate))
//!     .with_state(state);
//! ```

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use super::{manager::TokenState, AuthError, Principal};
use crate::state::AppState;

/// Why a presented token was not accepted on a permit-all route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenRejection(pub TokenState);

/// Extract the token from `Authorization: Bearer <token>`.
///
/// Any other scheme, or an empty token, counts as no token.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Authentication filter middleware.
pub async fn authenticate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let token = match bearer_token(request.headers()) {
        Some(token) => token.to_owned(),
        None => return next.run(request).await,
    };

    match state.tokens.validate(&token).await {
        Ok(subject) => {
            request.extensions_mut().insert(Principal::new(subject));
            next.run(request).await
        }
        Err(err) => {
            let Some(reason) = err.state() else {
                warn!(error = %err, "Authentication aborted by session store failure");
                return AuthError::from(err).into_response();
            };

            let path = request.uri().path().to_owned();
            if state.access.is_permitted(request.method(), &path) {
                debug!(path = %path, reason = %reason, "Ignoring rejected token on public route");
                request.extensions_mut().insert(TokenRejection(reason));
                next.run(request).await
            } else {
                state.entry_point.commence(&path, Some(reason))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers_with("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers_with("bearer  abc ")), Some("abc"));
    }

    #[test]
    fn ignores_other_schemes_and_empty_tokens() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers_with("Basic dXNlcjpwdw==")), None);
        assert_eq!(bearer_token(&headers_with("Bearer")), None);
        assert_eq!(bearer_token(&headers_with("Bearer   ")), None);
    }
}
