// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors as seen by HTTP clients.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::manager::{TokenError, TokenState};

/// Authentication error type.
///
/// Token-level failures collapse to `TokenExpired` / `TokenInvalid`; a
/// session store outage stays distinct so it is answered with a 503 rather
/// than a 401.
#[derive(Debug)]
pub enum AuthError {
    /// No authenticated principal on a protected route
    Unauthenticated,
    /// Token claims have expired
    TokenExpired,
    /// Token is malformed, forged, or its session is gone
    TokenInvalid,
    /// Username/password pair rejected
    InvalidCredentials,
    /// Issuance refused the subject
    InvalidSubject(String),
    /// Session cache unreachable or timed out
    SessionStoreUnavailable(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Unauthenticated => "unauthenticated",
            AuthError::TokenExpired => "token_expired",
            AuthError::TokenInvalid => "token_invalid",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::InvalidSubject(_) => "invalid_subject",
            AuthError::SessionStoreUnavailable(_) => "session_store_unavailable",
        }
    }

    /// Token state reason (`EXPIRE` / `INVALID`) for token rejections.
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            AuthError::TokenExpired => Some(TokenState::Expire.as_str()),
            AuthError::TokenInvalid => Some(TokenState::Invalid.as_str()),
            _ => None,
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Unauthenticated
            | AuthError::TokenExpired
            | AuthError::TokenInvalid
            | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::InvalidSubject(_) => StatusCode::BAD_REQUEST,
            AuthError::SessionStoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<TokenState> for AuthError {
    fn from(state: TokenState) -> Self {
        match state {
            TokenState::Expire => AuthError::TokenExpired,
            TokenState::Invalid => AuthError::TokenInvalid,
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::TokenExpired => AuthError::TokenExpired,
            TokenError::TokenInvalid => AuthError::TokenInvalid,
            TokenError::EncodingError(msg) => AuthError::InvalidSubject(msg),
            TokenError::CacheUnavailable(msg) => AuthError::SessionStoreUnavailable(msg),
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::Unauthenticated => write!(f, "Authentication is required"),
            AuthError::TokenExpired => write!(f, "Token has expired"),
            AuthError::TokenInvalid => write!(f, "Token is invalid"),
            AuthError::InvalidCredentials => write!(f, "Invalid username or password"),
            AuthError::InvalidSubject(msg) => write!(f, "Cannot issue token: {msg}"),
            AuthError::SessionStoreUnavailable(msg) => {
                write!(f, "Session store unavailable: {msg}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
            reason: self.reason(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn expired_token_returns_401_with_reason() {
        let response = AuthError::TokenExpired.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = body_json(response).await;
        assert_eq!(body["error_code"], "token_expired");
        assert_eq!(body["reason"], "EXPIRE");
    }

    #[tokio::test]
    async fn unauthenticated_has_no_reason() {
        let body = body_json(AuthError::Unauthenticated.into_response()).await;
        assert_eq!(body["error_code"], "unauthenticated");
        assert!(body.get("reason").is_none());
    }

    #[test]
    fn cache_outage_is_a_server_error() {
        let err = AuthError::from(TokenError::CacheUnavailable("down".into()));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.reason(), None);
    }

    #[test]
    fn token_errors_map_to_auth_errors() {
        assert!(matches!(
            AuthError::from(TokenError::TokenInvalid),
            AuthError::TokenInvalid
        ));
        assert_eq!(
            AuthError::from(TokenError::EncodingError("empty".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
