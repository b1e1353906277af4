// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use tracing::info;

use crate::{
    auth::{middleware::bearer_token, Auth, AuthError},
    models::{LoginRequest, TokenResponse},
    state::AppState,
};

/// Log in: exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/v1/tokens",
    request_body = LoginRequest,
    tag = "Tokens",
    responses(
        (status = 201, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 503, description = "Session store unavailable")
    )
)]
pub async fn create_token(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), AuthError> {
    let principal = state
        .credentials
        .verify(&request.username, &request.password)
        .await
        .ok_or_else(|| {
            info!(username = %request.username, "Login rejected");
            AuthError::InvalidCredentials
        })?;

    let token = state.tokens.issue(&principal).await?;
    info!(principal = %principal, "Login succeeded");

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse::bearer(token, state.tokens.expire_time().as_secs())),
    ))
}

/// Log out: revoke the presented bearer token.
#[utoipa::path(
    delete,
    path = "/v1/tokens",
    tag = "Tokens",
    responses(
        (status = 204, description = "Session revoked"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn delete_token(
    State(state): State<AppState>,
    Auth(principal): Auth,
    headers: HeaderMap,
) -> Result<StatusCode, AuthError> {
    let token = bearer_token(&headers).ok_or(AuthError::Unauthenticated)?;
    state.tokens.revoke(token).await?;
    info!(principal = %principal.subject, "Logged out");
    Ok(StatusCode::NO_CONTENT)
}
