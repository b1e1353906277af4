// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    api::health::{HealthChecks, HealthResponse, ReadyResponse},
    auth::{middleware::authenticate, Principal},
    models::{CurrentUser, LoginRequest, TokenResponse},
    state::AppState,
};

pub mod health;
pub mod tokens;
pub mod users;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route(
            "/tokens",
            post(tokens::create_token).delete(tokens::delete_token),
        )
        .route("/users/me", get(users::current_user));

    Router::new()
        .nest("/v1", v1_routes)
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(from_fn_with_state(state.clone(), authenticate))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        tokens::create_token,
        tokens::delete_token,
        users::current_user,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            LoginRequest,
            TokenResponse,
            CurrentUser,
            Principal,
            ReadyResponse,
            HealthChecks,
            HealthResponse
        )
    ),
    tags(
        (name = "Tokens", description = "Login and logout"),
        (name = "Users", description = "Authenticated principal"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
