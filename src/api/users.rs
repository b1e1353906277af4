// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::Json;

use crate::{auth::Auth, models::CurrentUser};

/// The principal bound to the presented token.
#[utoipa::path(
    get,
    path = "/v1/users/me",
    tag = "Users",
    responses(
        (status = 200, body = CurrentUser),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn current_user(Auth(principal): Auth) -> Json<CurrentUser> {
    Json(CurrentUser {
        username: principal.subject,
    })
}
