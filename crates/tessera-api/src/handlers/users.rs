// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! User account handlers.

use axum::extract::State;
use tessera_core::{LoginUserRequest, RegisterUserRequest, UpdateUserRequest, UserResponse};

use crate::error::ApiResult;
use crate::extractors::{Auth, ValidatedJson};
use crate::response::WebResponse;
use crate::state::AppState;

/// POST /api/users
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterUserRequest>,
) -> ApiResult<WebResponse<UserResponse>> {
    let user = state.users().register(request).await?;
    Ok(WebResponse::success(user))
}

/// POST /api/users/_login
///
/// The response is the only place the session token is handed out.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginUserRequest>,
) -> ApiResult<WebResponse<UserResponse>> {
    let user = state.users().login(request).await?;
    Ok(WebResponse::success(user))
}

/// GET /api/users/_current
pub async fn current_user(
    State(state): State<AppState>,
    Auth(ctx): Auth,
) -> ApiResult<WebResponse<UserResponse>> {
    let user = state.users().current(&ctx.user_id).await?;
    Ok(WebResponse::success(user))
}

/// PATCH /api/users/_current
pub async fn update_current_user(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<WebResponse<UserResponse>> {
    let user = state.users().update(&ctx.user_id, request).await?;
    Ok(WebResponse::success(user))
}

/// DELETE /api/users
///
/// Ends the session the request authenticated with.
pub async fn logout(State(state): State<AppState>, Auth(ctx): Auth) -> ApiResult<WebResponse<bool>> {
    let done = state.users().logout(&ctx.user_id, &ctx.token).await?;
    Ok(WebResponse::success(done))
}
