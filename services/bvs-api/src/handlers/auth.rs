//! Authentication handlers (register, login, me)

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use bvs_auth_core::{AuthError, CurrentUser, LoginInput, RegisterInput};

use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterInput>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(input) = body?;
    let session = state.auth.register(input).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginInput>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(input) = body?;
    let session = state.auth.login(input).await?;
    Ok(Json(session))
}

/// GET /auth/me
///
/// Reads roles and memberships from the store, not from the token.
pub async fn me(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> ApiResult<Json<CurrentUser>> {
    // A valid token for a deleted account is treated as unauthenticated
    let current = state
        .auth
        .current_user(identity.user_id)
        .await?
        .ok_or(AuthError::InvalidToken)?;
    Ok(Json(current))
}
