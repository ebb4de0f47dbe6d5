//! User management handlers

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

use bvs_auth_core::{CreateUserInput, ListUsersQuery, UpdateUserInput, UserList, UserView};
use bvs_types::UserId;

use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /users?limit&offset
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    query: Result<Query<ListUsersQuery>, QueryRejection>,
) -> ApiResult<Json<UserList>> {
    let Query(query) = query?;
    let list = state.users.list(&identity, query).await?;
    Ok(Json(list))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<UserView>> {
    let Path(id) = id?;
    let user = state.users.get(&identity, UserId(id)).await?;
    Ok(Json(user))
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    body: Result<Json<CreateUserInput>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(input) = body?;
    let user = state.users.create(&identity, input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// PATCH /users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<UpdateUserInput>, JsonRejection>,
) -> ApiResult<Json<UserView>> {
    let Path(id) = id?;
    let Json(input) = body?;
    let user = state.users.update(&identity, UserId(id), input).await?;
    Ok(Json(user))
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    state.users.delete(&identity, UserId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
