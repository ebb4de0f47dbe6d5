//! Axum extractors for authentication

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header;
use axum::http::request::Parts;

use bvs_auth_core::Identity;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller, resolved from `Authorization: Bearer <token>`.
///
/// Handlers receive the identity by value; nothing is attached to the request.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        // Non-UTF-8 header values are treated as absent
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let identity = app_state.auth.resolve_bearer(header)?;
        Ok(AuthUser(identity))
    }
}
