//! Custom Axum extractors

use std::sync::Arc;

use axum::extract::{FromRequest, FromRequestParts, Path, Query};
use axum::http::request::Parts;
use axum::Json;

use super::error::ApiError;
use super::server::AppState;
use crate::db::Session;
use crate::models::check_id;
use crate::services::UserService;

/// Header carrying the client's api key
pub const API_KEY_HEADER: &str = "api-key";

/// Per-request database session
///
/// Opens no connection by itself; the first statement starts a transaction,
/// and dropping the session without a commit rolls it back.
pub struct DbSession(pub Session);

impl FromRequestParts<Arc<AppState>> for DbSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(Session::new(state.pool.clone())))
    }
}

/// The user owning the request's `api-key`
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub name: String,
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or(ApiError::Unauthorized)?;

        let mut session = Session::new(state.pool.clone());
        let user = UserService::new(&mut session)
            .resolve_token(raw)
            .await?
            .ok_or(ApiError::Unauthorized)?;

        Ok(Self {
            id: user.id,
            name: user.name,
        })
    }
}

/// Single `{id}` path segment in 1..=10^6
pub struct ValidId(pub i64);

impl<S> FromRequestParts<S> for ValidId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<i64> = Path::from_request_parts(parts, state).await?;
        Ok(Self(check_id("id", id)?))
    }
}

/// JSON body with rejections rendered as the API error envelope
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ValidJson<T>(pub T);

/// Query string with rejections rendered as the API error envelope
#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct ValidQuery<T>(pub T);
