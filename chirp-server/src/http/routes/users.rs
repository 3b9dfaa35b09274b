//! User endpoints - registration, profiles, follows

use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{done, ok, Done, Envelope};
use crate::db::Profile;
use crate::http::error::ApiError;
use crate::http::extractors::{CurrentUser, DbSession, ValidId, ValidJson};
use crate::http::server::AppState;
use crate::models::{ApiToken, UserName};
use crate::services::{NewUser, SocialService, UserService};

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    pub name: String,
    pub token: String,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub user: Profile,
}

/// POST /api/users - register (no api-key required)
async fn create_user(
    DbSession(mut session): DbSession,
    ValidJson(req): ValidJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<Envelope<NewUser>>), ApiError> {
    let name = UserName::new(&req.name)?;
    let token = ApiToken::new(&req.token)?;
    let user = UserService::new(&mut session).create(name, token).await?;
    Ok((StatusCode::CREATED, ok(user)))
}

/// GET /api/users/me
async fn get_me(
    me: CurrentUser,
    DbSession(mut session): DbSession,
) -> Result<Json<Envelope<ProfileResponse>>, ApiError> {
    let user = UserService::new(&mut session).profile(me.id).await?;
    Ok(ok(ProfileResponse { user }))
}

/// GET /api/users/{id}
async fn get_user(
    ValidId(user_id): ValidId,
    DbSession(mut session): DbSession,
) -> Result<Json<Envelope<ProfileResponse>>, ApiError> {
    let user = UserService::new(&mut session).profile(user_id).await?;
    Ok(ok(ProfileResponse { user }))
}

/// POST /api/users/{id}/follow
async fn follow(
    me: CurrentUser,
    ValidId(user_id): ValidId,
    DbSession(mut session): DbSession,
) -> Result<Json<Envelope<Done>>, ApiError> {
    SocialService::new(&mut session)
        .subscribe(user_id, me.id)
        .await?;
    Ok(done())
}

/// DELETE /api/users/{id}/follow
async fn unfollow(
    me: CurrentUser,
    ValidId(user_id): ValidId,
    DbSession(mut session): DbSession,
) -> Result<Json<Envelope<Done>>, ApiError> {
    SocialService::new(&mut session)
        .unsubscribe(user_id, me.id)
        .await?;
    Ok(done())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users", post(create_user))
        .route("/api/users/me", get(get_me))
        .route("/api/users/{id}", get(get_user))
        .route("/api/users/{id}/follow", post(follow).delete(unfollow))
}
