//! Tweet endpoints - feed, create, delete, likes

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::{done, ok, Done, Envelope};
use crate::db::FeedTweet;
use crate::http::error::ApiError;
use crate::http::extractors::{CurrentUser, DbSession, ValidId, ValidJson, ValidQuery};
use crate::http::server::AppState;
use crate::models::{FeedParams, FeedWindow, MediaIds, TweetContent};
use crate::services::{LikeService, TweetService};

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTweetRequest {
    pub tweet_data: String,
    #[serde(default)]
    pub tweet_media_ids: Vec<i64>,
}

#[derive(Serialize)]
pub struct TweetCreated {
    pub tweet_id: i64,
}

#[derive(Serialize)]
pub struct FeedResponse {
    pub tweets: Vec<FeedTweet>,
}

/// GET /api/tweets?offset&limit - ranked feed
async fn feed(
    _me: CurrentUser,
    DbSession(mut session): DbSession,
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<FeedParams>,
) -> Result<Json<Envelope<FeedResponse>>, ApiError> {
    let window = FeedWindow::try_from(params)?;
    let tweets = TweetService::new(&mut session, state.blobs.as_ref())
        .feed(window)
        .await?;
    Ok(ok(FeedResponse { tweets }))
}

/// POST /api/tweets
async fn create_tweet(
    me: CurrentUser,
    DbSession(mut session): DbSession,
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CreateTweetRequest>,
) -> Result<(StatusCode, Json<Envelope<TweetCreated>>), ApiError> {
    let content = TweetContent::new(&req.tweet_data)?;
    let media = MediaIds::new(req.tweet_media_ids)?;
    let tweet_id = TweetService::new(&mut session, state.blobs.as_ref())
        .create(content, media, me.id)
        .await?;
    Ok((StatusCode::CREATED, ok(TweetCreated { tweet_id })))
}

/// DELETE /api/tweets/{id}
async fn delete_tweet(
    me: CurrentUser,
    ValidId(tweet_id): ValidId,
    DbSession(mut session): DbSession,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Envelope<Done>>, ApiError> {
    TweetService::new(&mut session, state.blobs.as_ref())
        .delete(tweet_id, me.id)
        .await?;
    Ok(done())
}

/// POST /api/tweets/{id}/likes
async fn like(
    me: CurrentUser,
    ValidId(tweet_id): ValidId,
    DbSession(mut session): DbSession,
) -> Result<Json<Envelope<Done>>, ApiError> {
    LikeService::new(&mut session).like(tweet_id, me.id).await?;
    Ok(done())
}

/// DELETE /api/tweets/{id}/likes
async fn unlike(
    me: CurrentUser,
    ValidId(tweet_id): ValidId,
    DbSession(mut session): DbSession,
) -> Result<Json<Envelope<Done>>, ApiError> {
    LikeService::new(&mut session)
        .unlike(tweet_id, me.id)
        .await?;
    Ok(done())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/tweets", get(feed).post(create_tweet))
        .route("/api/tweets/{id}", delete(delete_tweet))
        .route("/api/tweets/{id}/likes", post(like).delete(unlike))
}
