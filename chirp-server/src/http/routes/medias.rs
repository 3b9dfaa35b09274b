//! Picture upload endpoint

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;

use super::{ok, Envelope};
use crate::http::error::ApiError;
use crate::http::extractors::{CurrentUser, DbSession};
use crate::http::server::AppState;
use crate::models::{ImageName, ValidationError};
use crate::services::MediaService;

/// Multipart field holding the picture
const FILE_FIELD: &str = "file";

#[derive(Serialize)]
pub struct MediaCreated {
    pub media_id: i64,
}

/// POST /api/medias - multipart upload, field `file`
async fn upload(
    me: CurrentUser,
    DbSession(mut session): DbSession,
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Envelope<MediaCreated>>), ApiError> {
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = ImageName::new(field.file_name().unwrap_or_default())?;
        let bytes = field.bytes().await?;

        let media_id = MediaService::new(&mut session, state.blobs.as_ref())
            .save(&bytes, &filename, me.id)
            .await?;
        return Ok((StatusCode::CREATED, ok(MediaCreated { media_id })));
    }

    Err(ValidationError::Empty { field: FILE_FIELD }.into())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/api/medias", post(upload))
}
