//! Picture uploads

use crate::blob::BlobStore;
use crate::db::{Commit, ConstraintMessages, Fields, Media, PgRepository, Repository, Session};
use crate::error::messages;
use crate::models::ImageName;
use crate::Result;

const MEDIAS: PgRepository<Media> = PgRepository::new();

pub struct MediaService<'a> {
    session: &'a mut Session,
    blobs: &'a dyn BlobStore,
}

impl<'a> MediaService<'a> {
    pub fn new(session: &'a mut Session, blobs: &'a dyn BlobStore) -> Self {
        Self { session, blobs }
    }

    /// Store the picture and record it. The blob is removed again if the
    /// row cannot be created.
    pub async fn save(&mut self, bytes: &[u8], filename: &ImageName, owner_id: i64) -> Result<i64> {
        let path = self.blobs.store(bytes, owner_id, filename.as_str()).await?;

        let created = MEDIAS
            .create(
                self.session,
                Fields::new().with("attachment", path.as_str()),
                ConstraintMessages::new(messages::PICTURE_NOT_CREATED, messages::OBJECT_NOT_FOUND),
                Commit::Now,
            )
            .await;

        match created {
            Ok(media_id) => {
                tracing::info!(media_id, owner_id, path = %path, "picture saved");
                Ok(media_id)
            }
            Err(err) => {
                if let Err(cleanup) = self.blobs.delete(&path).await {
                    tracing::warn!(path = %path, error = %cleanup, "orphaned blob left on disk");
                }
                Err(err)
            }
        }
    }
}
