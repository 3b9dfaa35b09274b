//! Media repository
//!
//! Removes the pictures attached to a tweet in one statement and hands back
//! their stored paths so the blobs can be deleted after commit.

use crate::db::Session;
use crate::Result;

/// Media repository
pub struct MediaRepo<'a> {
    session: &'a mut Session,
}

impl<'a> MediaRepo<'a> {
    pub fn new(session: &'a mut Session) -> Self {
        Self { session }
    }

    /// Delete every media row linked to `tweet_id`, returning the paths.
    ///
    /// The link rows go with them through `ON DELETE CASCADE`. Nothing is
    /// committed here.
    pub async fn delete_for_tweet(&mut self, tweet_id: i64) -> Result<Vec<String>> {
        let conn = self.session.connection().await?;
        let paths: Vec<String> = sqlx::query_scalar(
            r#"
            DELETE FROM medias
            WHERE id IN (SELECT media_id FROM tweet_media WHERE tweet_id = $1)
            RETURNING attachment
            "#,
        )
        .bind(tweet_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(paths)
    }
}
