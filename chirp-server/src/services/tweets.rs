//! Tweet creation, deletion and the ranked feed

use crate::blob::BlobStore;
use crate::db::{
    Commit, ConstraintMessages, FeedRepo, FeedTweet, Fields, Filter, MediaRepo, PgRepository,
    Repository, Session, Tweet, TweetMediaLink,
};
use crate::error::messages;
use crate::models::{FeedWindow, MediaIds, TweetContent};
use crate::{Error, Result};

use super::abort;

const TWEETS: PgRepository<Tweet> = PgRepository::new();
const LINKS: PgRepository<TweetMediaLink> = PgRepository::new();

pub struct TweetService<'a> {
    session: &'a mut Session,
    blobs: &'a dyn BlobStore,
}

impl<'a> TweetService<'a> {
    pub fn new(session: &'a mut Session, blobs: &'a dyn BlobStore) -> Self {
        Self { session, blobs }
    }

    /// Create a tweet and attach `media` in one commit.
    ///
    /// A missing media id fails with `ReferencedNotFound` and leaves neither
    /// the tweet nor any link behind.
    pub async fn create(
        &mut self,
        content: TweetContent,
        media: MediaIds,
        author_id: i64,
    ) -> Result<i64> {
        match self.insert_rows(&content, &media, author_id).await {
            Ok(tweet_id) => {
                self.session.commit().await?;
                tracing::info!(tweet_id, author_id, media = media.as_slice().len(), "tweet created");
                Ok(tweet_id)
            }
            Err(err) => abort(self.session, err).await,
        }
    }

    async fn insert_rows(
        &mut self,
        content: &TweetContent,
        media: &MediaIds,
        author_id: i64,
    ) -> Result<i64> {
        let tweet_id = TWEETS
            .create(
                self.session,
                Fields::new()
                    .with("content", content.as_str())
                    .with("user_id", author_id),
                ConstraintMessages::new(messages::TWEET_NOT_CREATED, messages::USER_NOT_FOUND),
                Commit::Deferred,
            )
            .await?;

        for &media_id in media.as_slice() {
            LINKS
                .create(
                    self.session,
                    Fields::new()
                        .with("tweet_id", tweet_id)
                        .with("media_id", media_id),
                    ConstraintMessages::new(
                        messages::PICTURE_NOT_CREATED,
                        messages::PICTURE_NOT_FOUND,
                    ),
                    Commit::Deferred,
                )
                .await?;
        }
        Ok(tweet_id)
    }

    /// Delete a tweet owned by `author_id` along with its pictures.
    ///
    /// A tweet owned by someone else is reported exactly like a missing one.
    /// Blob removal happens after the commit; failures are logged only.
    pub async fn delete(&mut self, tweet_id: i64, author_id: i64) -> Result<bool> {
        let owned = TWEETS
            .exists_by(
                self.session,
                Filter::new()
                    .with("id", tweet_id)
                    .with("user_id", author_id),
            )
            .await?;
        if !owned {
            return Err(Error::NotFound(messages::TWEET_NOT_FOUND.to_owned()));
        }

        let paths = match self.delete_rows(tweet_id, author_id).await {
            Ok(paths) => paths,
            Err(err) => return abort(self.session, err).await,
        };
        self.session.commit().await?;
        tracing::info!(tweet_id, author_id, media = paths.len(), "tweet deleted");

        for path in &paths {
            if let Err(err) = self.blobs.delete(path).await {
                tracing::warn!(path = %path, error = %err, "orphaned blob left on disk");
            }
        }
        Ok(true)
    }

    async fn delete_rows(&mut self, tweet_id: i64, author_id: i64) -> Result<Vec<String>> {
        let paths = MediaRepo::new(self.session).delete_for_tweet(tweet_id).await?;
        TWEETS
            .delete_by(
                self.session,
                Filter::new()
                    .with("id", tweet_id)
                    .with("user_id", author_id),
                messages::TWEET_NOT_FOUND,
                Commit::Deferred,
            )
            .await?;
        Ok(paths)
    }

    /// Ranked feed; read-only.
    pub async fn feed(&mut self, window: FeedWindow) -> Result<Vec<FeedTweet>> {
        FeedRepo::new(self.session).list(window).await
    }
}
