//! Likes

use crate::db::{Commit, ConstraintMessages, Fields, Filter, Like, PgRepository, Repository, Session};
use crate::error::messages;
use crate::Result;

const LIKES: PgRepository<Like> = PgRepository::new();

pub struct LikeService<'a> {
    session: &'a mut Session,
}

impl<'a> LikeService<'a> {
    pub fn new(session: &'a mut Session) -> Self {
        Self { session }
    }

    pub async fn like(&mut self, tweet_id: i64, user_id: i64) -> Result<()> {
        LIKES
            .create(
                self.session,
                Fields::new()
                    .with("user_id", user_id)
                    .with("tweet_id", tweet_id),
                ConstraintMessages::new(messages::LIKE_EXISTS, messages::TWEET_NOT_FOUND),
                Commit::Now,
            )
            .await?;
        Ok(())
    }

    pub async fn unlike(&mut self, tweet_id: i64, user_id: i64) -> Result<()> {
        LIKES
            .delete_by(
                self.session,
                Filter::new()
                    .with("user_id", user_id)
                    .with("tweet_id", tweet_id),
                messages::LIKE_NOT_EXISTS,
                Commit::Now,
            )
            .await?;
        Ok(())
    }
}
