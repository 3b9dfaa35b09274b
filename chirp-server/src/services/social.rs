//! Follow graph mutations

use crate::db::{Commit, ConstraintMessages, Fields, Filter, Follow, PgRepository, Repository, Session};
use crate::error::messages;
use crate::models::ValidationError;
use crate::Result;

const FOLLOWS: PgRepository<Follow> = PgRepository::new();

pub struct SocialService<'a> {
    session: &'a mut Session,
}

impl<'a> SocialService<'a> {
    pub fn new(session: &'a mut Session) -> Self {
        Self { session }
    }

    /// `follower_id` starts following `user_id`.
    pub async fn subscribe(&mut self, user_id: i64, follower_id: i64) -> Result<()> {
        reject_self(user_id, follower_id)?;
        FOLLOWS
            .create(
                self.session,
                Fields::new()
                    .with("user_id", user_id)
                    .with("follower_id", follower_id),
                ConstraintMessages::new(messages::SUBSCRIPTION_EXISTS, messages::USER_NOT_FOUND),
                Commit::Now,
            )
            .await?;
        Ok(())
    }

    pub async fn unsubscribe(&mut self, user_id: i64, follower_id: i64) -> Result<()> {
        reject_self(user_id, follower_id)?;
        FOLLOWS
            .delete_by(
                self.session,
                Filter::new()
                    .with("user_id", user_id)
                    .with("follower_id", follower_id),
                messages::SUBSCRIPTION_NOT_EXISTS,
                Commit::Now,
            )
            .await?;
        Ok(())
    }
}

fn reject_self(user_id: i64, follower_id: i64) -> Result<(), ValidationError> {
    if user_id == follower_id {
        return Err(ValidationError::SelfReference {
            reason: messages::SUBSCRIPTION_SELF,
        });
    }
    Ok(())
}
