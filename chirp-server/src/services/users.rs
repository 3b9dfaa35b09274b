//! Registration, api-key resolution and profiles

use serde::Serialize;

use crate::db::{
    Commit, ConstraintMessages, Fields, Filter, PgRepository, Profile, ProfileRepo, Repository,
    Session, User,
};
use crate::error::messages;
use crate::models::{hash_token, ApiToken, UserName};
use crate::{Error, Result};

const USERS: PgRepository<User> = PgRepository::new();

/// A freshly registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub id: i64,
    pub name: String,
}

pub struct UserService<'a> {
    session: &'a mut Session,
}

impl<'a> UserService<'a> {
    pub fn new(session: &'a mut Session) -> Self {
        Self { session }
    }

    /// Register a user. Only the digest of `token` is stored.
    pub async fn create(&mut self, name: UserName, token: ApiToken) -> Result<NewUser> {
        let id = USERS
            .create(
                self.session,
                Fields::new()
                    .with("name", name.as_str())
                    .with("token", token.digest()),
                ConstraintMessages::new(messages::USER_NOT_CREATED, messages::OBJECT_NOT_FOUND),
                Commit::Now,
            )
            .await?;
        tracing::info!(user_id = id, "user registered");

        Ok(NewUser {
            id,
            name: name.into_string(),
        })
    }

    /// The user owning `raw_token`, if any.
    pub async fn resolve_token(&mut self, raw_token: &str) -> Result<Option<User>> {
        USERS
            .get_by(
                self.session,
                Filter::new().with("token", hash_token(raw_token)),
            )
            .await
    }

    pub async fn profile(&mut self, user_id: i64) -> Result<Profile> {
        ProfileRepo::new(self.session)
            .get(user_id)
            .await?
            .ok_or_else(|| Error::NotFound(messages::USER_NOT_FOUND.to_owned()))
    }
}
