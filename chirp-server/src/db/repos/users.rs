//! Profile repository
//!
//! The follow relation is a single edge table read in both directions:
//! followers join on `follower_id`, following joins on `user_id`.

use serde::Serialize;

use super::tweets::UserInfo;
use crate::db::Session;
use crate::Result;

/// User with both sides of the follow graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub id: i64,
    pub name: String,
    pub followers: Vec<UserInfo>,
    pub following: Vec<UserInfo>,
}

/// Profile repository
pub struct ProfileRepo<'a> {
    session: &'a mut Session,
}

impl<'a> ProfileRepo<'a> {
    pub fn new(session: &'a mut Session) -> Self {
        Self { session }
    }

    /// Profile of `user_id`, or `None` if the user does not exist.
    pub async fn get(&mut self, user_id: i64) -> Result<Option<Profile>> {
        let conn = self.session.connection().await?;

        let user: Option<UserInfo> = sqlx::query_as("SELECT id, name FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&mut *conn)
            .await?;

        let Some(user) = user else {
            return Ok(None);
        };

        let followers: Vec<UserInfo> = sqlx::query_as(
            r#"
            SELECT u.id, u.name
            FROM followers f
            JOIN users u ON u.id = f.follower_id
            WHERE f.user_id = $1
            ORDER BY f.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;

        let following: Vec<UserInfo> = sqlx::query_as(
            r#"
            SELECT u.id, u.name
            FROM followers f
            JOIN users u ON u.id = f.user_id
            WHERE f.follower_id = $1
            ORDER BY f.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(Some(Profile {
            id: user.id,
            name: user.name,
            followers,
            following,
        }))
    }
}
