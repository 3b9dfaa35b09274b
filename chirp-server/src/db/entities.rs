//! Table descriptors for the generic repository
//!
//! Each entity names its table and the full column list. Column names in
//! filters are checked against this list before any SQL is built.

use sqlx::postgres::PgRow;
use sqlx::FromRow;

/// Schema descriptor for a table the generic repository can manage.
pub trait Entity: for<'r> FromRow<'r, PgRow> + Send + Unpin + 'static {
    const TABLE: &'static str;
    /// Every column, primary key included, in select order.
    const COLUMNS: &'static [&'static str];
    const PRIMARY_KEY: &'static str = "id";

    fn has_column(column: &str) -> bool {
        Self::COLUMNS.contains(&column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    /// SHA-256 hex digest of the api key
    pub token: String,
}

impl Entity for User {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &["id", "name", "token"];
}

/// Edge: `follower_id` follows `user_id`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Follow {
    pub id: i64,
    pub user_id: i64,
    pub follower_id: i64,
}

impl Entity for Follow {
    const TABLE: &'static str = "followers";
    const COLUMNS: &'static [&'static str] = &["id", "user_id", "follower_id"];
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Tweet {
    pub id: i64,
    pub content: String,
    pub user_id: i64,
}

impl Entity for Tweet {
    const TABLE: &'static str = "tweets";
    const COLUMNS: &'static [&'static str] = &["id", "content", "user_id"];
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Like {
    pub id: i64,
    pub user_id: i64,
    pub tweet_id: i64,
}

impl Entity for Like {
    const TABLE: &'static str = "likes";
    const COLUMNS: &'static [&'static str] = &["id", "user_id", "tweet_id"];
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Media {
    pub id: i64,
    /// Public path of the stored blob
    pub attachment: String,
}

impl Entity for Media {
    const TABLE: &'static str = "medias";
    const COLUMNS: &'static [&'static str] = &["id", "attachment"];
}

/// Association row. `media_id` is unique: a picture belongs to one tweet.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct TweetMediaLink {
    pub id: i64,
    pub tweet_id: i64,
    pub media_id: i64,
}

impl Entity for TweetMediaLink {
    const TABLE: &'static str = "tweet_media";
    const COLUMNS: &'static [&'static str] = &["id", "tweet_id", "media_id"];
}
