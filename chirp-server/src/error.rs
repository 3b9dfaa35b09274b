//! Error types for chirp-server
//!
//! One taxonomy shared by the repository, the services and the HTTP layer.
//! Messages are client-facing and travel unchanged to the response envelope.

use thiserror::Error;

use crate::models::ValidationError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    /// A uniqueness constraint rejected the row.
    #[error("{0}")]
    AlreadyExists(String),

    #[error("{0}")]
    NotFound(String),

    /// A foreign key pointed at a row that does not exist.
    #[error("{0}")]
    ReferencedNotFound(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{}", messages::UNAUTHORIZED)]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Client-facing messages attached to domain errors.
pub mod messages {
    pub const OBJECT_NOT_CREATED: &str = "The object cannot be created.";
    pub const OBJECT_NOT_FOUND: &str = "The object was not found.";
    pub const PICTURE_NOT_CREATED: &str = "The picture has not been created.";
    pub const PICTURE_NOT_FOUND: &str = "The picture does not exist.";
    pub const TWEET_NOT_CREATED: &str = "The tweet was not created.";
    pub const TWEET_NOT_FOUND: &str = "The tweet does not exist.";
    pub const SUBSCRIPTION_EXISTS: &str = "The subscription has already been issued.";
    pub const SUBSCRIPTION_NOT_EXISTS: &str = "There is no subscription.";
    pub const USER_NOT_FOUND: &str = "The user does not exist.";
    pub const USER_NOT_CREATED: &str = "The user has not been created";
    pub const LIKE_EXISTS: &str = "The like exists.";
    pub const LIKE_NOT_EXISTS: &str = "The like does not exist.";
    pub const UNAUTHORIZED: &str = "Authorization error.";
    pub const SUBSCRIPTION_SELF: &str = "Subscribing to yourself is not possible.";
    pub const EXTENSION_NOT_ALLOWED: &str = "The file extension can only be: png, jpg, jpeg, webp.";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_messages_pass_through() {
        let err = Error::AlreadyExists(messages::LIKE_EXISTS.into());
        assert_eq!(err.to_string(), "The like exists.");
        assert_eq!(Error::Unauthorized.to_string(), "Authorization error.");
    }
}
