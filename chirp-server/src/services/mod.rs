//! Domain operations over a request session
//!
//! Services borrow the request's [`Session`](crate::db::Session) and decide
//! commit boundaries. Composite operations run every statement deferred and
//! publish with a single commit, rolling the whole unit back on failure.

pub mod likes;
pub mod media;
pub mod social;
pub mod tweets;
pub mod users;

pub use likes::LikeService;
pub use media::MediaService;
pub use social::SocialService;
pub use tweets::TweetService;
pub use users::{NewUser, UserService};

use crate::db::Session;

/// Roll back after a failed unit, keeping the original error.
async fn abort<T>(session: &mut Session, err: crate::Error) -> crate::Result<T> {
    if let Err(rollback) = session.rollback().await {
        tracing::warn!(error = %rollback, "rollback failed");
    }
    Err(err)
}
