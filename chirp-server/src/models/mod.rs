//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod ids;
pub mod media;
pub mod pagination;
pub mod tweet;
pub mod user;
pub mod validation;

pub use ids::{check_id, MAX_ID, MEDIA_ID_LIMIT};
pub use media::{ImageName, ALLOWED_EXTENSIONS};
pub use pagination::{FeedParams, FeedWindow};
pub use tweet::{MediaIds, TweetContent};
pub use user::{hash_token, ApiToken, UserName};
pub use validation::ValidationError;
