//! Aggregation queries that go beyond the generic repository
//!
//! Each repository follows these patterns:
//! - Uses JOINs for nested reads (no N+1)
//! - Borrows the request session, never commits on its own

pub mod media;
pub mod tweets;
pub mod users;

pub use media::MediaRepo;
pub use tweets::{FeedRepo, FeedTweet, Liker, UserInfo};
pub use users::{Profile, ProfileRepo};
