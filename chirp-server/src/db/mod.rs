//! Database layer - pool, sessions, generic repository and aggregation queries
//!
//! # Design Principles
//!
//! - Connection pool, one session (and at most one transaction) per request
//! - Nested reads use JOINs - no N+1 queries
//! - Rely on DB constraints, translate violations - no check-then-insert
//! - Composite operations defer commits and publish once

pub mod entities;
pub mod pool;
pub mod repos;
pub mod repository;
pub mod session;

pub use entities::{Entity, Follow, Like, Media, Tweet, TweetMediaLink, User};
pub use pool::{create_lazy_pool, create_pool, migrate, MIGRATOR};
pub use repos::*;
pub use repository::{Commit, ConstraintMessages, Fields, Filter, PgRepository, Repository, Value};
pub use session::Session;
