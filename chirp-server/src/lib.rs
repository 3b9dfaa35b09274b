//! chirp-server: microblogging backend
//!
//! Users register with a static api key, post tweets with optional picture
//! attachments, follow each other, like tweets and read a feed ranked by
//! like count. PostgreSQL holds the data; pictures live on disk.

pub mod blob;
pub mod db;
pub mod error;
pub mod http;
pub mod models;
pub mod services;
pub mod settings;

pub use error::{Error, Result};
pub use settings::Settings;

/// Connect, optionally apply migrations, and serve until shutdown.
pub async fn serve(settings: Settings, run_migrations: bool) -> Result<()> {
    let pool = db::create_pool(&settings).await?;
    if run_migrations {
        db::migrate(&pool).await?;
    }
    http::run_server(pool, settings).await
}
