//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits and embedded migrations.

use std::time::Duration;

use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::settings::Settings;
use crate::Result;

/// Schema migrations embedded at compile time.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Create a PostgreSQL connection pool from settings.
///
/// # Errors
///
/// Returns an error if the first connection cannot be established.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&Settings::default()).await?;
/// ```
pub async fn create_pool(settings: &Settings) -> Result<PgPool> {
    let pool = pool_options(settings)
        .connect(&settings.database_url)
        .await?;
    Ok(pool)
}

/// Create a pool that connects on first use. Nothing is dialed until a
/// statement actually runs.
pub fn create_lazy_pool(settings: &Settings) -> Result<PgPool> {
    let pool = pool_options(settings).connect_lazy(&settings.database_url)?;
    Ok(pool)
}

fn pool_options(settings: &Settings) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
}

/// Apply pending migrations.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    tracing::info!("Running migrations...");
    MIGRATOR.run(pool).await?;
    tracing::info!("Migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lazy_pool_does_not_connect() {
        let settings = Settings {
            database_url: "postgres://nobody@127.0.0.1:1/none".into(),
            ..Settings::default()
        };
        let pool = create_lazy_pool(&settings).expect("lazy pool");
        assert_eq!(pool.size(), 0);
    }

    #[test]
    fn migrations_are_embedded() {
        assert!(MIGRATOR.iter().count() >= 1);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn pool_acquires_connection() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let settings = Settings {
            database_url: url,
            ..Settings::default()
        };
        let pool = create_pool(&settings).await.expect("pool creation failed");

        let result: (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("query failed");

        assert_eq!(result.0, 1);
    }
}
