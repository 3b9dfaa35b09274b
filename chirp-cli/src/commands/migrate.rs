//! Schema migration command

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use chirp_server::db::{create_pool, migrate};

use super::load_settings;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides config/environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// TOML settings file
    #[arg(long, short = 'c', env = "CHIRP_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Apply the embedded migrations and exit
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(url) = args.database_url {
        settings.database_url = url;
    }

    let pool = create_pool(&settings)
        .await
        .context("Failed to create database pool")?;
    migrate(&pool).await.context("Migration failed")?;
    pool.close().await;

    Ok(())
}
