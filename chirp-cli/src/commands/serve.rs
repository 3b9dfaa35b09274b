//! HTTP server command

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use chirp_server::Settings;

use super::load_settings;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (overrides config/CHIRP_BIND)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (overrides config/environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// TOML settings file
    #[arg(long, short = 'c', env = "CHIRP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Apply pending migrations before serving
    #[arg(long)]
    pub migrate: bool,
}

impl ServeArgs {
    /// Flags win over the config file and the environment.
    fn apply(&self, settings: &mut Settings) {
        if let Some(bind) = self.bind {
            settings.bind_addr = bind;
        }
        if let Some(url) = &self.database_url {
            settings.database_url = url.clone();
        }
        if self.cors_permissive {
            settings.cors_permissive = true;
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let mut settings = load_settings(args.config.as_deref())?;
    args.apply(&mut settings);

    tracing::info!("Starting chirp server on {}", settings.bind_addr);

    // Run server (blocks until shutdown)
    chirp_server::serve(settings, args.migrate)
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_settings() {
        let args = ServeArgs::try_parse_from([
            "serve",
            "--bind",
            "0.0.0.0:9999",
            "--database-url",
            "postgres://flag/chirp",
            "--cors-permissive",
        ])
        .unwrap();

        let mut settings = Settings::default();
        args.apply(&mut settings);
        assert_eq!(settings.bind_addr.port(), 9999);
        assert_eq!(settings.database_url, "postgres://flag/chirp");
        assert!(settings.cors_permissive);
        assert!(!args.migrate);
    }

    #[test]
    fn unset_flags_keep_settings() {
        let args = ServeArgs::try_parse_from(["serve", "--migrate"]).unwrap();
        let mut settings = Settings::default();
        settings.cors_permissive = true;
        args.apply(&mut settings);
        assert_eq!(settings.bind_addr.port(), 8000);
        assert!(settings.cors_permissive);
        assert!(args.migrate);
    }
}
