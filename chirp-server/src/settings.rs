//! Server settings - defaults, TOML file, environment
//!
//! Precedence, lowest first: built-in defaults, an optional TOML file,
//! environment variables. The binary applies CLI flags on top.
//!
//! Environment variables:
//! - `CHIRP_BIND`: listen address (default: 127.0.0.1:8000)
//! - `DATABASE_URL`: PostgreSQL connection string
//! - `CHIRP_MAX_CONNECTIONS`, `CHIRP_ACQUIRE_TIMEOUT`: pool sizing
//! - `CHIRP_UPLOAD_DIR`, `CHIRP_MEDIA_PREFIX`, `CHIRP_MAX_UPLOAD_BYTES`: media storage
//! - `CHIRP_CORS_PERMISSIVE`: allow any origin

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::{Error, Result};

/// Server settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    /// Directory uploaded pictures are written to
    pub upload_dir: PathBuf,
    /// Public URL prefix the upload directory is served under
    pub media_url_prefix: String,
    pub max_upload_bytes: usize,
    pub cors_permissive: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            database_url: "postgres://localhost/chirp".to_string(),
            max_connections: 10,
            acquire_timeout_secs: 5,
            upload_dir: PathBuf::from("./upload_files"),
            media_url_prefix: "/media".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
            cors_permissive: false,
        }
    }
}

impl Settings {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Result<Self> {
        let mut settings = Self::default();
        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Read a TOML file (missing keys take defaults), then apply the
    /// process environment.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut settings = Self::from_toml(&text)?;
        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Overlay values found through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("CHIRP_BIND") {
            self.bind_addr = parse("CHIRP_BIND", &v)?;
        }
        if let Some(v) = lookup("DATABASE_URL") {
            self.database_url = v;
        }
        if let Some(v) = lookup("CHIRP_MAX_CONNECTIONS") {
            self.max_connections = parse("CHIRP_MAX_CONNECTIONS", &v)?;
        }
        if let Some(v) = lookup("CHIRP_ACQUIRE_TIMEOUT") {
            self.acquire_timeout_secs = parse("CHIRP_ACQUIRE_TIMEOUT", &v)?;
        }
        if let Some(v) = lookup("CHIRP_UPLOAD_DIR") {
            self.upload_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("CHIRP_MEDIA_PREFIX") {
            self.media_url_prefix = v;
        }
        if let Some(v) = lookup("CHIRP_MAX_UPLOAD_BYTES") {
            self.max_upload_bytes = parse("CHIRP_MAX_UPLOAD_BYTES", &v)?;
        }
        if let Some(v) = lookup("CHIRP_CORS_PERMISSIVE") {
            self.cors_permissive = parse("CHIRP_CORS_PERMISSIVE", &v)?;
        }
        Ok(())
    }

    /// Media prefix normalized to a leading slash and no trailing slash.
    pub fn media_prefix(&self) -> String {
        let trimmed = self.media_url_prefix.trim_matches('/');
        format!("/{}", trimmed)
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("{}: {}", key, e)))
}
