//! Blob storage for uploaded pictures
//!
//! Stored paths are public URLs (`<prefix>/<owner_id>/<file>`). The
//! filesystem store maps them back under its upload directory and refuses
//! anything that would resolve outside it.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{Error, Result};

/// Characters kept in stored filenames; everything else becomes `_`.
static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]").expect("invalid filename regex"));

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist `bytes` for `owner_id`, returning the public path.
    async fn store(&self, bytes: &[u8], owner_id: i64, filename: &str) -> Result<String>;

    /// Remove a blob previously returned by [`BlobStore::store`].
    async fn delete(&self, path: &str) -> Result<()>;
}

/// Blob store backed by a local directory
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
    prefix: String,
}

impl FsBlobStore {
    /// `prefix` is the URL prefix the root directory is served under.
    /// A prefix of `/` serves blobs from the site root.
    pub fn new(root: impl Into<PathBuf>, prefix: &str) -> Self {
        let trimmed = prefix.trim_matches('/');
        let prefix = if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        };
        Self {
            root: root.into(),
            prefix,
        }
    }

    /// Map a public path to a file under the root.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = path
            .strip_prefix(&self.prefix)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| Error::Internal(format!("blob path '{}' is outside the store", path)))?;

        let relative = Path::new(relative);
        let only_normal = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !only_normal || relative.as_os_str().is_empty() {
            return Err(Error::Internal(format!(
                "blob path '{}' escapes the upload directory",
                path
            )));
        }
        Ok(self.root.join(relative))
    }
}

/// `<utc timestamp>_<filename>` with unsafe characters replaced.
fn stored_name(filename: &str) -> String {
    let base = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");
    let clean = UNSAFE_CHARS.replace_all(base, "_");
    format!("{}_{}", Utc::now().format("%Y-%m-%dT%H-%M-%S%.6f"), clean)
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn store(&self, bytes: &[u8], owner_id: i64, filename: &str) -> Result<String> {
        let dir = self.root.join(owner_id.to_string());
        tokio::fs::create_dir_all(&dir).await?;

        let name = stored_name(filename);
        tokio::fs::write(dir.join(&name), bytes).await?;
        tracing::debug!(owner_id, file = %name, size = bytes.len(), "blob stored");

        Ok(format!("{}/{}/{}", self.prefix, owner_id, name))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let file = self.resolve(path)?;
        tokio::fs::remove_file(&file).await?;
        tracing::debug!(path, "blob deleted");
        Ok(())
    }
}
