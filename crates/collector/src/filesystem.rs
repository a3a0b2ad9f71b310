//! Filesystem access used by the probes.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// The subset of filesystem queries the probes need.
#[async_trait]
pub trait Filesystem: Send + Sync {
    /// Names of the entries in a directory.
    async fn read_dir(&self, path: &Path) -> Result<Vec<String>>;

    /// Whether anything exists at `path` (following symlinks).
    async fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is a regular file and not a symbolic link.
    async fn is_regular_file(&self, path: &Path) -> bool;

    /// Read a whole file.
    async fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// The current user's home directory.
    fn home_dir(&self) -> Option<PathBuf>;
}

/// Filesystem backed by the local disk.
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Filesystem for LocalFilesystem {
    /// Entry names come back sorted so repeated probes list them identically.
    async fn read_dir(&self, path: &Path) -> Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(path)
            .await
            .with_context(|| format!("Failed to read directory {}", path.display()))?;

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        names.sort();
        Ok(names)
    }

    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }

    async fn is_regular_file(&self, path: &Path) -> bool {
        tokio::fs::symlink_metadata(path)
            .await
            .map(|meta| meta.file_type().is_file())
            .unwrap_or(false)
    }

    async fn read(&self, path: &Path) -> Result<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }
}
