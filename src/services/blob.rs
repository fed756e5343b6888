use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::error::AppError;
use crate::utils::files::PUBLIC_PREFIX;

/// Key/bytes storage for uploaded and generated images.
///
/// Keys are public paths such as `/static/images/pizzas/pizza_1_1_ab12cd34.jpg`.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Fails with `NotFound` when nothing is stored under `path`.
    async fn read_bytes(&self, path: &str) -> Result<Vec<u8>, AppError>;

    async fn write_bytes(&self, path: &str, bytes: &[u8]) -> Result<(), AppError>;
}

/// Blob store backed by a local directory, the same directory that is served
/// under `/static`.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, AppError> {
        let relative = path
            .strip_prefix(PUBLIC_PREFIX)
            .or_else(|| path.strip_prefix(&PUBLIC_PREFIX[1..]))
            .ok_or_else(|| AppError::Validation(format!("Blob path {} is outside {}", path, PUBLIC_PREFIX)))?;

        let relative = Path::new(relative);
        let is_plain = relative.components().all(|c| matches!(c, Component::Normal(_)));
        if relative.as_os_str().is_empty() || !is_plain {
            return Err(AppError::Validation(format!("Invalid blob path {}", path)));
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn read_bytes(&self, path: &str) -> Result<Vec<u8>, AppError> {
        let full = self.resolve(path)?;
        match tokio::fs::read(&full).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound(format!("No blob stored at {}", path)))
            }
            Err(e) => Err(AppError::Storage(e)),
        }
    }

    async fn write_bytes(&self, path: &str, bytes: &[u8]) -> Result<(), AppError> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full, bytes).await?;
        debug!(path, size = bytes.len(), "Stored blob");
        Ok(())
    }
}
