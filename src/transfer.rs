use crate::common::{FaceAuthError, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;

/// Turns a captured photo on disk into the text the API accepts.
#[async_trait]
pub trait PhotoReader: Send + Sync {
    async fn read_base64(&self, path: &Path) -> Result<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FsPhotoReader;

#[async_trait]
impl PhotoReader for FsPhotoReader {
    async fn read_base64(&self, path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            FaceAuthError::Transfer(format!("Failed to read photo {}: {}", path.display(), e))
        })?;
        if bytes.is_empty() {
            return Err(FaceAuthError::Transfer(format!(
                "Photo file is empty: {}", path.display()
            )));
        }
        tracing::debug!("Encoding {} bytes from {}", bytes.len(), path.display());
        Ok(STANDARD.encode(bytes))
    }
}
