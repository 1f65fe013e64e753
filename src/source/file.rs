//! File-backed bitmap source: decodes a still image from disk.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::bitmap::Bitmap;
use crate::error::{ScanError, ScanResult};
use crate::source::BitmapSource;

/// Decodes a user-selected image file into an RGBA bitmap.
pub struct FileSource {
    path: PathBuf,
    description: String,
}

impl FileSource {
    /// Create a source reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let description = format!("file:{}", path.display());
        Self { path, description }
    }
}

#[async_trait]
impl BitmapSource for FileSource {
    async fn acquire(&mut self) -> ScanResult<Bitmap> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|err| {
            ScanError::acquire("file", err.to_string())
                .with_metadata("path", self.path.display().to_string())
                .with_recovery_suggestion("check the path or pick another image")
        })?;

        let decoded = image::load_from_memory(&bytes).map_err(|err| {
            ScanError::acquire("file", format!("could not decode image: {}", err))
                .with_metadata("path", self.path.display().to_string())
        })?;

        let bitmap: Bitmap = decoded.into_rgba8().into();
        debug!(
            path = %self.path.display(),
            width = bitmap.width(),
            height = bitmap.height(),
            "decoded image file"
        );
        Ok(bitmap)
    }

    fn describe(&self) -> &str {
        &self.description
    }
}
