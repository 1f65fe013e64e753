//! Local directory backend.
//!
//! Writes the encoded scan next to a `<filename>.json` sidecar with
//! the same metadata the remote backends record, expiry included.
//! This is the scanner's save-to-device path and the storage double
//! used by the integration tests.

use std::path::PathBuf;

use chrono::Utc;
use serde_json::json;
use tracing::info;

use crate::error::{ScanError, ScanResult};
use crate::upload::{StorageBackend, UploadRequest, UploadReceipt};

/// Stores scans in a directory on the local filesystem.
pub struct LocalBackend {
    directory: PathBuf,
}

impl LocalBackend {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

#[async_trait::async_trait]
impl StorageBackend for LocalBackend {
    async fn upload(&self, request: UploadRequest) -> ScanResult<UploadReceipt> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|err| {
                ScanError::io_at("create_dir", self.directory.display().to_string(), err)
            })?;

        let path = self.directory.join(&request.filename);
        tokio::fs::write(&path, &request.bytes)
            .await
            .map_err(|err| ScanError::io_at("write_scan", path.display().to_string(), err))?;

        let sidecar = json!({
            "name": request.filename,
            "mime": request.mime_type,
            "size": request.bytes.len(),
            "created_at": Utc::now().to_rfc3339(),
            "expires_at": request.expires_at.map(|t| t.to_rfc3339()),
        });
        let sidecar_path = self.directory.join(format!("{}.json", request.filename));
        tokio::fs::write(&sidecar_path, serde_json::to_vec_pretty(&sidecar)?)
            .await
            .map_err(|err| {
                ScanError::io_at("write_sidecar", sidecar_path.display().to_string(), err)
            })?;

        info!(file = %request.filename, dir = %self.directory.display(), "saved scan locally");

        Ok(UploadReceipt {
            filename: request.filename,
            location: path.display().to_string(),
            expires_at: request.expires_at,
        })
    }

    fn name(&self) -> &str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_writes_scan_and_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new(dir.path());

        let expires = Utc::now() + Duration::days(7);
        let receipt = backend
            .upload(UploadRequest {
                filename: "scan_2024-01-01T00-00-00.png".to_string(),
                mime_type: "image/png".to_string(),
                bytes: vec![1, 2, 3, 4],
                expires_at: Some(expires),
            })
            .await
            .unwrap();

        assert_eq!(receipt.expires_at, Some(expires));

        let stored = std::fs::read(dir.path().join("scan_2024-01-01T00-00-00.png")).unwrap();
        assert_eq!(stored, vec![1, 2, 3, 4]);

        let sidecar: serde_json::Value = serde_json::from_slice(
            &std::fs::read(dir.path().join("scan_2024-01-01T00-00-00.png.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(sidecar["mime"], "image/png");
        assert_eq!(sidecar["size"], 4);
        assert!(sidecar["expires_at"].is_string());
    }
}
