//! Hosted storage backend.
//!
//! Targets the scanner's hosted backend-as-a-service variant: the
//! object is PUT into a storage bucket under a per-user prefix, then a
//! metadata row (name, size, MIME, `expires_at`) is inserted into the
//! `files` table so the dashboard can list scans and sweep expired
//! ones.

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::error::{ErrorSeverity, ScanError, ScanResult};
use crate::upload::{StorageBackend, UploadRequest, UploadReceipt, http_client};

#[derive(Debug, Serialize)]
struct FileRow<'a> {
    user_id: &'a str,
    name: &'a str,
    path: &'a str,
    size: usize,
    mime: &'a str,
    created_at: String,
    expires_at: Option<String>,
}

/// Backend for a hosted storage API with key-based auth.
pub struct HostedBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    bucket: String,
    user_id: String,
}

impl HostedBackend {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        bucket: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            client: http_client(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            bucket: bucket.into(),
            user_id: user_id.into(),
        }
    }
}

#[async_trait::async_trait]
impl StorageBackend for HostedBackend {
    async fn upload(&self, request: UploadRequest) -> ScanResult<UploadReceipt> {
        if self.api_key.is_empty() {
            return Err(ScanError::auth("hosted_upload", "missing API key")
                .with_severity(ErrorSeverity::Critical)
                .with_recovery_suggestion("set SCANNER_API_KEY"));
        }

        let object_path = format!("{}/{}", self.user_id, request.filename);
        let object_url = format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, self.bucket, object_path
        );

        let size = request.bytes.len();
        self.client
            .post(&object_url)
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, request.mime_type.as_str())
            .body(request.bytes)
            .send()
            .await?
            .error_for_status()
            .map_err(|err| {
                ScanError::upload("hosted", format!("object upload failed: {}", err))
                    .with_operation("object_put")
                    .with_context(format!("uploading {}", request.filename))
            })?;

        // Metadata row drives the dashboard listing and expiry sweep.
        let row = FileRow {
            user_id: &self.user_id,
            name: &request.filename,
            path: &object_path,
            size,
            mime: &request.mime_type,
            created_at: Utc::now().to_rfc3339(),
            expires_at: request.expires_at.map(|t| t.to_rfc3339()),
        };

        self.client
            .post(format!("{}/rest/v1/files", self.base_url))
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
            .json(&row)
            .send()
            .await?
            .error_for_status()
            .map_err(|err| {
                ScanError::upload("hosted", format!("metadata insert failed: {}", err))
                    .with_operation("metadata_insert")
            })?;

        info!(file = %request.filename, path = %object_path, "uploaded scan to hosted storage");

        Ok(UploadReceipt {
            filename: request.filename,
            location: object_path,
            expires_at: request.expires_at,
        })
    }

    fn name(&self) -> &str {
        "hosted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HasSeverity;

    #[tokio::test]
    async fn test_empty_api_key_is_critical_auth_error() {
        let backend = HostedBackend::new("https://example.test", "", "scans", "user-1");
        let err = backend
            .upload(UploadRequest {
                filename: "scan_2024-01-01T00-00-00.png".to_string(),
                mime_type: "image/png".to_string(),
                bytes: vec![0x89, 0x50],
                expires_at: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.category(), "auth");
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
