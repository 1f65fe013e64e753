//! Google Drive storage backend.
//!
//! Mirrors the scanner's Drive integration: scans land in a `Scans`
//! folder (created on first use) via the multipart upload endpoint.
//! The access token arrives from outside — the OAuth flow itself is
//! not this crate's concern.
//!
//! Drive has no server-side TTL, so the expiry timestamp travels on
//! the [`UploadReceipt`] for an external sweeper to act on.

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::error::{ErrorSeverity, ScanError, ScanResult};
use crate::upload::{StorageBackend, UploadRequest, UploadReceipt, http_client};

const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Debug, Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

/// Google Drive backend using a caller-supplied OAuth access token.
pub struct DriveBackend {
    client: reqwest::Client,
    access_token: String,
    api_base: String,
    upload_base: String,
    folder_name: String,
    folder_id: OnceCell<String>,
}

impl DriveBackend {
    /// Create a backend uploading into `folder_name` under the Drive
    /// root.
    pub fn new(access_token: impl Into<String>, folder_name: impl Into<String>) -> Self {
        Self {
            client: http_client(),
            access_token: access_token.into(),
            api_base: "https://www.googleapis.com/drive/v3".to_string(),
            upload_base: "https://www.googleapis.com/upload/drive/v3".to_string(),
            folder_name: folder_name.into(),
            folder_id: OnceCell::new(),
        }
    }

    /// Override the API endpoints (tests, regional mirrors).
    pub fn with_endpoints(
        mut self,
        api_base: impl Into<String>,
        upload_base: impl Into<String>,
    ) -> Self {
        self.api_base = api_base.into();
        self.upload_base = upload_base.into();
        self
    }

    /// Find or create the scans folder, caching its id for the life of
    /// the backend.
    async fn ensure_folder(&self) -> ScanResult<&str> {
        let id = self
            .folder_id
            .get_or_try_init(|| async {
                let query = format!(
                    "name='{}' and mimeType='{}' and trashed=false",
                    self.folder_name, FOLDER_MIME
                );
                let listing: DriveFileList = self
                    .client
                    .get(format!("{}/files", self.api_base))
                    .query(&[("q", query.as_str())])
                    .bearer_auth(&self.access_token)
                    .send()
                    .await?
                    .error_for_status()
                    .map_err(|err| {
                        ScanError::upload("drive", format!("folder lookup failed: {}", err))
                    })?
                    .json()
                    .await?;

                if let Some(existing) = listing.files.into_iter().next() {
                    debug!(folder = %self.folder_name, id = %existing.id, "found scans folder");
                    return Ok::<_, ScanError>(existing.id);
                }

                let created: DriveFile = self
                    .client
                    .post(format!("{}/files", self.api_base))
                    .bearer_auth(&self.access_token)
                    .json(&json!({
                        "name": self.folder_name,
                        "mimeType": FOLDER_MIME,
                    }))
                    .send()
                    .await?
                    .error_for_status()
                    .map_err(|err| {
                        ScanError::upload("drive", format!("folder creation failed: {}", err))
                    })?
                    .json()
                    .await?;

                info!(folder = %self.folder_name, id = %created.id, "created scans folder");
                Ok(created.id)
            })
            .await?;
        Ok(id.as_str())
    }
}

#[async_trait::async_trait]
impl StorageBackend for DriveBackend {
    async fn upload(&self, request: UploadRequest) -> ScanResult<UploadReceipt> {
        if self.access_token.is_empty() {
            return Err(ScanError::auth("drive_upload", "missing access token")
                .with_severity(ErrorSeverity::Critical)
                .with_recovery_suggestion("set DRIVE_ACCESS_TOKEN"));
        }

        let folder_id = self.ensure_folder().await?;

        let metadata = json!({
            "name": request.filename,
            "mimeType": request.mime_type,
            "parents": [folder_id],
        });

        let form = Form::new()
            .part(
                "metadata",
                Part::text(metadata.to_string())
                    .mime_str("application/json")
                    .map_err(|err| ScanError::upload("drive", err.to_string()))?,
            )
            .part(
                "file",
                Part::bytes(request.bytes)
                    .file_name(request.filename.clone())
                    .mime_str(&request.mime_type)
                    .map_err(|err| ScanError::upload("drive", err.to_string()))?,
            );

        let created: DriveFile = self
            .client
            .post(format!("{}/files", self.upload_base))
            .query(&[("uploadType", "multipart")])
            .bearer_auth(&self.access_token)
            .multipart(form)
            .send()
            .await?
            .error_for_status()
            .map_err(|err| {
                ScanError::upload("drive", err.to_string())
                    .with_operation("multipart_upload")
                    .with_context(format!("uploading {}", request.filename))
            })?
            .json()
            .await?;

        info!(file = %request.filename, id = %created.id, "uploaded scan to Drive");

        Ok(UploadReceipt {
            filename: request.filename,
            location: created.id,
            expires_at: request.expires_at,
        })
    }

    fn name(&self) -> &str {
        "drive"
    }
}
