//! # Storage Backends
//!
//! Upload of encoded scans to external storage, with an auto-expiry
//! (retention) policy stamped on every upload.
//!
//! One backend is active per scan and at most one upload is in flight
//! per user action; there is no retry logic — a failure surfaces once
//! and the user retries manually.
//!
//! Backends:
//! - [`DriveBackend`]: Google Drive multipart upload into a `Scans`
//!   folder
//! - [`HostedBackend`]: hosted storage API (object PUT + metadata row
//!   with `expires_at`)
//! - [`LocalBackend`]: directory on disk with a JSON sidecar; doubles
//!   as the no-network test backend

pub mod drive;
pub mod hosted;
pub mod local;

pub use drive::DriveBackend;
pub use hosted::HostedBackend;
pub use local::LocalBackend;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ScanResult;

/// Hard ceiling on any single backend HTTP request. A request that
/// exceeds it surfaces as [`crate::error::ScanError::Timeout`].
pub const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// HTTP client shared by the remote backends, with the request
/// timeout applied.
pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// How long an uploaded scan is kept before it is eligible for
/// deletion. `days == 0` disables expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionPolicy {
    pub days: u32,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self { days: 7 }
    }
}

impl RetentionPolicy {
    /// Keep uploads forever.
    pub fn keep_forever() -> Self {
        Self { days: 0 }
    }

    /// Expiry timestamp for an upload created at `created`, or `None`
    /// when expiry is disabled.
    pub fn expires_at(&self, created: DateTime<Utc>) -> Option<DateTime<Utc>> {
        if self.days == 0 {
            None
        } else {
            Some(created + Duration::days(i64::from(self.days)))
        }
    }
}

/// A single encoded scan ready for upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Generated filename, `scan_<timestamp>.<ext>`.
    pub filename: String,
    /// MIME type matching the filename extension.
    pub mime_type: String,
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
    /// When the stored object should expire, if ever.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Confirmation returned by a backend after a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadReceipt {
    /// Filename as stored.
    pub filename: String,
    /// Backend-specific location (Drive file id, object path, local
    /// path).
    pub location: String,
    /// Expiry carried through from the request. Backends without
    /// server-side TTL keep it here for an external sweeper.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Abstract storage destination for encoded scans.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Upload one scan. Single outstanding request, no retries.
    async fn upload(&self, request: UploadRequest) -> ScanResult<UploadReceipt>;

    /// Backend name for logs and error context.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_retention_default_is_seven_days() {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let expires = RetentionPolicy::default().expires_at(created).unwrap();
        assert_eq!(expires, Utc.with_ymd_and_hms(2024, 1, 8, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_zero_days_means_no_expiry() {
        let created = Utc::now();
        assert_eq!(RetentionPolicy::keep_forever().expires_at(created), None);
    }
}
