//! # Document Scanning Pipeline Library
//!
//! A document scanner pipeline: acquire a still image, apply a
//! per-pixel filter/tone transform, encode to JPEG or PNG, then store
//! the result in a storage backend with an auto-expiry policy.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//! - `source`: Pluggable bitmap acquisition (file, in-memory, camera
//!   handoff) with recoverable-error fallback
//! - `processing`: The pure per-pixel filter/tone transform
//! - `bitmap`: The raw RGBA buffer type and its invariants
//! - `encode`: JPEG/PNG serialization, data URLs, scan filenames
//! - `upload`: Storage backends (local, Google Drive, hosted API) and
//!   the retention policy
//! - `session`: Original-bitmap lifecycle and parameter re-derivation
//! - `config`: Configuration management and validation
//!
//! ## Example
//!
//! ```rust,no_run
//! use docscan::{ScanOptions, run_scan};
//! use docscan::processing::{FilterMode, FilterParams};
//! use docscan::encode::OutputFormat;
//! use docscan::upload::{LocalBackend, RetentionPolicy};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = ScanOptions {
//!     input: "page.jpg".into(),
//!     fallback: None,
//!     params: FilterParams {
//!         mode: FilterMode::Grayscale,
//!         brightness: 10,
//!         contrast: 1.2,
//!     },
//!     format: OutputFormat::Jpeg,
//!     quality: 95,
//!     retention: RetentionPolicy::default(),
//! };
//!
//! let backend = LocalBackend::new("scans");
//! let outcome = run_scan(&options, &backend).await?;
//! println!("stored {}", outcome.receipt.filename);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use chrono::Utc;
use tracing::info;

pub mod bitmap;
pub mod config;
pub mod encode;
pub mod error;
pub mod processing;
pub mod session;
pub mod source;
pub mod upload;

/// Re-export error types for convenience
pub use error::{
    HasRecoverySuggestion, HasSeverity, Recoverable, Retryable, ScanError, ScanResult,
};

use crate::encode::OutputFormat;
use crate::processing::FilterParams;
use crate::session::ScanSession;
use crate::source::{BitmapSource, FileSource, acquire_with_fallback};
use crate::upload::{RetentionPolicy, StorageBackend, UploadReceipt, UploadRequest};

/// Options for a single scan run.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Image file to acquire the original bitmap from.
    pub input: PathBuf,

    /// Alternate image tried when the primary source fails
    /// recoverably (the camera-denied → file-picker path).
    pub fallback: Option<PathBuf>,

    /// Filter mode plus brightness/contrast grade.
    pub params: FilterParams,

    /// Output encoding, JPEG by default.
    pub format: OutputFormat,

    /// JPEG quality factor (1-100). PNG ignores it.
    pub quality: u8,

    /// Auto-expiry policy stamped on the stored scan.
    pub retention: RetentionPolicy,
}

/// Result of a completed scan run.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Receipt from the storage backend.
    pub receipt: UploadReceipt,
    /// Dimensions of the scanned bitmap.
    pub width: u32,
    pub height: u32,
    /// Size of the encoded payload in bytes.
    pub encoded_len: usize,
}

/// Run the full pipeline: acquire → transform → encode → store.
///
/// The transform runs synchronously; only acquisition I/O and the
/// upload are asynchronous. Exactly one upload is issued, with no
/// retry — a failure surfaces once.
pub async fn run_scan(
    options: &ScanOptions,
    backend: &dyn StorageBackend,
) -> ScanResult<ScanOutcome> {
    let mut primary = FileSource::new(&options.input);
    let bitmap = match &options.fallback {
        Some(fallback_path) => {
            let mut fallback = FileSource::new(fallback_path);
            acquire_with_fallback(&mut primary, &mut fallback).await?
        }
        None => primary.acquire().await?,
    };
    info!(
        width = bitmap.width(),
        height = bitmap.height(),
        "acquired original bitmap"
    );

    let mut session = ScanSession::new(bitmap);
    session.set_params(options.params);

    let encoded = session.encode_current(options.format, options.quality)?;
    let (width, height) = (session.original().width(), session.original().height());
    info!(
        mode = session.params().mode.name(),
        format = encoded.mime_type(),
        bytes = encoded.bytes.len(),
        "encoded scan"
    );

    let now = Utc::now();
    let filename = encode::scan_filename(options.format, now);
    let encoded_len = encoded.bytes.len();
    let request = UploadRequest {
        filename,
        mime_type: encoded.mime_type().to_string(),
        bytes: encoded.bytes,
        expires_at: options.retention.expires_at(now),
    };

    let receipt = backend.upload(request).await?;
    info!(
        backend = backend.name(),
        file = %receipt.filename,
        location = %receipt.location,
        "scan stored"
    );

    Ok(ScanOutcome {
        receipt,
        width,
        height,
        encoded_len,
    })
}
