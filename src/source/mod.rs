//! # Bitmap Source Adapters
//!
//! Pluggable sources that produce the raw [`Bitmap`] a scan starts
//! from: a still image file on disk, or an already-encoded image held
//! in memory (stdin, clipboard, a camera frame handed over by an
//! integration). All sources deliver full source resolution — no
//! implicit downscaling.
//!
//! A camera is just another [`BitmapSource`] implementation: an
//! integrator decodes or wraps the device frame and hands it in. The
//! recoverable-error contract drives [`acquire_with_fallback`], which
//! reproduces the scanner's camera-denied → file-picker behavior.

pub mod bytes;
pub mod file;

pub use bytes::BytesSource;
pub use file::FileSource;

use crate::bitmap::Bitmap;
use crate::error::{Recoverable, ScanResult};
use async_trait::async_trait;
use tracing::warn;

/// Abstract interface for bitmap sources.
/// Enables pluggable acquisition backends (file, memory, camera).
#[async_trait]
pub trait BitmapSource: Send {
    /// Produce a bitmap from this source.
    ///
    /// # Returns
    ///
    /// The decoded RGBA bitmap at full source resolution, or an
    /// acquisition error. Acquisition errors are recoverable so the
    /// caller can offer an alternate source.
    async fn acquire(&mut self) -> ScanResult<Bitmap>;

    /// Short human-readable description of the source for diagnostics.
    fn describe(&self) -> &str;
}

/// Try the primary source; on a recoverable failure, fall back to the
/// alternate source.
///
/// Non-recoverable primary errors propagate immediately. When both
/// sources fail, the fallback's error is returned with the primary's
/// failure recorded in its metadata.
pub async fn acquire_with_fallback(
    primary: &mut dyn BitmapSource,
    fallback: &mut dyn BitmapSource,
) -> ScanResult<Bitmap> {
    match primary.acquire().await {
        Ok(bitmap) => Ok(bitmap),
        Err(err) if err.is_recoverable() => {
            warn!(
                primary = primary.describe(),
                fallback = fallback.describe(),
                error = %err,
                "primary source failed, trying fallback"
            );
            let primary_failure = err.to_string();
            fallback
                .acquire()
                .await
                .map_err(|fallback_err| fallback_err.with_metadata("primary_failure", primary_failure))
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScanError;

    struct StubSource {
        result: Option<ScanResult<Bitmap>>,
        label: &'static str,
    }

    #[async_trait]
    impl BitmapSource for StubSource {
        async fn acquire(&mut self) -> ScanResult<Bitmap> {
            self.result.take().expect("source polled once")
        }

        fn describe(&self) -> &str {
            self.label
        }
    }

    #[tokio::test]
    async fn test_fallback_on_recoverable_error() {
        let mut primary = StubSource {
            result: Some(Err(ScanError::acquire("camera", "permission denied"))),
            label: "camera",
        };
        let expected = Bitmap::filled(2, 2, [1, 2, 3, 255]);
        let mut fallback = StubSource {
            result: Some(Ok(expected.clone())),
            label: "file",
        };

        let bitmap = acquire_with_fallback(&mut primary, &mut fallback)
            .await
            .unwrap();
        assert_eq!(bitmap, expected);
    }

    #[tokio::test]
    async fn test_non_recoverable_error_propagates() {
        let mut primary = StubSource {
            result: Some(Err(ScanError::config("input", "", "missing"))),
            label: "camera",
        };
        let mut fallback = StubSource {
            result: Some(Ok(Bitmap::filled(1, 1, [0, 0, 0, 0]))),
            label: "file",
        };

        let err = acquire_with_fallback(&mut primary, &mut fallback)
            .await
            .unwrap_err();
        assert_eq!(err.category(), "config");
    }

    #[tokio::test]
    async fn test_both_sources_failing_keeps_primary_context() {
        let mut primary = StubSource {
            result: Some(Err(ScanError::acquire("camera", "no device"))),
            label: "camera",
        };
        let mut fallback = StubSource {
            result: Some(Err(ScanError::acquire("file", "corrupt image"))),
            label: "file",
        };

        let err = acquire_with_fallback(&mut primary, &mut fallback)
            .await
            .unwrap_err();
        assert_eq!(err.category(), "acquire");
        assert!(err.context().metadata.contains_key("primary_failure"));
    }
}
