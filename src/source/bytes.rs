//! In-memory bitmap source: decodes an already-loaded encoded image.
//!
//! This covers every path where the pixels arrive without a filesystem
//! read: stdin, clipboard payloads, or a camera frame that an
//! integration has already pulled off the device.

use async_trait::async_trait;

use crate::bitmap::Bitmap;
use crate::error::{ScanError, ScanResult};
use crate::source::BitmapSource;

/// Decodes an encoded image held in memory into an RGBA bitmap.
pub struct BytesSource {
    bytes: Vec<u8>,
    description: String,
}

impl BytesSource {
    /// Create a source over `bytes`; `origin` labels the payload for
    /// diagnostics ("stdin", "camera", ...).
    pub fn new(bytes: Vec<u8>, origin: impl Into<String>) -> Self {
        let origin = origin.into();
        Self {
            bytes,
            description: format!("bytes:{}", origin),
        }
    }
}

#[async_trait]
impl BitmapSource for BytesSource {
    async fn acquire(&mut self) -> ScanResult<Bitmap> {
        if self.bytes.is_empty() {
            return Err(ScanError::acquire(
                "bytes",
                "empty payload, nothing to decode",
            ));
        }
        let decoded = image::load_from_memory(&self.bytes).map_err(|err| {
            ScanError::acquire("bytes", format!("could not decode image: {}", err))
        })?;
        Ok(decoded.into_rgba8().into())
    }

    fn describe(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_payload_rejected() {
        let mut source = BytesSource::new(Vec::new(), "stdin");
        let err = source.acquire().await.unwrap_err();
        assert_eq!(err.category(), "acquire");
    }

    #[tokio::test]
    async fn test_decodes_encoded_png() {
        let image = image::RgbaImage::from_pixel(3, 3, image::Rgba([1, 2, 3, 255]));
        let mut encoded = Vec::new();
        image
            .write_to(
                &mut std::io::Cursor::new(&mut encoded),
                image::ImageFormat::Png,
            )
            .unwrap();

        let mut source = BytesSource::new(encoded, "camera");
        let bitmap = source.acquire().await.unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (3, 3));
        assert_eq!(bitmap.pixel(1, 1), [1, 2, 3, 255]);
    }
}
