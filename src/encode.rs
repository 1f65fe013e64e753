//! # Encoder Adapter
//!
//! Serializes a transformed [`Bitmap`] to a compressed byte stream for
//! preview, download, or upload. Two formats are supported: baseline
//! JPEG (the default, alpha dropped) and PNG (RGBA preserved).
//!
//! Encoding is deterministic for identical inputs, which keeps the
//! encode → display preview loop and the encode → upload byte stream
//! consistent with each other.

use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, Utc};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::bitmap::Bitmap;
use crate::error::{ScanError, ScanResult};

/// Default JPEG quality factor, matching the scanner's 0.95 canvas
/// quality.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Baseline JPEG at a fixed quality factor. No alpha channel.
    #[default]
    Jpeg,
    /// Lossless PNG, RGBA preserved.
    Png,
}

impl OutputFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    /// MIME type for upload metadata and data URLs.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Parse a format name. Unlike filter modes, an unknown format is
    /// an error: it reaches the wire as a MIME type and an extension.
    pub fn from_name(name: &str) -> ScanResult<Self> {
        match name {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            other => Err(ScanError::validation(
                "format",
                "must be one of: jpeg, png",
                other,
            )),
        }
    }
}

/// A bitmap serialized to a compressed image byte stream.
#[derive(Debug, Clone)]
pub struct EncodedScan {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
}

impl EncodedScan {
    /// MIME type of the encoded payload.
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// Render as a `data:` URL for inline preview embedding.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type(),
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Encode a bitmap to the requested format.
///
/// `quality` applies to JPEG only (1–100); PNG is lossless. JPEG output
/// drops the alpha channel since baseline JPEG has no transparency.
pub fn encode(bitmap: &Bitmap, format: OutputFormat, quality: u8) -> ScanResult<EncodedScan> {
    if quality == 0 || quality > 100 {
        return Err(ScanError::validation(
            "quality",
            "must be between 1 and 100",
            quality.to_string(),
        ));
    }

    let mut bytes = Vec::new();
    match format {
        OutputFormat::Jpeg => {
            let rgba = bitmap.clone().into_rgba_image()?;
            let rgb = image::DynamicImage::ImageRgba8(rgba).into_rgb8();
            let mut encoder = JpegEncoder::new_with_quality(Cursor::new(&mut bytes), quality);
            encoder
                .encode_image(&rgb)
                .map_err(|err| ScanError::encode("jpeg", err.to_string()))?;
        }
        OutputFormat::Png => {
            let encoder = PngEncoder::new(Cursor::new(&mut bytes));
            encoder
                .write_image(
                    bitmap.data(),
                    bitmap.width(),
                    bitmap.height(),
                    ExtendedColorType::Rgba8,
                )
                .map_err(|err| ScanError::encode("png", err.to_string()))?;
        }
    }

    Ok(EncodedScan { bytes, format })
}

/// Generated upload/download filename: `scan_<timestamp>.<ext>` with
/// the ISO timestamp's `:` separators flattened to `-`.
pub fn scan_filename(format: OutputFormat, at: DateTime<Utc>) -> String {
    format!(
        "scan_{}.{}",
        at.format("%Y-%m-%dT%H-%M-%S"),
        format.extension()
    )
}
