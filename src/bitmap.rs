//! # Bitmap Data Model
//!
//! Raw RGBA pixel buffers as they flow through the scanning pipeline.
//!
//! A [`Bitmap`] is a rectangular, row-major buffer with four 8-bit
//! channels per pixel. The buffer-length invariant
//! `data.len() == width * height * 4` is enforced at construction, so
//! every later stage can index the buffer without re-checking.
//! Alpha is carried through the pipeline but never modified by any
//! transform in this crate.

use crate::error::{ScanError, ScanResult};
use image::RgbaImage;

/// Number of channels per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// A rectangular RGBA8 pixel buffer, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Bitmap {
    /// Create a bitmap from a raw RGBA8 buffer.
    ///
    /// Returns a validation error when the buffer length does not
    /// match `width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> ScanResult<Self> {
        let expected = width as usize * height as usize * CHANNELS;
        if data.len() != expected {
            return Err(ScanError::validation(
                "bitmap_buffer",
                format!("length must equal width * height * 4 ({})", expected),
                data.len().to_string(),
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create a bitmap filled with a single RGBA color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixel_count = width as usize * height as usize;
        let mut data = vec![0u8; pixel_count * CHANNELS];
        for pixel in data.chunks_exact_mut(CHANNELS) {
            pixel.copy_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Length of the underlying buffer in bytes.
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    /// Borrow the raw RGBA buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Read a single pixel as `[r, g, b, a]`.
    ///
    /// # Panics
    ///
    /// Panics when `(x, y)` is outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Convert into an [`image::RgbaImage`] for the codec boundary.
    pub fn into_rgba_image(self) -> ScanResult<RgbaImage> {
        let (width, height) = (self.width, self.height);
        RgbaImage::from_raw(width, height, self.data).ok_or_else(|| {
            ScanError::processing(
                "bitmap_to_image",
                format!("buffer does not fit {}x{} RGBA image", width, height),
            )
        })
    }
}

impl From<RgbaImage> for Bitmap {
    fn from(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: image.into_raw(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba8_enforces_length_invariant() {
        assert!(Bitmap::from_rgba8(2, 2, vec![0u8; 16]).is_ok());

        let err = Bitmap::from_rgba8(2, 2, vec![0u8; 15]).unwrap_err();
        assert_eq!(err.category(), "validation");
    }

    #[test]
    fn test_filled_and_pixel_access() {
        let bitmap = Bitmap::filled(3, 2, [10, 20, 30, 255]);
        assert_eq!(bitmap.pixel_count(), 6);
        assert_eq!(bitmap.byte_len(), 24);
        assert_eq!(bitmap.pixel(2, 1), [10, 20, 30, 255]);
    }

    #[test]
    fn test_rgba_image_round_trip() {
        let bitmap = Bitmap::filled(4, 3, [1, 2, 3, 4]);
        let image = bitmap.clone().into_rgba_image().unwrap();
        assert_eq!(image.dimensions(), (4, 3));
        let back: Bitmap = image.into();
        assert_eq!(back, bitmap);
    }
}
