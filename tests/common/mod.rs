//! Common test utilities and fixtures for the docscan library tests
//!
//! This module provides shared bitmap builders and encoded-image
//! fixtures for testing the scanning pipeline.

// Not every test crate uses every fixture.
#![allow(dead_code)]

use docscan::bitmap::Bitmap;

/// Standard fixture sizes
pub const PAGE: (u32, u32) = (64, 48);
pub const THUMB: (u32, u32) = (8, 8);

/// Create a solid color test bitmap
pub fn solid_bitmap(size: (u32, u32), rgba: [u8; 4]) -> Bitmap {
    Bitmap::filled(size.0, size.1, rgba)
}

/// Create a horizontal gradient bitmap covering the full channel range,
/// with a varying alpha so alpha pass-through can be verified.
pub fn gradient_bitmap(size: (u32, u32)) -> Bitmap {
    let (width, height) = size;
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for x in 0..width {
            let r = ((x * 255) / width.max(1)) as u8;
            let g = ((y * 255) / height.max(1)) as u8;
            let b = r.wrapping_add(g);
            let a = 255 - (y as u8).wrapping_mul(3);
            data.extend_from_slice(&[r, g, b, a]);
        }
    }
    Bitmap::from_rgba8(width, height, data).expect("gradient fixture is well-formed")
}

/// Encode a bitmap to PNG bytes for source-adapter fixtures.
pub fn png_bytes(bitmap: &Bitmap) -> Vec<u8> {
    let image = bitmap.clone().into_rgba_image().expect("valid fixture");
    let mut bytes = Vec::new();
    image
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .expect("png encoding of fixture");
    bytes
}
