//! # Bayer 8x8 Ordered Dithering
//!
//! Photos are grayscale; the printer only knows "dot" or "no dot". This
//! module turns one into the other with ordered dithering: each pixel's
//! darkness is compared against a position-dependent threshold from the
//! Bayer matrix, so mid-gray comes out as an even checker of dots.
//!
//! ```text
//! Grayscale:    White    Light    Medium    Dark    Black
//!               ░░░░░░   ░░▒░░░   ░▒░▒░▒   ▒▓▒▓▒▓   ██████
//! ```
//!
//! Ordered dithering is deterministic and has no error diffusion, so
//! neighbouring bands never bleed into each other.

use image::{DynamicImage, GrayImage, imageops::FilterType};

use crate::raster::Bitmap;

/// Bayer 8x8 threshold matrix, values 0-63
pub const BAYER8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Threshold in (0, 1) for position `(x, y)`.
#[inline]
pub fn threshold(x: usize, y: usize) -> f32 {
    let matrix_value = BAYER8[y & 7][x & 7];
    (matrix_value as f32 + 0.5) / 64.0
}

/// Whether a dot with the given darkness (0.0 = white, 1.0 = black) prints.
#[inline]
pub fn should_print(x: usize, y: usize, intensity: f32) -> bool {
    intensity > threshold(x, y)
}

/// Dither an 8-bit grayscale image into a bitmap.
pub fn dither(gray: &GrayImage) -> Bitmap {
    let (width, height) = gray.dimensions();
    Bitmap::from_fn(width as usize, height as usize, |x, y| {
        let luma = gray.get_pixel(x as u32, y as u32).0[0];
        let intensity = 1.0 - luma as f32 / 255.0;
        should_print(x, y, intensity)
    })
}

/// Resize a photo to `width_dots` (keeping its aspect ratio) and dither it.
///
/// Images already narrower than the print width are left at their size.
pub fn prepare_photo(image: &DynamicImage, width_dots: u32) -> Bitmap {
    let (width, height) = (image.width(), image.height());
    let resized = if width > width_dots && width > 0 {
        let new_height = ((height as u64 * width_dots as u64) / width as u64).max(1) as u32;
        image.resize_exact(width_dots, new_height, FilterType::Triangle)
    } else {
        image.clone()
    };
    dither(&resized.to_luma8())
}

// ============================================================================
// TESTS
// ============================================================================
