//! # Monochrome Rasters
//!
//! The encoder only ever asks one question of an image: is the dot at
//! `(x, y)` black? [`RasterImage`] captures that, and the types here adapt
//! common pixel sources to it.
//!
//! ```text
//! (0,0) ──────────────────────► X (columns, up to the print width)
//!   │
//!   │   ████████  ← one dot per pixel, no scaling
//!   │   ████████
//!   ▼
//!   Y (rows, paper feed direction)
//! ```

use image::GrayImage;

/// Read-only view of a black/white image.
///
/// Implementations never need to handle coordinates outside
/// `0..width() × 0..height()`; the band encoder pads past the bottom edge
/// itself.
pub trait RasterImage {
    /// Width in dots.
    fn width(&self) -> usize;

    /// Height in dots.
    fn height(&self) -> usize;

    /// Whether the dot at `(x, y)` should be printed.
    fn is_black(&self, x: usize, y: usize) -> bool;
}

impl<R: RasterImage + ?Sized> RasterImage for &R {
    fn width(&self) -> usize {
        (**self).width()
    }

    fn height(&self) -> usize {
        (**self).height()
    }

    fn is_black(&self, x: usize, y: usize) -> bool {
        (**self).is_black(x, y)
    }
}

/// Owned black/white raster, row-major, one `bool` per dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    dots: Vec<bool>,
}

impl Bitmap {
    /// All-white bitmap.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            dots: vec![false; width * height],
        }
    }

    /// Build a bitmap by evaluating `f(x, y)` for every dot.
    ///
    /// ```
    /// use boothprint::raster::{Bitmap, RasterImage};
    ///
    /// let checker = Bitmap::from_fn(4, 4, |x, y| (x + y) % 2 == 0);
    /// assert!(checker.is_black(0, 0));
    /// assert!(!checker.is_black(1, 0));
    /// ```
    pub fn from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> bool) -> Self {
        let mut dots = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                dots.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            dots,
        }
    }

    /// Set a single dot. Out-of-range coordinates are ignored.
    pub fn set(&mut self, x: usize, y: usize, black: bool) {
        if x < self.width && y < self.height {
            self.dots[y * self.width + x] = black;
        }
    }

    /// Number of black dots.
    pub fn black_count(&self) -> usize {
        self.dots.iter().filter(|&&d| d).count()
    }

    /// Render as an 8-bit grayscale image (black = 0, white = 255).
    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let black = self.is_black(x as usize, y as usize);
            image::Luma([if black { 0 } else { 255 }])
        })
    }
}

impl RasterImage for Bitmap {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn is_black(&self, x: usize, y: usize) -> bool {
        self.dots[y * self.width + x]
    }
}

/// Luma below this prints as a dot.
pub const GRAY_THRESHOLD: u8 = 128;

impl RasterImage for GrayImage {
    fn width(&self) -> usize {
        self.dimensions().0 as usize
    }

    fn height(&self) -> usize {
        self.dimensions().1 as usize
    }

    fn is_black(&self, x: usize, y: usize) -> bool {
        self.get_pixel(x as u32, y as u32).0[0] < GRAY_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_white() {
        let bitmap = Bitmap::new(5, 3);
        assert_eq!(bitmap.width(), 5);
        assert_eq!(bitmap.height(), 3);
        assert_eq!(bitmap.black_count(), 0);
    }

    #[test]
    fn test_set_and_read() {
        let mut bitmap = Bitmap::new(4, 4);
        bitmap.set(2, 3, true);
        assert!(bitmap.is_black(2, 3));
        assert!(!bitmap.is_black(3, 2));
        assert_eq!(bitmap.black_count(), 1);

        bitmap.set(2, 3, false);
        assert_eq!(bitmap.black_count(), 0);
    }

    #[test]
    fn test_set_out_of_range_ignored() {
        let mut bitmap = Bitmap::new(2, 2);
        bitmap.set(2, 0, true);
        bitmap.set(0, 2, true);
        assert_eq!(bitmap.black_count(), 0);
    }

    #[test]
    fn test_gray_image_threshold() {
        let mut gray = GrayImage::new(3, 1);
        gray.put_pixel(0, 0, image::Luma([0]));
        gray.put_pixel(1, 0, image::Luma([127]));
        gray.put_pixel(2, 0, image::Luma([128]));

        assert!(gray.is_black(0, 0));
        assert!(gray.is_black(1, 0));
        assert!(!gray.is_black(2, 0));
    }

    #[test]
    fn test_to_gray_image_round_trip() {
        let bitmap = Bitmap::from_fn(6, 2, |x, _| x % 3 == 0);
        let gray = bitmap.to_gray_image();
        for y in 0..2 {
            for x in 0..6 {
                assert_eq!(gray.is_black(x, y), bitmap.is_black(x, y));
            }
        }
    }
}
