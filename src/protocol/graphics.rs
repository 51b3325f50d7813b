//! # Bit-Image Band Encoding
//!
//! Converts a [`RasterImage`] into the printer's 24-dot bit-image bands.
//!
//! ## Band Layout
//!
//! An image is cut into horizontal strips 24 rows tall. Each strip is sent as
//! one self-contained command block:
//!
//! | Bytes | Meaning |
//! |-------|---------|
//! | `1B 33 18` | Line spacing = 24 dots |
//! | `1B 2A 21` | Bit-image mode, 24-dot double density |
//! | `nL nH` | Column count, little-endian |
//! | `3 × W` | Column data |
//! | `0A` | Print the band and advance |
//!
//! ## Bit Packing
//!
//! Unlike raster mode, each byte is a *vertical* slice of 8 dots in one
//! column. Three bytes stack to cover all 24 rows:
//!
//! ```text
//!            column x
//!          ┌─────────┐
//! row +0   │ byte 0  │ bit 7 (MSB)
//!   ...    │         │
//! row +7   │         │ bit 0
//!          ├─────────┤
//! row +8   │ byte 1  │ bit 7
//!   ...    │         │
//! row +15  │         │ bit 0
//!          ├─────────┤
//! row +16  │ byte 2  │ bit 7
//!   ...    │         │
//! row +23  │         │ bit 0
//!          └─────────┘
//! ```
//!
//! Rows past the bottom of the image are encoded as white, so every band
//! carries exactly `3 × W` data bytes no matter how tall the image is.

use super::CommandBuffer;
use super::commands::{LF, line_spacing_24, select_bit_image_mode};
use crate::raster::RasterImage;

/// Dot rows per band.
pub const BAND_HEIGHT: usize = 24;

/// Data bytes per column within a band.
pub const BYTES_PER_COLUMN: usize = BAND_HEIGHT / 8;

/// Framing bytes around the column data of one band:
/// line spacing (3) + mode select (3) + column count (2) + line feed (1).
pub const BAND_FRAMING_LEN: usize = 9;

/// Widest band the two-byte column count can describe.
pub const MAX_BAND_WIDTH: usize = u16::MAX as usize;

/// Number of bands needed for an image `height` rows tall.
#[inline]
pub fn band_count(height: usize) -> usize {
    height.div_ceil(BAND_HEIGHT)
}

/// Total length of one encoded band for an image `width` columns wide.
#[inline]
pub fn band_len(width: usize) -> usize {
    BAND_FRAMING_LEN + BYTES_PER_COLUMN * width
}

/// Encode the 3-byte vertical slice of column `x` starting at `band_start`.
///
/// Byte order is top, middle, bottom; within each byte the top row is the
/// most significant bit.
///
/// ```
/// use boothprint::protocol::graphics::encode_column;
/// use boothprint::raster::Bitmap;
///
/// let mut image = Bitmap::new(1, 24);
/// image.set(0, 0, true); // top row of the first byte
/// image.set(0, 23, true); // bottom row of the last byte
///
/// assert_eq!(encode_column(&image, 0, 0), [0x80, 0x00, 0x01]);
/// ```
pub fn encode_column<R: RasterImage + ?Sized>(
    image: &R,
    x: usize,
    band_start: usize,
) -> [u8; BYTES_PER_COLUMN] {
    let height = image.height();
    let mut column = [0u8; BYTES_PER_COLUMN];

    for (sub_row, byte) in column.iter_mut().enumerate() {
        let top = band_start + sub_row * 8;
        for row_offset in 0..8 {
            let y = top + row_offset;
            // Past the bottom edge: white, but still part of the column
            if y < height && image.is_black(x, y) {
                *byte |= 1 << (7 - row_offset);
            }
        }
    }

    column
}

/// Encode the band that starts at row `band_start`.
///
/// The image must be at most [`MAX_BAND_WIDTH`] columns wide; debug builds
/// panic otherwise, release builds emit a truncated column count.
///
/// ## Example
///
/// ```
/// use boothprint::protocol::graphics::{band_len, encode_band};
/// use boothprint::raster::Bitmap;
///
/// let image = Bitmap::new(8, 10);
/// let band = encode_band(&image, 0);
///
/// assert_eq!(&band[0..8], &[0x1B, 0x33, 0x18, 0x1B, 0x2A, 0x21, 8, 0]);
/// assert_eq!(band.len(), band_len(8));
/// assert_eq!(*band.last().unwrap(), 0x0A);
/// ```
pub fn encode_band<R: RasterImage + ?Sized>(image: &R, band_start: usize) -> CommandBuffer {
    let width = image.width();
    debug_assert!(
        width <= MAX_BAND_WIDTH,
        "band of {} columns exceeds the 16-bit column count",
        width
    );

    let mut cmd = Vec::with_capacity(band_len(width));
    cmd.extend(line_spacing_24());
    cmd.extend(select_bit_image_mode());
    cmd.push((width & 0xFF) as u8);
    cmd.push(((width >> 8) & 0xFF) as u8);

    for x in 0..width {
        cmd.extend_from_slice(&encode_column(image, x, band_start));
    }

    cmd.push(LF);
    cmd
}

/// Lazy iterator over the encoded bands of an image.
///
/// Bands are independent, so each one can be transmitted before the next is
/// computed. Created by [`bands`].
#[derive(Debug)]
pub struct Bands<'a, R: ?Sized> {
    image: &'a R,
    row: usize,
}

/// Iterate over the bands of `image`, top to bottom.
///
/// ```
/// use boothprint::protocol::graphics::bands;
/// use boothprint::raster::Bitmap;
///
/// let image = Bitmap::new(16, 50);
/// assert_eq!(bands(&image).count(), 3); // rows 0, 24, 48
/// ```
pub fn bands<R: RasterImage + ?Sized>(image: &R) -> Bands<'_, R> {
    Bands { image, row: 0 }
}

impl<R: RasterImage + ?Sized> Iterator for Bands<'_, R> {
    type Item = CommandBuffer;

    fn next(&mut self) -> Option<Self::Item> {
        if self.row >= self.image.height() {
            return None;
        }
        let band = encode_band(self.image, self.row);
        self.row += BAND_HEIGHT;
        Some(band)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = band_count(self.image.height().saturating_sub(self.row));
        (remaining, Some(remaining))
    }
}

impl<R: RasterImage + ?Sized> ExactSizeIterator for Bands<'_, R> {}

/// Encode every band of an image into one buffer.
///
/// Convenient for dumping a whole image to a file; printers should be fed
/// band by band through [`bands`] instead.
pub fn encode<R: RasterImage + ?Sized>(image: &R) -> CommandBuffer {
    let mut out = Vec::with_capacity(band_count(image.height()) * band_len(image.width()));
    for band in bands(image) {
        out.extend(band);
    }
    out
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Bitmap;

    fn payload(band: &[u8]) -> &[u8] {
        &band[8..band.len() - 1]
    }

    #[test]
    fn test_band_header() {
        let image = Bitmap::new(384, 24);
        let band = encode_band(&image, 0);

        assert_eq!(&band[0..3], &[0x1B, 0x33, 0x18]);
        assert_eq!(&band[3..6], &[0x1B, 0x2A, 0x21]);
        // 384 = 0x0180
        assert_eq!(band[6], 0x80);
        assert_eq!(band[7], 0x01);
        assert_eq!(band.len(), 9 + 3 * 384);
    }

    #[test]
    fn test_band_count() {
        assert_eq!(band_count(0), 0);
        assert_eq!(band_count(1), 1);
        assert_eq!(band_count(24), 1);
        assert_eq!(band_count(25), 2);
        assert_eq!(band_count(48), 2);
        assert_eq!(band_count(200), 9);
    }

    #[test]
    fn test_bands_for_every_height() {
        for height in 0..100 {
            let image = Bitmap::new(7, height);
            let encoded: Vec<_> = bands(&image).collect();
            assert_eq!(encoded.len(), band_count(height), "height {}", height);
            for band in &encoded {
                assert_eq!(band.len(), band_len(7));
            }
        }
    }

    #[test]
    fn test_size_hint_tracks_progress() {
        let image = Bitmap::new(2, 60);
        let mut iter = bands(&image);
        assert_eq!(iter.len(), 3);
        iter.next();
        assert_eq!(iter.len(), 2);
        iter.next();
        iter.next();
        assert_eq!(iter.len(), 0);
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_all_white_payload_is_zero() {
        let image = Bitmap::new(20, 70);
        for band in bands(&image) {
            assert!(payload(&band).iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn test_single_pixel_sets_single_bit() {
        let (width, height) = (10, 60);
        for &(x0, y0) in &[(0, 0), (9, 59), (3, 7), (4, 8), (5, 23), (6, 24), (1, 41)] {
            let mut image = Bitmap::new(width, height);
            image.set(x0, y0, true);

            let encoded: Vec<_> = bands(&image).collect();
            let total_bits: u32 = encoded
                .iter()
                .map(|band| payload(band).iter().map(|b| b.count_ones()).sum::<u32>())
                .sum();
            assert_eq!(total_bits, 1);

            let band = &encoded[y0 / BAND_HEIGHT];
            let index = x0 * 3 + (y0 % 24) / 8;
            assert_eq!(payload(band)[index], 1 << (7 - (y0 % 8)));
        }
    }

    #[test]
    fn test_all_black_with_short_last_band() {
        // 2 wide, 26 tall: second band has rows 24 and 25 only
        let image = Bitmap::from_fn(2, 26, |_, _| true);
        let encoded: Vec<_> = bands(&image).collect();
        assert_eq!(encoded.len(), 2);

        assert_eq!(payload(&encoded[0]), &[0xFF; 6]);
        assert_eq!(payload(&encoded[1]), &[0xC0, 0x00, 0x00, 0xC0, 0x00, 0x00]);
    }

    #[test]
    fn test_column_byte_order() {
        let mut image = Bitmap::new(1, 24);
        image.set(0, 8, true);
        image.set(0, 16, true);
        image.set(0, 17, true);
        assert_eq!(encode_column(&image, 0, 0), [0x00, 0x80, 0xC0]);
    }

    #[test]
    fn test_wide_image_column_count() {
        let image = Bitmap::new(300, 1);
        let band = encode_band(&image, 0);
        // 300 = 0x012C
        assert_eq!(&band[6..8], &[0x2C, 0x01]);
    }

    #[test]
    fn test_zero_width_image() {
        let image = Bitmap::new(0, 30);
        let encoded: Vec<_> = bands(&image).collect();
        assert_eq!(encoded.len(), 2);
        assert_eq!(
            encoded[0],
            vec![0x1B, 0x33, 0x18, 0x1B, 0x2A, 0x21, 0, 0, 0x0A]
        );
    }

    #[test]
    fn test_encode_concatenates_bands() {
        let image = Bitmap::from_fn(5, 30, |x, y| (x * y) % 3 == 0);
        let joined: Vec<u8> = bands(&image).flatten().collect();
        assert_eq!(encode(&image), joined);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "16-bit column count")]
    fn test_band_wider_than_column_count_panics() {
        let image = Bitmap::new(MAX_BAND_WIDTH + 1, 1);
        encode_band(&image, 0);
    }
}
