//! # QR Code Bitmaps
//!
//! Turns a payload (usually a short link to the photo) into a square
//! black/white [`Bitmap`] ready for the band encoder.
//!
//! Codes always use error correction level H, which survives about 30%
//! damage; thermal paper smudges.
//!
//! ## Sizing
//!
//! ```text
//! ├─ pad ─┼──── modules × scale ────┼─ pad ─┤   = max(size, modules)
//!         │ quiet zone + code + quiet│
//! ```
//!
//! Each module is scaled by the largest whole factor that fits in `size`
//! dots, and the result is centred in a `size × size` square. When even one
//! dot per module doesn't fit, the bitmap grows to the unscaled code.

use qrcode::{EcLevel, QrCode};

use crate::error::{BoothprintError, Result};
use crate::raster::Bitmap;

/// Quiet zone around the code, in modules
pub const QUIET_ZONE_MODULES: usize = 4;

/// Generate a QR code bitmap about `size` dots square.
///
/// ## Example
///
/// ```
/// use boothprint::qr;
/// use boothprint::raster::RasterImage;
///
/// let bitmap = qr::generate("https://example.com/p/42", 200)?;
/// assert_eq!(bitmap.width(), 200);
/// assert_eq!(bitmap.height(), 200);
///
/// # Ok::<(), boothprint::BoothprintError>(())
/// ```
///
/// ## Errors
///
/// [`BoothprintError::Encoding`] if the payload doesn't fit in a QR code,
/// [`BoothprintError::InvalidImage`] if `size` is too large to allocate.
pub fn generate(data: &str, size: usize) -> Result<Bitmap> {
    let code = QrCode::with_error_correction_level(data, EcLevel::H)
        .map_err(|e| BoothprintError::Encoding(format!("QR code generation failed: {}", e)))?;

    let code_width = code.width();
    let modules = code_width + 2 * QUIET_ZONE_MODULES;
    let scale = (size / modules).max(1);
    let side = size.max(modules * scale);
    if side.checked_mul(side).is_none() {
        return Err(BoothprintError::InvalidImage(format!(
            "QR code of {} dots is too large",
            side
        )));
    }
    let padding = (side - modules * scale) / 2 + QUIET_ZONE_MODULES * scale;

    let mut bitmap = Bitmap::new(side, side);
    for qy in 0..code_width {
        for qx in 0..code_width {
            if code[(qx, qy)] != qrcode::Color::Dark {
                continue;
            }
            for cy in 0..scale {
                for cx in 0..scale {
                    bitmap.set(padding + qx * scale + cx, padding + qy * scale + cy, true);
                }
            }
        }
    }

    Ok(bitmap)
}
