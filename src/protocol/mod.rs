//! # Thermal Printer Protocol
//!
//! Byte-exact command builders for the ESC/POS-like command set spoken by
//! small serial thermal printers.
//!
//! ## Module Structure
//!
//! - [`commands`]: Fixed commands (init, density, text line, feed)
//! - [`graphics`]: 24-dot bit-image band encoding
//!
//! ## Usage Example
//!
//! ```
//! use boothprint::protocol::{commands, graphics};
//! use boothprint::raster::Bitmap;
//!
//! let mut data = Vec::new();
//! data.extend(commands::configure(11, 0x7F, 50));
//! data.extend(commands::text_line(b"Here's your photo!"));
//!
//! let image = Bitmap::from_fn(64, 64, |x, y| (x / 8 + y / 8) % 2 == 0);
//! for band in graphics::bands(&image) {
//!     data.extend(band);
//! }
//! data.extend(commands::feed(3));
//!
//! // Send `data` to the printer via the transport...
//! ```

pub mod commands;
pub mod graphics;

/// One logical unit of printer work: a configuration block, a text line, or
/// one image band. Built whole, then handed to the transport.
pub type CommandBuffer = Vec<u8>;
