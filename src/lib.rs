//! # Boothprint - Photobooth Thermal Printer Driver
//!
//! Boothprint prints QR codes and short text on small serial thermal
//! printers (Adafruit Mini Thermal / Ada 597 and friends). It provides:
//!
//! - **Protocol implementation**: ESC/POS-style command builders
//! - **Band encoding**: 24-dot bit-image bands from any black/white raster
//! - **Transport**: chunked, paced serial writes that don't overrun the
//!   printer's buffer
//! - **Jobs**: greeting + QR code + caption, with graceful no-op behaviour
//!   when no printer is attached
//!
//! ## Quick Start
//!
//! ```no_run
//! use boothprint::printer::{PrinterConfig, ThermalPrinter};
//!
//! // Opens /dev/ttyUSB0 if it exists, otherwise every job is a no-op
//! let printer = ThermalPrinter::open(PrinterConfig::ada_597());
//!
//! printer.print_qr("https://example.com/p/42", 200, Some("example.com/p/42"))?;
//! printer.close()?;
//!
//! # Ok::<(), boothprint::BoothprintError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`protocol`] | Command builders and band encoder |
//! | [`raster`] | Black/white image sources |
//! | [`qr`] | QR code bitmaps |
//! | [`render`] | Dithering for photos |
//! | [`transport`] | Chunked delivery and serial links |
//! | [`printer`] | Configuration and print jobs |
//! | [`error`] | Error types |

pub mod error;
pub mod printer;
pub mod protocol;
pub mod qr;
pub mod raster;
pub mod render;
pub mod transport;

// Re-exports for convenience
pub use error::BoothprintError;
pub use printer::{PrinterConfig, ThermalPrinter};
pub use raster::{Bitmap, RasterImage};
