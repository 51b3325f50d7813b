//! # Rendering Module
//!
//! Tools for turning continuous-tone images into printable rasters.
//!
//! ## Modules
//!
//! - [`dither`]: Bayer 8x8 ordered dithering for binary conversion
//!
//! ## Usage Example
//!
//! ```
//! use boothprint::render::dither;
//! use boothprint::raster::RasterImage;
//! use image::{DynamicImage, GrayImage, Luma};
//!
//! let photo = DynamicImage::ImageLuma8(GrayImage::from_pixel(768, 512, Luma([90])));
//! let bitmap = dither::prepare_photo(&photo, 384);
//!
//! assert_eq!(bitmap.width(), 384);
//! ```

pub mod dither;
