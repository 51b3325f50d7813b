//! # Error Types
//!
//! This module defines error types used throughout the boothprint library.
//!
//! A printer that is simply not attached is not an error: the transport and
//! the job sequencer degrade to no-ops instead. Everything here describes a
//! printer that *is* there but misbehaves, or input that cannot be printed.

use std::io;

use thiserror::Error;

/// Main error type for boothprint operations
#[derive(Debug, Error)]
pub enum BoothprintError {
    /// Opening or configuring the serial link failed
    #[error("Configuration failed: {0}")]
    Configuration(String),

    /// A chunk write failed part way through a buffer.
    ///
    /// The remaining chunks of that buffer were not sent. Earlier buffers
    /// are unaffected.
    #[error("Write failed after {written} of {total} bytes: {source}")]
    Write {
        written: usize,
        total: usize,
        #[source]
        source: io::Error,
    },

    /// QR code generation failed
    #[error("Encoding failed: {0}")]
    Encoding(String),

    /// Raster cannot be printed with the current configuration
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// Invalid configuration file or value
    #[error("Config error: {0}")]
    Config(String),

    /// Image decoding or export error
    #[error("Image error: {0}")]
    Image(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, BoothprintError>;

impl BoothprintError {
    /// Whether this error came from the physical write path.
    pub fn is_write_failure(&self) -> bool {
        matches!(self, Self::Write { .. })
    }
}
