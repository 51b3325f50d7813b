//! # Printer Configuration
//!
//! Every printer-specific constant lives in one immutable [`PrinterConfig`]
//! built once at startup and handed to the transport and the job sequencer.
//! Swapping printer models (or shrinking the pacing delay in tests) means
//! building a different value, not editing literals.
//!
//! ## Supported Printers
//!
//! | Model | Width (dots) | Link | Chunk | Pause |
//! |-------|--------------|------|-------|-------|
//! | Adafruit Mini Thermal (Ada 597) | 384 | 19200 8N1 | 400 B | 100 ms |
//!
//! ## Usage
//!
//! ```
//! use boothprint::printer::PrinterConfig;
//!
//! let config = PrinterConfig::ada_597();
//! assert_eq!(config.link.baud_rate, 19200);
//! assert_eq!(config.chunk_size, 400);
//! ```
//!
//! Configs can also be loaded from JSON. Missing fields fall back to the
//! Ada 597 defaults:
//!
//! ```
//! use boothprint::printer::PrinterConfig;
//!
//! let config = PrinterConfig::from_json(r#"{ "device": "/dev/ttyAMA0" }"#).unwrap();
//! assert_eq!(config.device.to_str(), Some("/dev/ttyAMA0"));
//! assert_eq!(config.width_dots, 384);
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BoothprintError, Result};

/// Default serial device path
pub const DEFAULT_DEVICE: &str = "/dev/ttyUSB0";

/// Default text printed above every QR code
pub const DEFAULT_GREETING: &str = "Here's your photo!";

/// Parity bit setting of the serial link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Serial frame parameters, fixed at open time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialLinkConfig {
    /// Bits per second
    pub baud_rate: u32,
    /// Data bits per character (5-8)
    pub data_bits: u8,
    /// Parity bit
    pub parity: Parity,
    /// Stop bits (1 or 2)
    pub stop_bits: u8,
}

impl Default for SerialLinkConfig {
    /// 19200 baud, 8N1
    fn default() -> Self {
        Self {
            baud_rate: 19200,
            data_bits: 8,
            parity: Parity::None,
            stop_bits: 1,
        }
    }
}

/// Heating parameters for `ESC 7`.
///
/// The defaults slow the printer down a little and raise dot density so QR
/// codes come out dark enough to scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Density {
    /// Max heating dots, units of 8 dots
    pub max_dots: u8,
    /// Heating time, units of 10µs
    pub heat_time: u8,
    /// Heating interval, units of 10µs
    pub heat_interval: u8,
}

impl Default for Density {
    fn default() -> Self {
        Self {
            max_dots: 11,
            heat_time: 0x7F,
            heat_interval: 50,
        }
    }
}

/// # Printer Configuration
///
/// ## Pacing
///
/// The printer has a small receive buffer and no flow control. Writes larger
/// than `chunk_size` are split, with `chunk_delay_ms` between chunks, or the
/// printer locks up or prints garbage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterConfig {
    /// Printer model name
    pub name: String,

    /// Serial device path
    pub device: PathBuf,

    /// Serial frame parameters
    pub link: SerialLinkConfig,

    /// Maximum print width in dots
    pub width_dots: u16,

    /// Heating parameters sent at startup
    pub density: Density,

    /// Maximum bytes per physical write
    pub chunk_size: usize,

    /// Pause between chunks (milliseconds)
    pub chunk_delay_ms: u64,

    /// Give up on a write after this long. `None` blocks forever.
    pub write_timeout_ms: Option<u64>,

    /// Line printed above each QR code
    pub greeting: String,

    /// Lines fed after a QR code label
    pub label_feed_lines: u8,
}

impl PrinterConfig {
    /// # Adafruit Mini Thermal Printer (Ada 597)
    ///
    /// 58mm paper, 384 dots across, TTL serial at 19200 baud.
    pub fn ada_597() -> Self {
        Self {
            name: "Adafruit Mini Thermal (Ada 597)".to_string(),
            device: PathBuf::from(DEFAULT_DEVICE),
            link: SerialLinkConfig::default(),
            width_dots: 384,
            density: Density::default(),
            chunk_size: 400,
            chunk_delay_ms: 100,
            write_timeout_ms: None,
            greeting: DEFAULT_GREETING.to_string(),
            label_feed_lines: 3,
        }
    }

    /// Pause between chunks
    #[inline]
    pub fn chunk_delay(&self) -> Duration {
        Duration::from_millis(self.chunk_delay_ms)
    }

    /// Write timeout, if any
    #[inline]
    pub fn write_timeout(&self) -> Option<Duration> {
        self.write_timeout_ms.map(Duration::from_millis)
    }

    /// Same config pointed at another device.
    pub fn with_device<P: Into<PathBuf>>(mut self, device: P) -> Self {
        self.device = device.into();
        self
    }

    /// Parse a JSON config and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| BoothprintError::Config(format!("Invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            BoothprintError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| BoothprintError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Reject values the transport or the printer cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(BoothprintError::Config(
                "chunk_size must be at least 1".to_string(),
            ));
        }
        if !(5..=8).contains(&self.link.data_bits) {
            return Err(BoothprintError::Config(format!(
                "data_bits must be 5-8, got {}",
                self.link.data_bits
            )));
        }
        if !(1..=2).contains(&self.link.stop_bits) {
            return Err(BoothprintError::Config(format!(
                "stop_bits must be 1 or 2, got {}",
                self.link.stop_bits
            )));
        }
        if self.width_dots == 0 {
            return Err(BoothprintError::Config(
                "width_dots must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self::ada_597()
    }
}

// ============================================================================
// TESTS
// ============================================================================
