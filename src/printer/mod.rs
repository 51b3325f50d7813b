//! # Printer Module
//!
//! Printer configuration and the job sequencer built on top of it.
//!
//! ## Modules
//!
//! - [`config`]: Printer hardware and link settings
//! - [`thermal`]: Print jobs (QR codes, text lines, feeds)

pub mod config;
pub mod thermal;

pub use config::PrinterConfig;
pub use thermal::ThermalPrinter;
