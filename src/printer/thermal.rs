//! # Print Job Sequencer
//!
//! [`ThermalPrinter`] composes command buffers and image bands into complete
//! jobs and hands them to the [`ChunkedTransport`] one step at a time.
//!
//! ## QR Job Layout
//!
//! ```text
//! Here's your photo!        ← greeting text line
//!                           ← feed(1)
//! ▓▓▓▓▓▓▓▓▓▓▓▓▓▓            ← QR code, one 24-row band per send
//! ▓▓▓▓▓▓▓▓▓▓▓▓▓▓
//! https://example.com/p/42  ← optional label
//!                           ← feed(3), only with a label
//! ```
//!
//! ## Absent Printers
//!
//! Demo units often run without a printer attached. When no device is found
//! (or opening it fails) the printer stays [`NotPresent`] and every job
//! succeeds without doing anything.
//!
//! [`NotPresent`]: crate::transport::PrinterConnection::NotPresent

use tracing::{debug, info, warn};

use super::config::PrinterConfig;
use crate::error::{BoothprintError, Result};
use crate::protocol::{commands, graphics};
use crate::qr;
use crate::raster::RasterImage;
use crate::transport::{ChunkedTransport, PrinterLink, SerialPort};

/// # Thermal Printer
///
/// Exclusively owns its connection for its whole lifetime. Safe to share
/// (e.g. in an `Arc`) between threads: each buffer is delivered under the
/// transport lock, but jobs are only atomic per buffer, so callers should
/// still funnel printing through one worker.
///
/// ## Example
///
/// ```
/// use boothprint::printer::{PrinterConfig, ThermalPrinter};
/// use boothprint::transport::MemoryLink;
///
/// let mut config = PrinterConfig::ada_597();
/// config.chunk_delay_ms = 0;
///
/// let link = MemoryLink::new();
/// let printer = ThermalPrinter::with_link(config, link.clone());
///
/// printer.print_line("Hello")?;
/// printer.close()?;
///
/// assert!(link.bytes().ends_with(b"Hello\n"));
///
/// # Ok::<(), boothprint::BoothprintError>(())
/// ```
#[derive(Debug)]
pub struct ThermalPrinter<L = SerialPort> {
    config: PrinterConfig,
    transport: ChunkedTransport<L>,
}

impl ThermalPrinter<SerialPort> {
    /// Find and open the printer at `config.device`.
    ///
    /// Never fails. A missing device leaves the printer absent; a device
    /// that can't be opened or configured is logged and also leaves it
    /// absent for the life of this value (there is no reconnect).
    pub fn open(config: PrinterConfig) -> Self {
        if !config.device.exists() {
            info!(device = %config.device.display(), "no printer attached");
            return Self::disconnected(config);
        }

        match SerialPort::open(&config.device, &config.link) {
            Ok(mut port) => {
                info!(
                    device = %port.path().display(),
                    model = %config.name,
                    "connected to thermal printer"
                );
                port.set_write_timeout(config.write_timeout());
                Self::with_link(config, port)
            }
            Err(e) => {
                warn!(
                    device = %config.device.display(),
                    error = %e,
                    "printer configuration failed, printing disabled"
                );
                Self::disconnected(config)
            }
        }
    }
}

impl<L: PrinterLink> ThermalPrinter<L> {
    /// Wrap an already open link and send the startup configuration
    /// (initialize + heating parameters).
    ///
    /// A failure to send the configuration is logged; the link stays open.
    pub fn with_link(config: PrinterConfig, link: L) -> Self {
        let transport = ChunkedTransport::connected(link, &config);
        let printer = Self { config, transport };

        let density = printer.config.density;
        let block = commands::configure(density.max_dots, density.heat_time, density.heat_interval);
        if let Err(e) = printer.transport.send(&block) {
            warn!(error = %e, "failed to send printer configuration");
        }

        printer
    }

    /// A printer with nothing attached. Every job is a no-op.
    pub fn disconnected(config: PrinterConfig) -> Self {
        let transport = ChunkedTransport::not_present(&config);
        Self { config, transport }
    }

    /// Configuration this printer was built with
    pub fn config(&self) -> &PrinterConfig {
        &self.config
    }

    /// Whether jobs will reach a device.
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Print one line of text.
    pub fn print_line(&self, text: &str) -> Result<()> {
        self.send(&commands::text_line(text.as_bytes()))
    }

    /// Feed `lines` blank lines.
    pub fn print_empty_lines(&self, lines: u8) -> Result<()> {
        self.send(&commands::feed(lines))
    }

    /// Print a raster as bit-image bands, no greeting or caption.
    ///
    /// Each band is encoded and sent before the next one is computed.
    ///
    /// ## Errors
    ///
    /// - [`BoothprintError::InvalidImage`] if the raster is wider than the
    ///   print width (nothing is sent)
    /// - [`BoothprintError::Write`] if a band fails; later bands are skipped
    pub fn print_image<R: RasterImage + ?Sized>(&self, image: &R) -> Result<()> {
        if !self.is_connected() {
            return Ok(());
        }
        self.check_width(image)?;

        debug!(width = image.width(), height = image.height(), "printing image");
        for band in graphics::bands(image) {
            self.send(&band)?;
        }
        Ok(())
    }

    /// Print a ready-made QR raster between a greeting and optional label.
    pub fn print_qr_code<R: RasterImage + ?Sized>(
        &self,
        image: &R,
        label: Option<&str>,
    ) -> Result<()> {
        if !self.is_connected() {
            return Ok(());
        }
        // Checked up front so a too-wide code doesn't leave an orphan greeting
        self.check_width(image)?;

        self.print_line(&self.config.greeting)?;
        self.print_empty_lines(1)?;
        self.print_image(image)?;

        if let Some(label) = label.filter(|l| !l.is_empty()) {
            self.print_line(label)?;
            self.print_empty_lines(self.config.label_feed_lines)?;
        }
        Ok(())
    }

    /// Encode `data` as a QR code about `size` dots square and print it.
    ///
    /// ## Errors
    ///
    /// [`BoothprintError::InvalidImage`] if `size` is wider than the paper,
    /// [`BoothprintError::Encoding`] if the payload can't be encoded. Nothing
    /// is printed in either case and the printer remains usable.
    pub fn print_qr(&self, data: &str, size: usize, label: Option<&str>) -> Result<()> {
        if !self.is_connected() {
            return Ok(());
        }
        if size > self.config.width_dots as usize {
            return Err(BoothprintError::InvalidImage(format!(
                "QR code of {} dots won't fit, printer prints {}",
                size, self.config.width_dots
            )));
        }

        let bitmap = qr::generate(data, size).inspect_err(|e| {
            warn!(error = %e, "QR encoding failed, skipping job");
        })?;
        debug!(width = bitmap.width(), height = bitmap.height(), "QR code generated");

        self.print_qr_code(&bitmap, label)
    }

    /// Release the printer. Later calls, and later jobs, are no-ops.
    pub fn close(&self) -> Result<()> {
        self.transport.close()
    }

    fn check_width<R: RasterImage + ?Sized>(&self, image: &R) -> Result<()> {
        let width = image.width();
        if width > self.config.width_dots as usize {
            return Err(BoothprintError::InvalidImage(format!(
                "image is {} dots wide, printer prints {}",
                width, self.config.width_dots
            )));
        }
        Ok(())
    }

    fn send(&self, buffer: &[u8]) -> Result<()> {
        self.transport.send(buffer).map(|_| ())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Bitmap;
    use crate::transport::MemoryLink;

    const CONFIG_BLOCK: [u8; 7] = [0x1B, 0x40, 0x1B, 0x37, 11, 0x7F, 50];

    fn fast_config() -> PrinterConfig {
        let mut config = PrinterConfig::ada_597();
        config.chunk_delay_ms = 0;
        config
    }

    #[test]
    fn test_with_link_sends_configuration() {
        let link = MemoryLink::new();
        let printer = ThermalPrinter::with_link(fast_config(), link.clone());
        assert!(printer.is_connected());
        assert_eq!(link.bytes(), CONFIG_BLOCK.to_vec());
    }

    #[test]
    fn test_print_line_and_feed() {
        let link = MemoryLink::new();
        let printer = ThermalPrinter::with_link(fast_config(), link.clone());
        link.clear();

        printer.print_line("hi").unwrap();
        printer.print_empty_lines(1).unwrap();
        printer.print_empty_lines(4).unwrap();

        assert_eq!(
            link.writes(),
            vec![vec![b'h', b'i', 0x0A], vec![0x0A], vec![0x1B, 0x64, 4]]
        );
    }

    #[test]
    fn test_print_image_sends_one_buffer_per_band() {
        let link = MemoryLink::new();
        let printer = ThermalPrinter::with_link(fast_config(), link.clone());
        link.clear();

        // 100 wide: each band is 309 bytes, under one chunk
        printer.print_image(&Bitmap::new(100, 50)).unwrap();
        assert_eq!(link.write_count(), 3);
    }

    #[test]
    fn test_too_wide_image_rejected() {
        let link = MemoryLink::new();
        let printer = ThermalPrinter::with_link(fast_config(), link.clone());
        link.clear();

        let err = printer.print_qr_code(&Bitmap::new(385, 10), None).unwrap_err();
        assert!(matches!(err, BoothprintError::InvalidImage(_)));
        assert_eq!(link.write_count(), 0);
    }

    #[test]
    fn test_disconnected_jobs_are_noops() {
        let printer: ThermalPrinter<MemoryLink> = ThermalPrinter::disconnected(fast_config());
        assert!(!printer.is_connected());
        printer.print_line("x").unwrap();
        printer.print_empty_lines(3).unwrap();
        printer.print_qr("data", 200, Some("label")).unwrap();
        // Even an unprintable image is fine when nothing is attached
        printer.print_image(&Bitmap::new(10_000, 1)).unwrap();
        printer.close().unwrap();
        printer.close().unwrap();
    }

    #[test]
    fn test_open_missing_device_is_absent() {
        let config = fast_config().with_device("/dev/boothprint-missing-printer");
        let printer = ThermalPrinter::open(config);
        assert!(!printer.is_connected());
        printer.print_line("nobody home").unwrap();
    }

    #[test]
    fn test_open_unconfigurable_device_is_absent() {
        // Exists but isn't a tty
        let file = tempfile::NamedTempFile::new().unwrap();
        let printer = ThermalPrinter::open(fast_config().with_device(file.path()));
        assert!(!printer.is_connected());
    }

    #[test]
    fn test_encoding_failure_keeps_printer_usable() {
        let link = MemoryLink::new();
        let printer = ThermalPrinter::with_link(fast_config(), link.clone());
        link.clear();

        let err = printer.print_qr(&"x".repeat(5000), 200, None).unwrap_err();
        assert!(matches!(err, BoothprintError::Encoding(_)));
        assert_eq!(link.write_count(), 0);

        printer.print_line("still here").unwrap();
        assert_eq!(link.bytes(), b"still here\n".to_vec());
    }

    #[test]
    fn test_oversized_qr_rejected_before_encoding() {
        let link = MemoryLink::new();
        let printer = ThermalPrinter::with_link(fast_config(), link.clone());
        link.clear();

        for size in [385, 100_000, usize::MAX / 2] {
            let err = printer.print_qr("hello", size, Some("label")).unwrap_err();
            assert!(matches!(err, BoothprintError::InvalidImage(_)));
        }
        assert_eq!(link.write_count(), 0);

        printer.print_qr("hello", 384, None).unwrap();
        assert!(link.write_count() > 0);
    }
}
