//! # Chunked, Paced Delivery
//!
//! Small serial thermal printers have a tiny receive buffer and no flow
//! control. Sending a whole image band in one burst overruns it and the
//! printer either locks up or prints garbage. [`ChunkedTransport`] splits
//! every buffer into bounded chunks and pauses between them.
//!
//! ```text
//! send(buffer)                         ┌──────────── lock held ────────────┐
//!   ├── chunk 0 (400 B) ── write ──► pause
//!   ├── chunk 1 (400 B) ── write ──► pause
//!   └── chunk 2 (≤400 B) ─ write ──► flush   (no pause after the last one)
//! ```
//!
//! The connection mutex is held for the whole `send`, pauses included, so
//! two callers can never interleave their chunks in the middle of a band.

use std::io::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::PrinterLink;
use crate::error::{BoothprintError, Result};
use crate::printer::PrinterConfig;

/// Presence and lifecycle of the printer link.
///
/// ```text
/// Connected ──close()──► Closed (terminal)
/// NotPresent            (no printer attached; every operation is a no-op)
/// ```
#[derive(Debug)]
pub enum PrinterConnection<L> {
    /// An open, configured link
    Connected(L),
    /// No printer attached, or opening it failed
    NotPresent,
    /// Released by `close()`
    Closed,
}

impl<L> PrinterConnection<L> {
    /// Whether writes will reach a device.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected(_))
    }

    fn state_name(&self) -> &'static str {
        match self {
            Self::Connected(_) => "connected",
            Self::NotPresent => "not present",
            Self::Closed => "closed",
        }
    }
}

/// # Chunked Printer Transport
///
/// Owns the [`PrinterConnection`] behind a mutex and delivers whole buffers
/// in chunks of at most `chunk_size` bytes, sleeping `chunk_delay` between
/// chunks.
///
/// ## Example
///
/// ```
/// use boothprint::printer::PrinterConfig;
/// use boothprint::transport::{ChunkedTransport, MemoryLink};
///
/// let mut config = PrinterConfig::ada_597();
/// config.chunk_delay_ms = 0;
///
/// let link = MemoryLink::new();
/// let transport = ChunkedTransport::connected(link.clone(), &config);
///
/// transport.send(&[0u8; 1000])?;
/// assert_eq!(link.write_count(), 3); // 400 + 400 + 200
///
/// # Ok::<(), boothprint::BoothprintError>(())
/// ```
#[derive(Debug)]
pub struct ChunkedTransport<L> {
    connection: Mutex<PrinterConnection<L>>,
    chunk_size: usize,
    chunk_delay: Duration,
}

impl<L: PrinterLink> ChunkedTransport<L> {
    /// Wrap a connection using the pacing from `config`.
    pub fn new(connection: PrinterConnection<L>, config: &PrinterConfig) -> Self {
        Self::with_pacing(connection, config.chunk_size, config.chunk_delay())
    }

    /// Wrap an open link.
    pub fn connected(link: L, config: &PrinterConfig) -> Self {
        Self::new(PrinterConnection::Connected(link), config)
    }

    /// A transport with no printer behind it.
    pub fn not_present(config: &PrinterConfig) -> Self {
        Self::new(PrinterConnection::NotPresent, config)
    }

    /// Wrap a connection with explicit pacing.
    ///
    /// A `chunk_size` of zero is treated as one byte per chunk.
    pub fn with_pacing(
        connection: PrinterConnection<L>,
        chunk_size: usize,
        chunk_delay: Duration,
    ) -> Self {
        Self {
            connection: Mutex::new(connection),
            chunk_size: chunk_size.max(1),
            chunk_delay,
        }
    }

    /// Maximum bytes per physical write
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Whether a printer is attached and open.
    pub fn is_connected(&self) -> bool {
        self.lock().is_connected()
    }

    /// Send one buffer, returning the number of bytes written.
    ///
    /// Returns `Ok(0)` without touching anything when no printer is attached
    /// or the connection has been closed.
    ///
    /// ## Errors
    ///
    /// If a chunk write fails, the remaining chunks are dropped and
    /// [`BoothprintError::Write`] reports how far the buffer got. The printer
    /// may be left mid-command; there is no way to roll that back over a
    /// write-only link.
    pub fn send(&self, buffer: &[u8]) -> Result<usize> {
        let mut connection = self.lock();
        let link = match &mut *connection {
            PrinterConnection::Connected(link) => link,
            other => {
                debug!(
                    state = other.state_name(),
                    bytes = buffer.len(),
                    "printer unavailable, dropping buffer"
                );
                return Ok(0);
            }
        };

        write_chunks(link, buffer, self.chunk_size, self.chunk_delay)
    }

    /// Release the link. Only the first call on a connected transport does
    /// anything.
    pub fn close(&self) -> Result<()> {
        let mut connection = self.lock();
        if !connection.is_connected() {
            debug!(state = connection.state_name(), "close ignored");
            return Ok(());
        }

        if let PrinterConnection::Connected(mut link) =
            std::mem::replace(&mut *connection, PrinterConnection::Closed)
        {
            info!("closing printer link");
            if let Err(e) = link.close() {
                warn!(error = %e, "unable to close printer link cleanly");
                return Err(BoothprintError::Io(e));
            }
        }
        Ok(())
    }

    /// Run `f` against the open link, if there is one.
    ///
    /// The connection lock is held for the duration of `f`.
    pub fn with_link<T>(&self, f: impl FnOnce(&mut L) -> T) -> Option<T> {
        match &mut *self.lock() {
            PrinterConnection::Connected(link) => Some(f(link)),
            _ => None,
        }
    }

    fn lock(&self) -> MutexGuard<'_, PrinterConnection<L>> {
        // A panic mid-send leaves the link usable; the printer may just have
        // received half a band.
        self.connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Write `buffer` in chunks, pausing between (not after) them.
fn write_chunks<W: Write + ?Sized>(
    link: &mut W,
    buffer: &[u8],
    chunk_size: usize,
    chunk_delay: Duration,
) -> Result<usize> {
    let total = buffer.len();
    let mut written = 0;
    let mut chunks = buffer.chunks(chunk_size).peekable();

    while let Some(chunk) = chunks.next() {
        if let Err(source) = link.write_all(chunk) {
            warn!(written, total, error = %source, "chunk write failed, aborting buffer");
            return Err(BoothprintError::Write {
                written,
                total,
                source,
            });
        }
        written += chunk.len();

        if chunks.peek().is_some() && !chunk_delay.is_zero() {
            thread::sleep(chunk_delay);
        }
    }

    link.flush().map_err(|source| {
        warn!(written, total, error = %source, "flush failed");
        BoothprintError::Write {
            written,
            total,
            source,
        }
    })?;

    debug!(bytes = total, "buffer sent");
    Ok(written)
}

// ============================================================================
// TESTS
// ============================================================================
