//! # Printer Transport Layer
//!
//! This module moves command buffers onto the wire.
//!
//! ## Pieces
//!
//! - [`chunked`]: paced, mutually exclusive delivery of whole buffers
//! - [`serial`]: raw tty serial link (Linux/Unix)
//! - [`memory`]: in-memory link that records every physical write
//!
//! The printer link is write-only. Nothing is ever read back, so a buffer
//! that was written is assumed to have been printed.

use std::io::{self, Write};

pub mod chunked;
pub mod memory;
pub mod serial;

pub use chunked::{ChunkedTransport, PrinterConnection};
pub use memory::MemoryLink;
pub use serial::SerialPort;

/// A byte sink a printer is attached to.
///
/// `close` is called exactly once, when the owning connection is closed.
pub trait PrinterLink: Write + Send {
    /// Release the link. The default flushes pending output.
    fn close(&mut self) -> io::Result<()> {
        self.flush()
    }
}
