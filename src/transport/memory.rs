//! # In-Memory Link
//!
//! A [`PrinterLink`] that keeps every physical write as a separate chunk.
//! Clones share the same recording, so a test can hand one clone to the
//! transport and inspect the other afterwards. The CLI uses it to dump a
//! job's byte stream to a file instead of a device.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::PrinterLink;

#[derive(Debug, Default)]
struct Recording {
    writes: Vec<Vec<u8>>,
    fail_after: Option<usize>,
    closes: usize,
}

/// Shared, cloneable recording link.
#[derive(Debug, Clone, Default)]
pub struct MemoryLink {
    inner: Arc<Mutex<Recording>>,
}

impl MemoryLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A link whose writes start failing after `writes` successful ones.
    pub fn failing_after(writes: usize) -> Self {
        let link = Self::new();
        link.recording().fail_after = Some(writes);
        link
    }

    /// Every physical write, in order.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.recording().writes.clone()
    }

    /// Number of physical writes.
    pub fn write_count(&self) -> usize {
        self.recording().writes.len()
    }

    /// All written bytes, concatenated.
    pub fn bytes(&self) -> Vec<u8> {
        self.recording().writes.concat()
    }

    /// How many times the link was closed.
    pub fn close_count(&self) -> usize {
        self.recording().closes
    }

    /// Forget everything written so far.
    pub fn clear(&self) {
        self.recording().writes.clear();
    }

    fn recording(&self) -> MutexGuard<'_, Recording> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Write for MemoryLink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut recording = self.recording();
        if let Some(limit) = recording.fail_after {
            if recording.writes.len() >= limit {
                return Err(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "printer link went away",
                ));
            }
        }
        recording.writes.push(buf.to_vec());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl PrinterLink for MemoryLink {
    fn close(&mut self) -> io::Result<()> {
        self.recording().closes += 1;
        Ok(())
    }
}
