//! Destinations for command output

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// A destination that command output can be routed to
///
/// Sinks are shared between the router and whoever installed them, so all
/// methods take `&self`.
pub trait OutputSink: Send + Sync {
    /// Write the whole buffer or fail
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying destination rejects the write.
    fn write_all(&self, buf: &[u8]) -> io::Result<()>;

    /// Flush buffered bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying destination cannot be flushed.
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

pub type SharedSink = Arc<dyn OutputSink>;

/// The process's real standard output
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        io::stdout().lock().write_all(buf)
    }

    fn flush(&self) -> io::Result<()> {
        io::stdout().lock().flush()
    }
}

/// Sink that keeps everything written to it in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    buf: Mutex<Vec<u8>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything written so far
    #[must_use]
    pub fn contents(&self) -> Vec<u8> {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Contents decoded as UTF-8, replacing invalid sequences
    #[must_use]
    pub fn contents_lossy(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }

    /// Drain the buffer
    #[must_use]
    pub fn take(&self) -> Vec<u8> {
        std::mem::take(&mut *self.buf.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl OutputSink for MemorySink {
    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(())
    }
}
