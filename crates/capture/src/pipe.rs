//! In-memory pipe connecting a redirected sink to its reader
//!
//! The write end never blocks, so a producer can emit any amount of output
//! while the reader drains concurrently. The reader sees end-of-stream once
//! the write end is closed, either explicitly or by dropping its
//! [`CloseOnDrop`] token.

use crate::sink::OutputSink;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Create a connected writer/reader pair
#[must_use]
pub fn pipe() -> (Arc<PipeWriter>, PipeReader) {
    let (tx, rx) = mpsc::unbounded_channel();
    let writer = Arc::new(PipeWriter {
        tx: Mutex::new(Some(tx)),
    });
    (writer, PipeReader { rx })
}

/// Write end of a pipe
#[derive(Debug)]
pub struct PipeWriter {
    tx: Mutex<Option<UnboundedSender<Vec<u8>>>>,
}

impl PipeWriter {
    /// Close the write end; later writes fail with `BrokenPipe`
    pub fn close(&self) {
        self.tx.lock().unwrap_or_else(PoisonError::into_inner).take();
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_none_or(UnboundedSender::is_closed)
    }

    /// Token that closes this writer when dropped
    #[must_use]
    pub fn close_on_drop(self: &Arc<Self>) -> CloseOnDrop {
        CloseOnDrop {
            writer: Arc::clone(self),
        }
    }
}

impl OutputSink for PipeWriter {
    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        if buf.is_empty() {
            return Ok(());
        }
        let guard = self.tx.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(tx) => tx
                .send(buf.to_vec())
                .map_err(|_| io::Error::from(io::ErrorKind::BrokenPipe)),
            None => Err(io::Error::from(io::ErrorKind::BrokenPipe)),
        }
    }
}

/// Closes the owning pipe's write end when dropped
#[derive(Debug)]
pub struct CloseOnDrop {
    writer: Arc<PipeWriter>,
}

impl Drop for CloseOnDrop {
    fn drop(&mut self) {
        self.writer.close();
    }
}

/// Read end of a pipe
#[derive(Debug)]
pub struct PipeReader {
    rx: UnboundedReceiver<Vec<u8>>,
}

impl PipeReader {
    /// Read until the write end is closed
    pub async fn read_to_end(mut self) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(chunk) = self.rx.recv().await {
            out.extend_from_slice(&chunk);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reader_sees_eof_after_close() {
        let (writer, reader) = pipe();
        writer.write_all(b"abc").unwrap();
        writer.write_all(b"").unwrap();
        writer.write_all(b"def").unwrap();
        writer.close();

        assert!(writer.is_closed());
        assert_eq!(reader.read_to_end().await, b"abcdef");
    }

    #[tokio::test]
    async fn test_write_after_close_is_broken_pipe() {
        let (writer, _reader) = pipe();
        drop(writer.close_on_drop());

        let err = writer.write_all(b"late").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[tokio::test]
    async fn test_token_moved_into_task_closes_on_panic() {
        let (writer, reader) = pipe();
        let token = writer.close_on_drop();
        let task_writer = Arc::clone(&writer);

        let handle = tokio::spawn(async move {
            let _token = token;
            task_writer.write_all(b"before").unwrap();
            panic!("boom");
        });

        assert_eq!(reader.read_to_end().await, b"before");
        assert!(handle.await.unwrap_err().is_panic());
    }
}
