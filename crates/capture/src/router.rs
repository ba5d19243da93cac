//! Process-wide routing of command output
//!
//! Everything a command prints goes through an [`OutputHandle`], which looks
//! up the router's current sink on every write. Capturing swaps that sink for
//! the write end of a pipe and swaps it back afterwards.

use crate::sink::{SharedSink, StdoutSink};
use std::io;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use tokio::sync::{Mutex, MutexGuard};

static GLOBAL: OnceLock<Arc<OutputRouter>> = OnceLock::new();

/// Owner of the current output destination
pub struct OutputRouter {
    current: RwLock<SharedSink>,
    capture_slot: Mutex<()>,
}

impl OutputRouter {
    /// Router writing to `base` until redirected
    #[must_use]
    pub fn new(base: SharedSink) -> Self {
        Self {
            current: RwLock::new(base),
            capture_slot: Mutex::new(()),
        }
    }

    /// The router backing the process's standard output
    #[must_use]
    pub fn global() -> Arc<OutputRouter> {
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Self::new(Arc::new(StdoutSink)))))
    }

    /// Sink that output is currently routed to
    #[must_use]
    pub fn current(&self) -> SharedSink {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Route output to `sink` until the returned guard is dropped
    #[must_use = "output is restored as soon as the guard is dropped"]
    pub fn redirect(self: &Arc<Self>, sink: SharedSink) -> RedirectGuard {
        let previous = std::mem::replace(
            &mut *self.current.write().unwrap_or_else(PoisonError::into_inner),
            sink,
        );
        RedirectGuard {
            router: Arc::clone(self),
            previous: Some(previous),
        }
    }

    /// Writer that follows this router's current sink
    #[must_use]
    pub fn handle(self: &Arc<Self>) -> OutputHandle {
        OutputHandle {
            router: Arc::clone(self),
        }
    }

    /// Wait for exclusive use of the capture machinery
    pub(crate) async fn lock_capture(&self) -> MutexGuard<'_, ()> {
        self.capture_slot.lock().await
    }
}

impl std::fmt::Debug for OutputRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputRouter").finish_non_exhaustive()
    }
}

/// Restores the previous sink when dropped
pub struct RedirectGuard {
    router: Arc<OutputRouter>,
    previous: Option<SharedSink>,
}

impl Drop for RedirectGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            *self
                .router
                .current
                .write()
                .unwrap_or_else(PoisonError::into_inner) = previous;
        }
    }
}

/// `io::Write` adapter over a router
#[derive(Debug, Clone)]
pub struct OutputHandle {
    router: Arc<OutputRouter>,
}

impl io::Write for OutputHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.router.current().write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.router.current().flush()
    }
}

/// Writer bound to the process-wide router
#[must_use]
pub fn stdout() -> OutputHandle {
    OutputRouter::global().handle()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{MemorySink, OutputSink};
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FlushCounter {
        flushes: AtomicUsize,
    }

    impl OutputSink for FlushCounter {
        fn write_all(&self, _buf: &[u8]) -> io::Result<()> {
            Ok(())
        }

        fn flush(&self) -> io::Result<()> {
            if self.flushes.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(())
            } else {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
        }
    }

    #[test]
    fn test_flush_reaches_current_sink() {
        let base = Arc::new(FlushCounter::default());
        let router = Arc::new(OutputRouter::new(base.clone()));
        let mut out = router.handle();

        out.flush().unwrap();
        let err = out.flush().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(base.flushes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_redirect_and_restore() {
        let base = Arc::new(MemorySink::new());
        let router = Arc::new(OutputRouter::new(base.clone()));
        let mut out = router.handle();

        write!(out, "one ").unwrap();
        {
            let diverted = Arc::new(MemorySink::new());
            let _guard = router.redirect(diverted.clone());
            write!(out, "two").unwrap();
            assert_eq!(diverted.contents_lossy(), "two");
        }
        write!(out, "three").unwrap();

        assert_eq!(base.contents_lossy(), "one three");
        let base_sink: SharedSink = base;
        assert!(Arc::ptr_eq(&router.current(), &base_sink));
    }

    #[test]
    fn test_nested_redirects_unwind_in_order() {
        let base = Arc::new(MemorySink::new());
        let router = Arc::new(OutputRouter::new(base.clone()));
        let first: SharedSink = Arc::new(MemorySink::new());
        let second: SharedSink = Arc::new(MemorySink::new());

        let outer = router.redirect(Arc::clone(&first));
        let inner = router.redirect(Arc::clone(&second));
        assert!(Arc::ptr_eq(&router.current(), &second));
        drop(inner);
        assert!(Arc::ptr_eq(&router.current(), &first));
        drop(outer);

        let base_sink: SharedSink = base;
        assert!(Arc::ptr_eq(&router.current(), &base_sink));
    }

    #[test]
    fn test_global_router_is_shared() {
        assert!(Arc::ptr_eq(&OutputRouter::global(), &OutputRouter::global()));
    }
}
