//! Running a command while capturing everything it prints

use crate::pipe::pipe;
use crate::router::OutputRouter;
use std::future::Future;
use std::sync::Arc;
use tokio::task::{AbortHandle, JoinError};
use tracing::{debug, warn};
use xscan_errors::{CaptureError, Error};

/// Options for a single capture
#[derive(Debug, Clone, Copy)]
pub struct CaptureOptions {
    /// Replay the captured bytes to the restored sink afterwards
    pub echo: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self { echo: true }
    }
}

/// Bytes printed by a captured command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput(Vec<u8>);

impl CapturedOutput {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.0).into_owned()
    }
}

/// Output and outcome of a captured command
///
/// The output is always present, even when the command failed part way.
#[derive(Debug)]
pub struct Captured<T> {
    pub output: CapturedOutput,
    pub result: Result<T, Error>,
}

impl<T> Captured<T> {
    /// Split into the output and the command's result
    pub fn into_parts(self) -> (CapturedOutput, Result<T, Error>) {
        (self.output, self.result)
    }
}

struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Run `invoke` with the router's output captured
///
/// See [`run_capturing_with`].
pub async fn run_capturing<F, T>(router: &Arc<OutputRouter>, invoke: F) -> Captured<T>
where
    F: Future<Output = Result<T, Error>> + Send + 'static,
    T: Send + 'static,
{
    run_capturing_with(router, CaptureOptions::default(), invoke).await
}

/// Run `invoke` with the router's output captured
///
/// Captures on one router are serialized. While `invoke` runs, everything
/// written through the router lands in an in-memory pipe that is drained
/// concurrently, so output of any size is collected without loss. The
/// previous sink is restored before this returns, including when `invoke`
/// fails, panics or this future is dropped.
pub async fn run_capturing_with<F, T>(
    router: &Arc<OutputRouter>,
    options: CaptureOptions,
    invoke: F,
) -> Captured<T>
where
    F: Future<Output = Result<T, Error>> + Send + 'static,
    T: Send + 'static,
{
    let _slot = router.lock_capture().await;

    let (writer, reader) = pipe();
    let redirect = router.redirect(writer.clone());
    let eof = writer.close_on_drop();

    let task = tokio::spawn(async move {
        let _eof = eof;
        invoke.await
    });
    let _abort = AbortOnDrop(task.abort_handle());

    let bytes = reader.read_to_end().await;
    let result = task.await.unwrap_or_else(|e| Err(join_error(e).into()));

    drop(redirect);
    debug!(bytes = bytes.len(), ok = result.is_ok(), "capture finished");

    if options.echo && !bytes.is_empty() {
        let restored = router.current();
        if let Err(e) = restored.write_all(&bytes).and_then(|()| restored.flush()) {
            warn!(error = %e, "failed to echo captured output");
        }
    }

    Captured {
        output: CapturedOutput(bytes),
        result,
    }
}

fn join_error(err: JoinError) -> CaptureError {
    if err.is_cancelled() {
        return CaptureError::TaskCancelled;
    }
    let payload = err.into_panic();
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    CaptureError::TaskPanicked { message }
}
