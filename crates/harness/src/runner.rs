//! In-process command execution

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use xscan_capture::{run_capturing_with, CaptureOptions, Captured, OutputRouter};
use xscan_errors::Error;

/// Something that runs a full CLI invocation in-process
///
/// `args` includes the program name in position zero.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, args: Vec<String>) -> Result<(), Error>;
}

/// Runs CLI sub-commands with connection flags appended
pub struct CliRunner {
    executor: Arc<dyn CommandExecutor>,
    program: String,
    credential_args: Vec<String>,
    router: Arc<OutputRouter>,
    capture: CaptureOptions,
}

impl CliRunner {
    /// Runner writing through the process-wide output router
    #[must_use]
    pub fn new(
        executor: Arc<dyn CommandExecutor>,
        program: impl Into<String>,
        credential_args: Vec<String>,
    ) -> Self {
        Self {
            executor,
            program: program.into(),
            credential_args,
            router: OutputRouter::global(),
            capture: CaptureOptions::default(),
        }
    }

    /// Capture through `router` instead of the process-wide one
    #[must_use]
    pub fn with_router(mut self, router: Arc<OutputRouter>) -> Self {
        self.router = router;
        self
    }

    #[must_use]
    pub fn with_capture_options(mut self, options: CaptureOptions) -> Self {
        self.capture = options;
        self
    }

    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Full argument vector for one invocation
    #[must_use]
    pub fn command_line<S: AsRef<str>>(&self, args: &[S]) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(args.iter().map(|a| a.as_ref().to_string()))
            .chain(self.credential_args.iter().cloned())
            .collect()
    }

    /// Run a sub-command without capturing its output
    ///
    /// # Errors
    ///
    /// Returns whatever error the sub-command fails with.
    pub async fn exec<S: AsRef<str>>(&self, args: &[S]) -> Result<(), Error> {
        let argv = self.command_line(args);
        debug!(command = ?redacted(&argv), "executing");
        self.executor.execute(argv).await
    }

    /// Run a sub-command and collect everything it prints
    pub async fn run_with_output<S: AsRef<str>>(&self, args: &[S]) -> Captured<()> {
        let argv = self.command_line(args);
        debug!(command = ?redacted(&argv), "executing with capture");
        let executor = Arc::clone(&self.executor);
        run_capturing_with(&self.router, self.capture, async move {
            executor.execute(argv).await
        })
        .await
    }
}

// Command line for logs, secrets masked
fn redacted(argv: &[String]) -> Vec<String> {
    argv.iter()
        .map(|arg| match arg.split_once('=') {
            Some((flag, _)) if flag == "--access-token" || flag == "--password" => {
                format!("{flag}=***")
            }
            _ => arg.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacted_masks_secrets() {
        let argv = vec![
            "xscan".to_string(),
            "--user=admin".to_string(),
            "--password=hunter2".to_string(),
            "--access-token=abc".to_string(),
        ];
        assert_eq!(
            redacted(&argv),
            vec!["xscan", "--user=admin", "--password=***", "--access-token=***"]
        );
    }
}
