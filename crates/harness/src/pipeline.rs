//! Staged verification of a scan command
//!
//! A run authenticates, checks the service version, captures the command's
//! output and validates it. The first fatal error ends the run and is tagged
//! with the stage it came from; a version gate miss ends it as skipped.

use crate::runner::{CliRunner, CommandExecutor};
use crate::session::SessionContext;
use crate::validate::validate_scan;
use crate::gate::{parse_min_version, GateDecision};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use xscan_capture::{CaptureOptions, CapturedOutput, OutputRouter};
use xscan_errors::{Error, UserFacingError};
use xscan_net::NetClient;
use xscan_types::{ScanSummary, ServiceConnection, Threshold};

/// Step of a verification run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Auth,
    VersionCheck,
    Capture,
    Validation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auth => "authentication",
            Self::VersionCheck => "version check",
            Self::Capture => "capture",
            Self::Validation => "validation",
        })
    }
}

/// A fatal error and the stage that raised it
#[derive(Debug, Clone, Error)]
#[error("{stage} stage failed: {source}")]
pub struct StageError {
    pub stage: Stage,
    pub source: Error,
}

impl StageError {
    fn at<E: Into<Error>>(stage: Stage) -> impl FnOnce(E) -> Self {
        move |source| Self {
            stage,
            source: source.into(),
        }
    }

    /// Hint for the underlying error
    #[must_use]
    pub fn user_hint(&self) -> Option<&'static str> {
        self.source.user_hint()
    }

    /// Stable code of the underlying error
    #[must_use]
    pub fn user_code(&self) -> Option<&'static str> {
        self.source.user_code()
    }
}

/// What to run and what to expect from it
#[derive(Debug, Clone, Default)]
pub struct VerifyRequest {
    /// Sub-command and its arguments, without the program name
    pub args: Vec<String>,
    /// Minimum service version, if the command needs one
    pub min_version: Option<String>,
    pub threshold: Threshold,
}

/// Result of a verification run that raised no error
#[derive(Debug)]
pub enum VerifyOutcome {
    Passed {
        summary: ScanSummary,
        output: CapturedOutput,
    },
    Skipped {
        reason: String,
    },
}

/// Runs commands through a [`CommandExecutor`] and verifies their results
pub struct VerifyPipeline {
    executor: Arc<dyn CommandExecutor>,
    program: String,
    router: Arc<OutputRouter>,
    capture: CaptureOptions,
}

impl VerifyPipeline {
    #[must_use]
    pub fn new(executor: Arc<dyn CommandExecutor>, program: impl Into<String>) -> Self {
        Self {
            executor,
            program: program.into(),
            router: OutputRouter::global(),
            capture: CaptureOptions::default(),
        }
    }

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

    /// Verify one command against a fresh session
    ///
    /// # Errors
    ///
    /// Returns a [`StageError`] naming the first stage that failed.
    pub async fn run(
        &self,
        net: NetClient,
        connection: ServiceConnection,
        request: &VerifyRequest,
    ) -> Result<VerifyOutcome, StageError> {
        if let Some(required) = request.min_version.as_deref() {
            parse_min_version(required).map_err(StageError::at(Stage::VersionCheck))?;
        }

        let session = SessionContext::establish(net, connection)
            .await
            .map_err(StageError::at(Stage::Auth))?;

        self.run_in(&session, request).await
    }

    /// Verify one command within an established session
    ///
    /// # Errors
    ///
    /// Returns a [`StageError`] naming the first stage that failed after
    /// authentication.
    pub async fn run_in(
        &self,
        session: &SessionContext,
        request: &VerifyRequest,
    ) -> Result<VerifyOutcome, StageError> {
        let decision = session
            .check_min_version(request.min_version.as_deref())
            .await
            .map_err(StageError::at(Stage::VersionCheck))?;
        if let GateDecision::Skip { reason } = decision {
            info!(%reason, "verification skipped");
            return Ok(VerifyOutcome::Skipped { reason });
        }

        let runner = CliRunner::new(
            Arc::clone(&self.executor),
            self.program.clone(),
            session.connection().credential_args(),
        )
        .with_router(Arc::clone(&self.router))
        .with_capture_options(self.capture);

        let (output, result) = runner
            .run_with_output(request.args.as_slice())
            .await
            .into_parts();
        result.map_err(StageError::at(Stage::Capture))?;
        debug!(bytes = output.len(), "command output captured");

        let summary = validate_scan(output.as_bytes(), &request.threshold)
            .map_err(StageError::at(Stage::Validation))?;
        info!(%summary, threshold = %request.threshold, "verification passed");

        Ok(VerifyOutcome::Passed { summary, output })
    }
}
