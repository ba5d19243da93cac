//! Output capture error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum CaptureError {
    #[error("captured command panicked: {message}")]
    TaskPanicked { message: String },

    #[error("captured command was cancelled")]
    TaskCancelled,
}

impl UserFacingError for CaptureError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::TaskPanicked { .. } => Some("Re-run with --debug to collect logs and report the issue."),
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::TaskPanicked { .. } => "capture.task_panicked",
            Self::TaskCancelled => "capture.task_cancelled",
        };
        Some(code)
    }
}
