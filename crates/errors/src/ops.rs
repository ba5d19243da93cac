//! Scan operation error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum OpsError {
    #[error("invalid scan pattern {pattern}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("no files match pattern: {pattern}")]
    NoScanTargets { pattern: String },

    #[error("no {ecosystem} manifest found under {path}")]
    ManifestNotFound { ecosystem: String, path: String },

    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    #[error("context creation failed: {message}")]
    ContextCreationFailed { message: String },

    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

impl UserFacingError for OpsError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidPattern { .. } | Self::NoScanTargets { .. } => {
                Some("Use a glob such as 'dist/*' that matches at least one file.")
            }
            Self::ManifestNotFound { .. } => {
                Some("Run the audit from the project root or pass --project.")
            }
            Self::InvalidArguments { .. } => Some("See --help for usage."),
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::InvalidPattern { .. } => "ops.invalid_pattern",
            Self::NoScanTargets { .. } => "ops.no_scan_targets",
            Self::ManifestNotFound { .. } => "ops.manifest_not_found",
            Self::InvalidArguments { .. } => "ops.invalid_arguments",
            Self::ContextCreationFailed { .. } => "ops.context_creation_failed",
            Self::SerializationError { .. } => "ops.serialization_error",
        };
        Some(code)
    }
}
