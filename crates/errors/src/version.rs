//! Version parsing and fetching error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum VersionError {
    #[error("invalid version: {input}")]
    InvalidVersion { input: String },

    #[error("failed to fetch service version: {message}")]
    FetchFailed { message: String },
}

impl UserFacingError for VersionError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::InvalidVersion { .. } => {
                Some("Use semantic-version strings like 3.29.0 for minimum versions.")
            }
            Self::FetchFailed { .. } => {
                Some("Check that the scan service is reachable and reports its version.")
            }
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::FetchFailed { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::InvalidVersion { .. } => "version.invalid_version",
            Self::FetchFailed { .. } => "version.fetch_failed",
        };
        Some(code)
    }
}
