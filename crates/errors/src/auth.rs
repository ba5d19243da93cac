//! Authentication handshake error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("failed while attempting to authenticate with {url}: service unreachable: {cause}")]
    Unreachable { url: String, cause: String },

    #[error("failed while attempting to authenticate with {url}: credentials rejected (HTTP {status})")]
    Rejected { url: String, status: u16 },

    #[error("failed while attempting to authenticate with {url}: {cause}")]
    HandshakeFailed { url: String, cause: String },
}

impl UserFacingError for AuthError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::Unreachable { .. } => Some("Check the service URL and network connectivity."),
            Self::Rejected { .. } => {
                Some("Verify the access token, or the user and password, for the scan service.")
            }
            Self::HandshakeFailed { .. } => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::Unreachable { .. } => "auth.unreachable",
            Self::Rejected { .. } => "auth.rejected",
            Self::HandshakeFailed { .. } => "auth.handshake_failed",
        };
        Some(code)
    }
}
