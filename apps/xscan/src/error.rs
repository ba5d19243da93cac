//! CLI error handling

use std::fmt;

use xscan_errors::UserFacingError;
use xscan_harness::StageError;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Configuration error
    Config(xscan_errors::ConfigError),
    /// Operations error
    Ops(xscan_errors::Error),
    /// A verification stage failed
    Stage(StageError),
    /// Invalid command arguments
    InvalidArguments(String),
    /// Command line could not be parsed; holds clap's rendered message
    Usage(String),
    /// I/O error
    Io(std::io::Error),
}

impl CliError {
    /// Process exit code for this error
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => 2,
            _ => 1,
        }
    }
}

fn write_user_facing(
    f: &mut fmt::Formatter<'_>,
    code: Option<&str>,
    hint: Option<&str>,
    retryable: bool,
) -> fmt::Result {
    if let Some(code) = code {
        write!(f, "\n  Code: {code}")?;
    }
    if let Some(hint) = hint {
        write!(f, "\n  Hint: {hint}")?;
    }
    if retryable {
        write!(f, "\n  Retry: safe to retry this operation.")?;
    }
    Ok(())
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => {
                write!(f, "Configuration error: {e}")?;
                write_user_facing(f, e.user_code(), e.user_hint(), false)
            }
            CliError::Ops(e) => {
                let message = e.user_message();
                write!(f, "{message}")?;
                write_user_facing(f, e.user_code(), e.user_hint(), e.is_retryable())
            }
            CliError::Stage(e) => {
                write!(f, "{e}")?;
                write_user_facing(f, e.user_code(), e.user_hint(), e.source.is_retryable())
            }
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Usage(msg) => write!(f, "{}", msg.trim_end()),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Ops(e) => Some(e),
            CliError::Stage(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<xscan_errors::ConfigError> for CliError {
    fn from(e: xscan_errors::ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<xscan_errors::Error> for CliError {
    fn from(e: xscan_errors::Error) -> Self {
        CliError::Ops(e)
    }
}

impl From<StageError> for CliError {
    fn from(e: StageError) -> Self {
        CliError::Stage(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
