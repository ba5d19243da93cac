//! Version gating
//!
//! Operations that need a minimum scan service version are skipped, not
//! failed, when the service is older.

use std::fmt;
use xscan_errors::ConfigError;
use xscan_types::ServiceVersion;

/// Whether a version-dependent operation should run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    Skip { reason: String },
}

impl GateDecision {
    #[must_use]
    pub fn is_proceed(&self) -> bool {
        matches!(self, Self::Proceed)
    }

    #[must_use]
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip { .. })
    }

    /// Skip reason, if any
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Proceed => None,
            Self::Skip { reason } => Some(reason),
        }
    }
}

impl fmt::Display for GateDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Proceed => f.write_str("proceed"),
            Self::Skip { reason } => write!(f, "skip: {reason}"),
        }
    }
}

/// Parse a required minimum version
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` for `min_version` if `required` is
/// not a version.
pub fn parse_min_version(required: &str) -> Result<ServiceVersion, ConfigError> {
    ServiceVersion::parse(required).map_err(|_| ConfigError::InvalidValue {
        field: "min_version".to_string(),
        value: required.to_string(),
    })
}

/// Compare the service version against an optional minimum
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if `required` is not a version. An
/// unparsable minimum is a configuration mistake, never a skip.
pub fn check_min_version(
    actual: &ServiceVersion,
    required: Option<&str>,
) -> Result<GateDecision, ConfigError> {
    let Some(required) = required else {
        return Ok(GateDecision::Proceed);
    };
    let required = parse_min_version(required)?;

    if actual.at_least(&required) {
        Ok(GateDecision::Proceed)
    } else {
        Ok(GateDecision::Skip {
            reason: format!(
                "scan service version {actual} is older than the required minimum {required}"
            ),
        })
    }
}
