//! Scan result validation error types

use std::borrow::Cow;
use std::fmt;

use crate::UserFacingError;
use thiserror::Error;

/// Category of finding a threshold applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FindingKind {
    Violations,
    Vulnerabilities,
    Licenses,
}

impl FindingKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Violations => "violations",
            Self::Vulnerabilities => "vulnerabilities",
            Self::Licenses => "licenses",
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One category whose count fell below its minimum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdShortfall {
    pub kind: FindingKind,
    pub expected: usize,
    pub actual: usize,
}

impl ThresholdShortfall {
    /// How many findings were missing
    #[must_use]
    pub fn deficit(&self) -> usize {
        self.expected.saturating_sub(self.actual)
    }
}

impl fmt::Display for ThresholdShortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expected at least {expected} {kind} in scan results, but got {actual} {kind} (short by {deficit})",
            expected = self.expected,
            kind = self.kind,
            actual = self.actual,
            deficit = self.deficit(),
        )
    }
}

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("scan output is not a valid list of scan responses: {message}")]
    DataFormat { message: String },

    #[error(
        "scan output contains no results, but at least {min_violations} violations, \
         {min_vulnerabilities} vulnerabilities and {min_licenses} licenses were required"
    )]
    NoResults {
        min_violations: usize,
        min_vulnerabilities: usize,
        min_licenses: usize,
    },

    #[error("{}", join_shortfalls(.shortfalls))]
    BelowThreshold { shortfalls: Vec<ThresholdShortfall> },
}

impl ValidationError {
    /// The shortfall for a given category, if that category failed
    #[must_use]
    pub fn shortfall(&self, kind: FindingKind) -> Option<&ThresholdShortfall> {
        match self {
            Self::BelowThreshold { shortfalls } => shortfalls.iter().find(|s| s.kind == kind),
            _ => None,
        }
    }
}

fn join_shortfalls(shortfalls: &[ThresholdShortfall]) -> String {
    shortfalls
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl UserFacingError for ValidationError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::DataFormat { .. } => Some("Make sure the command was run with --format=json."),
            Self::NoResults { .. } => Some("Check that the scanned target contains components."),
            Self::BelowThreshold { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::DataFormat { .. } => "validation.data_format",
            Self::NoResults { .. } => "validation.no_results",
            Self::BelowThreshold { .. } => "validation.below_threshold",
        };
        Some(code)
    }
}
