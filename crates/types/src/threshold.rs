//! Minimum finding counts a scan must reach

use std::fmt;

/// Floor for each finding category of a scan response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Threshold {
    pub min_violations: usize,
    pub min_vulnerabilities: usize,
    pub min_licenses: usize,
}

impl Threshold {
    #[must_use]
    pub const fn new(min_violations: usize, min_vulnerabilities: usize, min_licenses: usize) -> Self {
        Self {
            min_violations,
            min_vulnerabilities,
            min_licenses,
        }
    }

    /// True when every floor is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.min_violations == 0 && self.min_vulnerabilities == 0 && self.min_licenses == 0
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "violations >= {}, vulnerabilities >= {}, licenses >= {}",
            self.min_violations, self.min_vulnerabilities, self.min_licenses
        )
    }
}
