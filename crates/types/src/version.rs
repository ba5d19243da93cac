//! Scan service versions
//!
//! Service versions are compared on their numeric `major.minor.patch` core.
//! Missing minor or patch components count as zero, so `3.29` equals
//! `3.29.0`. Pre-release and build suffixes are kept for display but do not
//! take part in ordering.

use semver::Version;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use xscan_errors::VersionError;

/// Minimum service version that supports graph scans
pub const GRAPH_SCAN_MIN_VERSION: &str = "3.29.0";

/// Payload of the service's version endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    #[serde(default)]
    pub revision: Option<String>,
}

/// A version reported by (or required of) the scan service
#[derive(Debug, Clone)]
pub struct ServiceVersion {
    raw: String,
    core: Version,
}

impl ServiceVersion {
    /// Parse a service version string
    ///
    /// # Errors
    ///
    /// Returns `VersionError::InvalidVersion` when the string does not start
    /// with one to three dot-separated numeric components.
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        input.parse()
    }

    /// Numeric core used for comparisons
    #[must_use]
    pub fn core(&self) -> &Version {
        &self.core
    }

    /// The string as originally reported
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether this version is greater than or equal to `min`
    #[must_use]
    pub fn at_least(&self, min: &ServiceVersion) -> bool {
        self.core >= min.core
    }
}

impl FromStr for ServiceVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || VersionError::InvalidVersion {
            input: s.to_string(),
        };

        let without_prefix = trimmed.strip_prefix('v').unwrap_or(trimmed);
        let numeric = without_prefix
            .split(['-', '+'])
            .next()
            .filter(|core| !core.is_empty())
            .ok_or_else(invalid)?;

        let mut parts = [0u64; 3];
        let mut count = 0;
        for component in numeric.split('.') {
            if count == parts.len()
                || component.is_empty()
                || !component.bytes().all(|b| b.is_ascii_digit())
            {
                return Err(invalid());
            }
            parts[count] = component.parse().map_err(|_| invalid())?;
            count += 1;
        }

        Ok(Self {
            raw: trimmed.to_string(),
            core: Version::new(parts[0], parts[1], parts[2]),
        })
    }
}

impl PartialEq for ServiceVersion {
    fn eq(&self, other: &Self) -> bool {
        self.core == other.core
    }
}

impl Eq for ServiceVersion {}

impl PartialOrd for ServiceVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ServiceVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.core.cmp(&other.core)
    }
}

impl fmt::Display for ServiceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn v(s: &str) -> ServiceVersion {
        ServiceVersion::parse(s).unwrap()
    }

    #[test]
    fn test_three_component_ordering() {
        assert!(v("3.29.0").at_least(&v("3.29.0")));
        assert!(v("3.30.1").at_least(&v("3.29.0")));
        assert!(v("4.0.0").at_least(&v("3.29.0")));
        assert!(!v("3.28.9").at_least(&v("3.29.0")));
        assert!(!v("2.0.0").at_least(&v("3.0.0")));
    }

    #[test]
    fn test_numeric_not_lexical() {
        assert!(v("3.100.0").at_least(&v("3.29.0")));
        assert!(!v("3.9.0").at_least(&v("3.29.0")));
    }

    #[test]
    fn test_short_versions_are_zero_padded() {
        assert_eq!(v("3.29"), v("3.29.0"));
        assert_eq!(v("3"), v("3.0.0"));
        assert_eq!(v("v3.29.1").core(), &Version::new(3, 29, 1));
    }

    #[test]
    fn test_suffixes_ignored_for_ordering() {
        assert_eq!(v("3.29.0-rc.1"), v("3.29.0"));
        assert_eq!(v("3.29.0+build.7"), v("3.29.0"));
        assert_eq!(v("3.29.0-rc.1").to_string(), "3.29.0-rc.1");
    }

    #[test]
    fn test_unparsable_versions_rejected() {
        for input in ["", "latest", "3..1", "3.x.0", "1.2.3.4", "-rc", "v"] {
            assert!(
                matches!(
                    ServiceVersion::parse(input),
                    Err(VersionError::InvalidVersion { .. })
                ),
                "{input:?} should be rejected"
            );
        }
    }

    proptest! {
        #[test]
        fn prop_at_least_matches_tuple_order(
            a in (0u64..50, 0u64..50, 0u64..50),
            b in (0u64..50, 0u64..50, 0u64..50),
        ) {
            let actual = v(&format!("{}.{}.{}", a.0, a.1, a.2));
            let required = v(&format!("{}.{}.{}", b.0, b.1, b.2));
            prop_assert_eq!(actual.at_least(&required), a >= b);
        }
    }
}
