//! Scan requests and responses exchanged with the scan service

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Severity reported by the scan service
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Default)]
pub enum Severity {
    #[default]
    Unknown,
    Low,
    Medium,
    High,
    Critical,
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.to_ascii_lowercase().as_str() {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            "critical" => Self::Critical,
            _ => Self::Unknown,
        })
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unknown => "Unknown",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        };
        f.write_str(label)
    }
}

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// How a finding reaches a specific component
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentImpact {
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub fixed_versions: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub impact_paths: Vec<Vec<String>>,
}

/// CVE reference attached to a vulnerability
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cve {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cvss_v2_score: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cvss_v3_score: Option<String>,
}

/// A policy breach raised by a watch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    #[serde(default)]
    pub issue_id: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default, rename = "type")]
    pub violation_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watch_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub components: BTreeMap<String, ComponentImpact>,
}

/// A known security weakness in a scanned component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vulnerability {
    #[serde(default)]
    pub issue_id: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cves: Vec<Cve>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub components: BTreeMap<String, ComponentImpact>,
}

/// A license detected on scanned components
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct License {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub custom: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub references: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub components: BTreeMap<String, ComponentImpact>,
}

/// Result of scanning one target or module
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanResponse {
    #[serde(default)]
    pub scan_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub violations: Vec<Violation>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vulnerabilities: Vec<Vulnerability>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub licenses: Vec<License>,
}

impl ScanResponse {
    #[must_use]
    pub fn summary(&self) -> ScanSummary {
        ScanSummary {
            violations: self.violations.len(),
            vulnerabilities: self.vulnerabilities.len(),
            licenses: self.licenses.len(),
        }
    }
}

/// Finding counts of a single scan response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub violations: usize,
    pub vulnerabilities: usize,
    pub licenses: usize,
}

impl fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} violations, {} vulnerabilities, {} licenses",
            self.violations, self.vulnerabilities, self.licenses
        )
    }
}

/// Package type of a scan target, as understood by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    Generic,
    Npm,
    Gradle,
    Maven,
}

impl PackageType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Npm => "npm",
            Self::Gradle => "gradle",
            Self::Maven => "maven",
        }
    }
}

/// Build ecosystems whose projects can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ecosystem {
    Npm,
    Gradle,
    Maven,
}

impl Ecosystem {
    /// Manifest file names that mark a module of this ecosystem
    #[must_use]
    pub fn manifest_names(self) -> &'static [&'static str] {
        match self {
            Self::Npm => &["package.json"],
            Self::Gradle => &["build.gradle", "build.gradle.kts"],
            Self::Maven => &["pom.xml"],
        }
    }

    /// Whether nested modules are searched for below the project root
    #[must_use]
    pub fn is_multi_module(self) -> bool {
        !matches!(self, Self::Npm)
    }

    #[must_use]
    pub fn package_type(self) -> PackageType {
        match self {
            Self::Npm => PackageType::Npm,
            Self::Gradle => PackageType::Gradle,
            Self::Maven => PackageType::Maven,
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.package_type().as_str())
    }
}

/// Project manifest forwarded verbatim for server-side resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub file_name: String,
    pub content: String,
}

/// Body of a graph scan request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphScanRequest {
    pub component_id: String,
    pub package_type: PackageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<Manifest>,
    pub include_licenses: bool,
}

impl GraphScanRequest {
    /// Request for a single binary identified by checksum
    #[must_use]
    pub fn binary(file_name: &str, sha256: String, include_licenses: bool) -> Self {
        Self {
            component_id: format!("generic://sha256:{sha256}/{file_name}"),
            package_type: PackageType::Generic,
            sha256: Some(sha256),
            manifest: None,
            include_licenses,
        }
    }

    /// Request for one project module described by its manifest
    #[must_use]
    pub fn module(
        ecosystem: Ecosystem,
        module: &str,
        manifest: Manifest,
        include_licenses: bool,
    ) -> Self {
        let package_type = ecosystem.package_type();
        Self {
            component_id: format!("{}://{module}", package_type.as_str()),
            package_type,
            sha256: None,
            manifest: Some(manifest),
            include_licenses,
        }
    }
}
