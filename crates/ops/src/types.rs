//! Types for operations and results

use serde::Serialize;

/// Options shared by scan and audit operations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Keep license findings in the results
    pub include_licenses: bool,
}

/// Scan service identity as reported by `server-version`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ServerInfo {
    /// Canonical base URL of the service
    pub url: String,
    /// Version string as reported by the service
    pub version: String,
}
