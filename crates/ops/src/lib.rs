#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! High-level operations for xscan
//!
//! This crate serves as the orchestration layer between the CLI and the
//! network client: it turns files and projects on disk into graph scan
//! requests and collects the service's answers.

mod audit;
mod context;
mod scan;
mod system;
mod types;

pub use audit::{audit_gradle, audit_mvn, audit_npm, audit_project, find_manifests};
pub use context::{OpsContextBuilder, OpsCtx};
pub use scan::{collect_targets, scan_binaries};
pub use system::server_version;
pub use types::{ScanOptions, ServerInfo};

use serde::Serialize;
use xscan_errors::{Error, OpsError};
use xscan_types::ScanResponse;

/// Result of a CLI-facing operation
///
/// Serialized untagged so scan results print as a bare JSON array.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum OperationResult {
    /// One response per scanned target or module
    ScanResults(Vec<ScanResponse>),
    /// Scan service identity
    ServerInfo(ServerInfo),
}

impl OperationResult {
    /// Convert to JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the result cannot be serialized.
    pub fn to_json(&self) -> Result<String, Error> {
        match self {
            OperationResult::ScanResults(results) => results_to_json(results),
            OperationResult::ServerInfo(info) => {
                serde_json::to_string_pretty(info).map_err(|e| {
                    OpsError::SerializationError {
                        message: e.to_string(),
                    }
                    .into()
                })
            }
        }
    }
}

/// Render scan results as the JSON document printed by scan commands
///
/// # Errors
///
/// Returns an error if the results cannot be serialized.
pub fn results_to_json(results: &[ScanResponse]) -> Result<String, Error> {
    serde_json::to_string_pretty(results).map_err(|e| {
        OpsError::SerializationError {
            message: e.to_string(),
        }
        .into()
    })
}
