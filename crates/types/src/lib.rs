#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for xscan
//!
//! This crate provides the data model shared by the scan client, the
//! operations layer and the verification harness: service versions,
//! connection details, scan requests and responses, and thresholds.

pub mod connection;
pub mod scan;
pub mod threshold;
pub mod version;

// Re-export commonly used types
pub use connection::{add_trailing_slash, Credential, ServiceConnection};
pub use scan::{
    ComponentImpact, Cve, Ecosystem, GraphScanRequest, License, Manifest, PackageType,
    ScanResponse, ScanSummary, Severity, Violation, Vulnerability,
};
pub use semver::Version;
pub use threshold::Threshold;
pub use version::{ServiceVersion, VersionInfo, GRAPH_SCAN_MIN_VERSION};

use serde::{Deserialize, Serialize};

/// Output format for scan commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Json,
}

impl clap::ValueEnum for OutputFormat {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Table, Self::Json]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Table => clap::builder::PossibleValue::new("table"),
            Self::Json => clap::builder::PossibleValue::new("json"),
        })
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Table
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    Always,
    Auto,
    Never,
}

// Implement clap::ValueEnum for ColorChoice
impl clap::ValueEnum for ColorChoice {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Always, Self::Auto, Self::Never]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Always => clap::builder::PossibleValue::new("always"),
            Self::Auto => clap::builder::PossibleValue::new("auto"),
            Self::Never => clap::builder::PossibleValue::new("never"),
        })
    }
}

impl Default for ColorChoice {
    fn default() -> Self {
        Self::Auto
    }
}
