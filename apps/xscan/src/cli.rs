//! Command line interface definition

use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use xscan_types::{ColorChoice, OutputFormat};

/// xscan - Security audit scans through a remote scan service
#[derive(Parser, Debug)]
#[command(name = "xscan")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Security audit scans through a remote scan service")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Full command tree, including the `completion` commands
#[must_use]
pub fn command() -> clap::Command {
    Cli::command().subcommand(crate::completion::completion_command())
}

/// Global arguments available for all commands
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Scan service base URL
    #[arg(long, global = true, value_name = "URL")]
    pub url: Option<String>,

    /// Access token for the scan service
    #[arg(long, global = true, value_name = "TOKEN")]
    pub access_token: Option<String>,

    /// User name for basic authentication
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Password for basic authentication
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Color output control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    /// Enable debug logging to the xscan logs directory
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Options shared by scan and audit commands
#[derive(Args, Debug, Clone, Default)]
pub struct ScanArgs {
    /// Include license findings in the results
    #[arg(long)]
    pub licenses: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Project location for audit commands
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Project root directory
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub project: PathBuf,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan binary files matching a glob pattern
    Scan {
        /// Glob pattern of the files to scan
        pattern: String,

        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Audit the dependencies of an npm project
    #[command(name = "audit-npm")]
    AuditNpm {
        #[command(flatten)]
        project: ProjectArgs,

        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Audit the dependencies of a Gradle project
    #[command(name = "audit-gradle")]
    AuditGradle {
        #[command(flatten)]
        project: ProjectArgs,

        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Audit the dependencies of a Maven project
    #[command(name = "audit-mvn")]
    AuditMvn {
        #[command(flatten)]
        project: ProjectArgs,

        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Show the version of the scan service
    #[command(name = "server-version")]
    ServerVersion,

    /// Run a command and check its scan results against minimum counts
    Verify {
        /// Skip unless the scan service is at least this version
        #[arg(long, value_name = "VERSION")]
        min_version: Option<String>,

        /// Minimum number of violations in the first result
        #[arg(long, default_value_t = 0)]
        min_violations: usize,

        /// Minimum number of vulnerabilities in the first result
        #[arg(long, default_value_t = 0)]
        min_vulnerabilities: usize,

        /// Minimum number of licenses in the first result
        #[arg(long, default_value_t = 0)]
        min_licenses: usize,

        /// Command to run, after `--`
        #[arg(last = true, required = true, value_name = "COMMAND")]
        command: Vec<String>,
    },
}

impl Commands {
    /// Get command name for logging
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Scan { .. } => "scan",
            Commands::AuditNpm { .. } => "audit-npm",
            Commands::AuditGradle { .. } => "audit-gradle",
            Commands::AuditMvn { .. } => "audit-mvn",
            Commands::ServerVersion => "server-version",
            Commands::Verify { .. } => "verify",
        }
    }
}
