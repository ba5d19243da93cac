#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Command execution and result verification for xscan
//!
//! The harness runs xscan sub-commands in-process against a live scan
//! service, captures what they print and checks the scan results against
//! minimum finding counts. Commands that need a newer service than the one
//! available are skipped rather than failed.

mod gate;
mod pipeline;
mod runner;
mod session;
mod validate;

pub use gate::{check_min_version, parse_min_version, GateDecision};
pub use pipeline::{Stage, StageError, VerifyOutcome, VerifyPipeline, VerifyRequest};
pub use runner::{CliRunner, CommandExecutor};
pub use session::{build_connection, connection_from_config, init_test, Readiness, SessionContext};
pub use validate::{parse_scan_output, validate_scan};

pub use async_trait::async_trait;
