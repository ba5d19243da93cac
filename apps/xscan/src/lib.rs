//! xscan - Security audit scans through a remote scan service
//!
//! The binary is a thin wrapper around [`execute`], which also serves the
//! in-process invocations made by `xscan verify`.

pub mod cli;
mod commands;
pub mod completion;
pub mod display;
pub mod error;
pub mod logging;

pub use error::CliError;

use async_trait::async_trait;
use clap::error::ErrorKind;
use clap::FromArgMatches;
use std::io::Write;
use xscan_errors::{Error, OpsError};
use xscan_harness::CommandExecutor;

/// Run one full command line in-process
///
/// `args` starts with the program name, like `std::env::args()`. Everything
/// the command prints goes through the process-wide output router, so a
/// surrounding capture sees it. Help and version requests print and succeed;
/// other parse failures are returned as [`CliError::Usage`].
///
/// # Errors
///
/// Returns a [`CliError`] if the command line is invalid or the command fails.
pub async fn execute(args: Vec<String>) -> Result<(), CliError> {
    let matches = match cli::command().try_get_matches_from(&args) {
        Ok(matches) => matches,
        Err(e) => {
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    write!(xscan_capture::stdout(), "{}", e.render())?;
                    Ok(())
                }
                _ => Err(CliError::Usage(e.render().to_string())),
            };
        }
    };

    if let Some(("completion", completion)) = matches.subcommand() {
        completion::run(completion, &mut xscan_capture::stdout())?;
        return Ok(());
    }

    let cli = cli::Cli::from_arg_matches(&matches)
        .map_err(|e| CliError::Usage(e.render().to_string()))?;
    drop(matches);

    commands::run(cli).await
}

/// Runs xscan commands in this process for the verification harness
#[derive(Debug, Clone, Copy, Default)]
pub struct InProcessCli;

#[async_trait]
impl CommandExecutor for InProcessCli {
    async fn execute(&self, args: Vec<String>) -> Result<(), Error> {
        crate::execute(args).await.map_err(into_error)
    }
}

fn into_error(err: CliError) -> Error {
    match err {
        CliError::Config(e) => e.into(),
        CliError::Ops(e) => e,
        CliError::Stage(e) => e.source,
        CliError::InvalidArguments(message) | CliError::Usage(message) => {
            OpsError::InvalidArguments { message }.into()
        }
        CliError::Io(e) => e.into(),
    }
}
