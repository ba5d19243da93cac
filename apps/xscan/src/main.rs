//! xscan - Security audit scans through a remote scan service
//!
//! This is the main CLI application; all command handling lives in the
//! library so `verify` can run commands in-process.

use std::io::Write;
use std::process;
use tracing::{error, warn};
use xscan::logging::init_tracing;
use xscan::CliError;

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().collect();

    // Tracing must be up before clap runs, so peek at the flag
    init_tracing(args.iter().any(|arg| arg == "--debug"));

    let result = xscan::execute(args).await;
    if let Err(e) = xscan_capture::stdout().flush() {
        warn!("Failed to flush output: {}", e);
    }

    if let Err(e) = result {
        error!("Application error: {}", e);
        match e {
            CliError::Usage(_) => eprintln!("{e}"),
            _ => eprintln!("Error: {e}"),
        }
        process::exit(e.exit_code());
    }
}
