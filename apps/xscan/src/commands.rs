//! Command dispatch

use crate::cli::{Cli, Commands, GlobalArgs, ScanArgs};
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::InProcessCli;
use std::sync::Arc;
use tracing::{debug, info};
use xscan_config::Config;
use xscan_harness::{connection_from_config, parse_min_version, VerifyPipeline, VerifyRequest};
use xscan_net::{NetClient, NetConfig};
use xscan_ops::{OperationResult, OpsContextBuilder, OpsCtx, ScanOptions};
use xscan_types::{OutputFormat, Threshold};

/// Arguments of a `verify` invocation
struct VerifyArgs {
    min_version: Option<String>,
    threshold: Threshold,
    command: Vec<String>,
}

/// Run a parsed command line
pub(crate) async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli { command, global } = cli;
    info!(command = command.name(), "starting xscan v{}", env!("CARGO_PKG_VERSION"));

    // 1. Start with file config (or defaults)
    let mut config = Config::load_or_default(global.config.as_deref()).await?;

    // 2. Merge environment variables
    config.merge_env()?;

    // 3. Apply CLI flags (highest precedence)
    apply_cli_config(&mut config, &global);

    match command {
        Commands::Verify {
            min_version,
            min_violations,
            min_vulnerabilities,
            min_licenses,
            command,
        } => {
            let args = VerifyArgs {
                min_version,
                threshold: Threshold::new(min_violations, min_vulnerabilities, min_licenses),
                command,
            };
            verify(args, &global, config).await
        }
        command => run_operation(command, config).await,
    }
}

/// Apply global CLI flags on top of file and environment configuration
fn apply_cli_config(config: &mut Config, global: &GlobalArgs) {
    if let Some(url) = &global.url {
        config.server.url = Some(url.clone());
    }
    if let Some(token) = &global.access_token {
        config.server.access_token = Some(token.clone());
    }
    if let Some(user) = &global.user {
        config.server.user = Some(user.clone());
    }
    if let Some(password) = &global.password {
        config.server.password = Some(password.clone());
    }
    if let Some(color) = global.color {
        config.general.color = color;
    }
}

/// Authenticate, run a scan or query operation and render its result
async fn run_operation(command: Commands, config: Config) -> Result<(), CliError> {
    let net = NetClient::new(NetConfig::from(&config.network))?;
    let connection = connection_from_config(&config)?;
    let connection = xscan_net::authenticate(&net, &connection).await?;

    let color = config.general.color;
    let format = output_format(&command);

    let ctx = OpsContextBuilder::new()
        .with_net(net)
        .with_connection(connection)
        .with_config(config)
        .build()?;

    let result = execute_command(command, &ctx).await?;

    let renderer = OutputRenderer::new(format, color);
    renderer.render_result(&result, &mut xscan_capture::stdout())?;

    info!("Command completed successfully");
    Ok(())
}

/// Execute the specified command
async fn execute_command(command: Commands, ctx: &OpsCtx) -> Result<OperationResult, CliError> {
    match command {
        Commands::Scan { pattern, scan } => {
            let results = xscan_ops::scan_binaries(ctx, &pattern, scan_options(&scan)).await?;
            Ok(OperationResult::ScanResults(results))
        }

        Commands::AuditNpm { project, scan } => {
            let results = xscan_ops::audit_npm(ctx, &project.project, scan_options(&scan)).await?;
            Ok(OperationResult::ScanResults(results))
        }

        Commands::AuditGradle { project, scan } => {
            let results =
                xscan_ops::audit_gradle(ctx, &project.project, scan_options(&scan)).await?;
            Ok(OperationResult::ScanResults(results))
        }

        Commands::AuditMvn { project, scan } => {
            let results = xscan_ops::audit_mvn(ctx, &project.project, scan_options(&scan)).await?;
            Ok(OperationResult::ScanResults(results))
        }

        Commands::ServerVersion => {
            let info = xscan_ops::server_version(ctx).await?;
            Ok(OperationResult::ServerInfo(info))
        }

        Commands::Verify { .. } => Err(CliError::InvalidArguments(
            "verify runs through the verification pipeline".to_string(),
        )),
    }
}

/// Run a command in-process and check its results
async fn verify(args: VerifyArgs, global: &GlobalArgs, config: Config) -> Result<(), CliError> {
    let sub_command = args.command.iter().find(|arg| !arg.starts_with('-'));
    if sub_command.is_some_and(|name| name == "verify") {
        return Err(CliError::InvalidArguments(
            "verify cannot run another verify".to_string(),
        ));
    }
    if let Some(required) = &args.min_version {
        parse_min_version(required)?;
    }

    let net = NetClient::new(NetConfig::from(&config.network))?;
    let connection = connection_from_config(&config)?;

    let mut command = args.command;
    if let Some(path) = &global.config {
        command.push(format!("--config={}", path.display()));
    }
    debug!(?command, "verifying command");

    let request = VerifyRequest {
        args: command,
        min_version: args.min_version,
        threshold: args.threshold,
    };
    let pipeline = VerifyPipeline::new(Arc::new(InProcessCli), env!("CARGO_PKG_NAME"));
    let outcome = pipeline.run(net, connection, &request).await?;

    let renderer = OutputRenderer::new(OutputFormat::Table, config.general.color);
    renderer.render_verify(&outcome, &mut xscan_capture::stdout())?;
    Ok(())
}

fn scan_options(scan: &ScanArgs) -> ScanOptions {
    ScanOptions {
        include_licenses: scan.licenses,
    }
}

fn output_format(command: &Commands) -> OutputFormat {
    match command {
        Commands::Scan { scan, .. }
        | Commands::AuditNpm { scan, .. }
        | Commands::AuditGradle { scan, .. }
        | Commands::AuditMvn { scan, .. } => scan.format,
        Commands::ServerVersion | Commands::Verify { .. } => OutputFormat::Table,
    }
}
