pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;

use std::process::ExitCode;

use clap::Parser;
use vcadmin_vsphere::VsphereAdminService;

use cli::{Cli, Command};
use commands::CommandOutcome;
use error::CliError;

pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logging::init(cli.debug) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    match run_cli(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Connect, run one command, disconnect, print the outcome.
pub async fn run_cli(cli: Cli) -> Result<(), CliError> {
    let file = config::load_file_config(cli.connection.config.as_deref())?;
    let config = config::resolve(&cli.connection, file.as_ref())?;
    let server = config.host.clone();

    let mut service = VsphereAdminService::new();
    service.connect(config).await?;
    if let Some(safe) = service.get_config() {
        tracing::debug!(config = ?safe, "Connected to {server}");
    }

    let result = dispatch(&service, &cli.command, &server).await;

    if let Err(e) = service.disconnect().await {
        tracing::warn!("Logout from {server} failed: {e}");
    }

    print_outcome(&result?, cli.json)
}

async fn dispatch(
    service: &VsphereAdminService,
    command: &Command,
    server: &str,
) -> Result<CommandOutcome, CliError> {
    let outcome = match command {
        Command::CheckSession => CommandOutcome::Session {
            server: server.to_string(),
            valid: service.check_session().await?,
        },
        Command::Inventory(cmd) => commands::execute(service.client()?, cmd).await?,
    };
    Ok(outcome)
}

fn print_outcome(outcome: &CommandOutcome, json: bool) -> Result<(), CliError> {
    if json {
        let text = serde_json::to_string_pretty(outcome).map_err(CliError::Output)?;
        println!("{text}");
    } else {
        println!("{outcome}");
    }
    Ok(())
}
