mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use hubmate_core::HomeController;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let file = config::load_from(&config::config_path())?;
    let controller_config = config::resolve(&file, &cli.global)?;
    let controller = HomeController::connect(controller_config).await?;

    // Every command except `refresh` still needs a populated index;
    // `refresh` prints the summary itself.
    if !matches!(cli.command, Command::Refresh) && needs_index(&cli.command) {
        let (_, warnings) = controller.refresh().await?;
        output::print_warnings(&warnings, cli.global.quiet);
    }

    tracing::debug!(command = ?cli.command, "dispatching command");
    commands::dispatch(cli.command, &controller, &cli.global).await
}

/// Modes and Safety Monitor go straight to the Maker API; everything
/// else resolves device names first.
fn needs_index(command: &Command) -> bool {
    !matches!(command, Command::Mode(_) | Command::CancelAlerts)
}
