//! Mode and Safety Monitor commands.

use hubmate_core::HomeController;

use crate::cli::{GlobalOpts, ModeCommand};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    controller: &HomeController,
    cmd: ModeCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        ModeCommand::Get => {
            let mode = controller.current_mode().await?;
            output::print_line(&mode, global.quiet);
        }
        ModeCommand::List => {
            for mode in controller.modes().await? {
                let marker = if mode.active { " (active)" } else { "" };
                output::print_line(&format!("{}{marker}", mode.name), global.quiet);
            }
        }
        ModeCommand::Set { name } => {
            let mode = controller.set_mode(&name).await?;
            output::print_success(&format!("Mode set to {mode}"), global.quiet);
        }
    }
    Ok(())
}

pub async fn cancel_alerts(
    controller: &HomeController,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let reply = controller.hsm_command("cancelAlerts").await?;
    output::print_success(&format!("Alerts cancelled: {reply}"), global.quiet);
    Ok(())
}
