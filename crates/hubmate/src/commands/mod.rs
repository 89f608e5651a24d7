//! Command dispatch: bridges CLI args -> controller calls -> output.

pub mod devices;
pub mod hubs;
pub mod modes;

use hubmate_core::HomeController;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a hub-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    controller: &HomeController,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::On(args) => devices::run(controller, &args.device, "on", &[], global).await,
        Command::Off(args) => devices::run(controller, &args.device, "off", &[], global).await,
        Command::Run(args) => {
            devices::run(controller, &args.device, &args.command, &args.args, global).await
        }
        Command::Attr(args) => {
            devices::attribute(controller, &args.device, &args.attribute, global).await
        }
        Command::List => devices::list(controller, global).await,
        Command::Refresh => devices::refresh(controller, global).await,
        Command::OpenSensors => devices::open_sensors(controller, global).await,
        Command::Update => hubs::update(controller, global).await,
        Command::DeepReboot(args) => hubs::deep_reboot(controller, &args.device, global).await,
        Command::Mode(cmd) => modes::handle(controller, cmd, global).await,
        Command::CancelAlerts => modes::cancel_alerts(controller, global).await,
    }
}
