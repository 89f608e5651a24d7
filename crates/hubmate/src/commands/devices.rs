//! Device-facing commands: on/off/run/attr/list/refresh/open-sensors.

use hubmate_core::HomeController;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Run a command on a device addressed by any of its aliases.
pub async fn run(
    controller: &HomeController,
    device: &str,
    command: &str,
    args: &[String],
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let reply = controller.run_device_command(device, command, args).await?;
    output::print_line(&format!("{}: {}", reply.label, reply.reply), global.quiet);
    Ok(())
}

/// Read one attribute of a device.
pub async fn attribute(
    controller: &HomeController,
    device: &str,
    attribute: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let reply = controller.device_attribute(device, attribute).await?;
    output::print_line(&format!("{}: {}", reply.label, reply.reply), global.quiet);
    Ok(())
}

/// Grouped listing of every device with its accepted aliases.
pub async fn list(controller: &HomeController, global: &GlobalOpts) -> Result<(), CliError> {
    let groups = controller.list_devices();
    output::print_line(&output::device_table(&groups), global.quiet);
    Ok(())
}

/// Refetch devices and rebuild the alias index.
pub async fn refresh(controller: &HomeController, global: &GlobalOpts) -> Result<(), CliError> {
    let (count, warnings) = controller.refresh().await?;
    output::print_warnings(&warnings, global.quiet);
    output::print_success(&format!("Indexed {count} devices"), global.quiet);
    Ok(())
}

/// Names of contact sensors currently open.
pub async fn open_sensors(
    controller: &HomeController,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let open = controller.open_sensors().await?;
    if open.is_empty() {
        output::print_success("Everything is closed", global.quiet);
    } else {
        for label in open {
            output::print_line(&label, global.quiet);
        }
    }
    Ok(())
}
