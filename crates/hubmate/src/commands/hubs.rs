//! Hub maintenance commands: firmware update and deep reboot.

use hubmate_core::{HomeController, ProgressEvent, ProgressSink};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Streams orchestration progress to the terminal as it happens.
struct ConsoleProgress {
    quiet: bool,
}

impl ProgressSink for ConsoleProgress {
    fn emit(&self, event: ProgressEvent) {
        if !self.quiet {
            println!("{event}");
        }
    }
}

/// Update every hub that has new firmware available and wait for the
/// fleet to converge.
pub async fn update(controller: &HomeController, global: &GlobalOpts) -> Result<(), CliError> {
    let progress = ConsoleProgress {
        quiet: global.quiet,
    };
    let summary = controller.update_hubs(&progress).await?;
    output::print_success(&summary, global.quiet);
    Ok(())
}

/// Power-cycle a hub through its smart plug.
pub async fn deep_reboot(
    controller: &HomeController,
    device: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let progress = ConsoleProgress {
        quiet: global.quiet,
    };
    controller.deep_reboot(device, &progress).await?;
    Ok(())
}
