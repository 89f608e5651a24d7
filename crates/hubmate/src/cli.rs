//! Clap derive structures for the `hubmate` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// hubmate -- control Hubitat devices and hubs from the command line
#[derive(Debug, Parser)]
#[command(
    name = "hubmate",
    version,
    about = "Control Hubitat devices and hubs from the command line",
    long_about = "Talks to a Hubitat hub through the Maker API.\n\n\
        Devices are addressed by name, by their name with a trailing\n\
        'light'/'lights' dropped, or by an automatically derived\n\
        abbreviation ('kl' for Kitchen Light). Run `hubmate list` to\n\
        see every accepted alias.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Hub base URL (e.g. http://192.168.1.40)
    #[arg(long, env = "HUBMATE_HUB_URL", global = true)]
    pub hub_url: Option<String>,

    /// Maker API app instance id
    #[arg(long, env = "HUBMATE_APP_ID", global = true)]
    pub app_id: Option<String>,

    /// Maker API access token
    #[arg(long, env = "HUBMATE_ACCESS_TOKEN", global = true, hide_env = true)]
    pub access_token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "HUBMATE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Turn a device on
    On(DeviceTarget),

    /// Turn a device off
    Off(DeviceTarget),

    /// Run an arbitrary command on a device
    #[command(alias = "cmd")]
    Run(RunArgs),

    /// Read one attribute of a device
    Attr(AttrArgs),

    /// List every device with its accepted aliases
    #[command(alias = "ls")]
    List,

    /// Refetch the device list from the hub
    Refresh,

    /// Contact sensors currently reporting open
    OpenSensors,

    /// Update every hub that has new firmware available
    Update,

    /// Power-cycle a hub through its smart plug
    DeepReboot(DeviceTarget),

    /// Show or change the active mode
    #[command(subcommand)]
    Mode(ModeCommand),

    /// Cancel all Safety Monitor alerts
    CancelAlerts,
}

#[derive(Debug, Args)]
pub struct DeviceTarget {
    /// Device name, stripped name, or abbreviation
    pub device: String,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Device name, stripped name, or abbreviation
    pub device: String,

    /// Command to run (e.g. setLevel)
    pub command: String,

    /// Command arguments
    #[arg(trailing_var_arg = true)]
    pub args: Vec<String>,
}

#[derive(Debug, Args)]
pub struct AttrArgs {
    /// Device name, stripped name, or abbreviation
    pub device: String,

    /// Attribute name (e.g. contact)
    pub attribute: String,
}

#[derive(Debug, Subcommand)]
pub enum ModeCommand {
    /// Show the active mode
    Get,
    /// List every mode, marking the active one
    List,
    /// Activate a mode by name (case-insensitive)
    Set {
        /// Mode name (e.g. Away)
        name: String,
    },
}
