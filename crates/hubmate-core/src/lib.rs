//! Device resolution and hub fleet orchestration for the hubmate workspace.
//!
//! This crate owns the business logic between `hubmate-api` and the
//! operator-facing front ends:
//!
//! - **[`AbbreviationEngine`]** — computes a minimal, collision-free short
//!   code per device name so `/on kl` means the Kitchen Light.
//!
//! - **[`DeviceIndex`]** / **[`DeviceRegistry`]** — lowercase alias →
//!   device lookup (full names, `light(s)`-suffix-stripped names, and
//!   abbreviations), published behind an atomically swapped snapshot so a
//!   refresh never races readers.
//!
//! - **[`VersionTracker`]** / **[`UpdateOrchestrator`]** — hub firmware
//!   version discovery and the poll-until-converged fleet update.
//!
//! - **[`PowerCycleController`]** — the deep-reboot sequence: graceful
//!   shutdown, mains power cut through an external [`PowerControl`]
//!   (a cloud smart plug), timed wait, retried restore, and emergency
//!   recovery if anything goes wrong while the power is off.
//!
//! - **[`HomeController`]** — the facade the CLI threads through its
//!   handlers: one Maker API client, one index snapshot, one hub list.

pub mod abbrev;
pub mod config;
pub mod controller;
pub mod error;
pub mod index;
pub mod model;
pub mod power;
pub mod progress;
pub mod update;
pub mod versions;

// ── Primary re-exports ──────────────────────────────────────────────
pub use abbrev::AbbreviationEngine;
pub use config::{ControllerConfig, EweLinkCredentials};
pub use controller::{CommandReply, HomeController};
pub use error::CoreError;
pub use index::{DeviceIndex, DeviceRegistry};
pub use model::{Device, DeviceKind, Hub, KindGroup, PollConfig, RebootConfig, RetryConfig};
pub use power::{EweLinkOutlet, PowerControl, PowerControlError, PowerCycleController};
pub use progress::{NullSink, ProgressEvent, ProgressSink};
pub use update::{UpdateOrchestrator, UpdateProgress};
pub use versions::VersionTracker;

pub use hubmate_api::maker::ModeInfo;
