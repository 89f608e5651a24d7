// ── Core error types ──
//
// User-facing errors from hubmate-core. Resolution and validation
// failures are returned directly for display; orchestration failures
// aggregate partial outcomes into one message instead of failing
// silently per hub. Transport-layer errors are wrapped, not exposed raw.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Resolution / validation ──────────────────────────────────────
    #[error("No device found for query: {query}")]
    NotFound { query: String },

    #[error("Command '{command}' is not supported by device '{label}'")]
    UnsupportedCommand { label: String, command: String },

    #[error("Invalid number of arguments for '{command}': expected {expected}, got {got}")]
    ArityMismatch {
        command: String,
        expected: usize,
        got: usize,
    },

    #[error("Device '{label}' is not a hub")]
    NotAHub { label: String },

    // ── Hub orchestration ────────────────────────────────────────────
    #[error("Failed to get version info for hub {hub}: {source}")]
    VersionQuery {
        hub: String,
        #[source]
        source: hubmate_api::Error,
    },

    #[error("Failed to initiate update for hub {hub}: {detail}")]
    UpdateTrigger { hub: String, detail: String },

    #[error("Update timeout. Hubs that did not complete: {detail}")]
    UpdateTimedOut { detail: String },

    #[error("{failure_summary}\n{success_summary}")]
    UpdateAggregate {
        failure_summary: String,
        success_summary: String,
    },

    #[error("Hub initialization failed for {hub}: {reason}")]
    HubInit { hub: String, reason: String },

    // ── Deep reboot ──────────────────────────────────────────────────
    #[error("Deep reboot not supported for hub {label}: no power control configured")]
    PowerControlUnconfigured { label: String },

    #[error("Deep reboot of hub {label} failed: {reason}")]
    PowerSequence { label: String, reason: String },

    // ── Modes ────────────────────────────────────────────────────────
    #[error("No active mode found")]
    NoActiveMode,

    #[error("Mode not found: {name}")]
    ModeNotFound { name: String },

    // ── Transport / parsing (wrapped) ────────────────────────────────
    #[error(transparent)]
    Api(#[from] hubmate_api::Error),
}
