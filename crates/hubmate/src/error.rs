//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use hubmate_core::CoreError;

/// Exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────

    #[error("No hub configured")]
    #[diagnostic(
        code(hubmate::no_config),
        help(
            "Set --hub-url, --app-id, and --access-token (or the matching\n\
             HUBMATE_* environment variables), or create {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(hubmate::validation))]
    Validation { field: String, reason: String },

    #[error("Could not read configuration")]
    #[diagnostic(code(hubmate::config))]
    Config {
        #[source]
        source: figment::Error,
    },

    // ── Device resolution ────────────────────────────────────────────

    #[error("No device found for query: {query}")]
    #[diagnostic(
        code(hubmate::not_found),
        help("Run: hubmate list to see every device and its aliases")
    )]
    DeviceNotFound { query: String },

    #[error("{message}")]
    #[diagnostic(code(hubmate::usage))]
    Usage { message: String },

    // ── Hub / network ────────────────────────────────────────────────

    #[error("Could not reach the hub")]
    #[diagnostic(
        code(hubmate::connection),
        help("Check that the hub is up and the Maker API app is enabled.")
    )]
    Connection {
        #[source]
        source: hubmate_core::CoreError,
    },

    #[error("Hub update timed out: {detail}")]
    #[diagnostic(
        code(hubmate::timeout),
        help("The hubs may still finish on their own; run `hubmate update` again to re-check.")
    )]
    Timeout { detail: String },

    #[error(transparent)]
    #[diagnostic(code(hubmate::core))]
    Core(CoreError),
}

impl CliError {
    /// Exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoConfig { .. } | Self::Validation { .. } | Self::Config { .. } => {
                exit_code::GENERAL
            }
            Self::DeviceNotFound { .. } => exit_code::NOT_FOUND,
            Self::Usage { .. } => exit_code::USAGE,
            Self::Connection { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Core(_) => exit_code::GENERAL,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { query } => Self::DeviceNotFound { query },
            CoreError::UnsupportedCommand { .. }
            | CoreError::ArityMismatch { .. }
            | CoreError::NotAHub { .. }
            | CoreError::ModeNotFound { .. } => Self::Usage {
                message: err.to_string(),
            },
            CoreError::UpdateTimedOut { detail } => Self::Timeout { detail },
            CoreError::Api(ref api) if api.is_transient() => Self::Connection { source: err },
            other => Self::Core(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_its_exit_code() {
        let err = CliError::from(CoreError::NotFound {
            query: "krl".into(),
        });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
    }

    #[test]
    fn test_arity_mismatch_is_a_usage_error() {
        let err = CliError::from(CoreError::ArityMismatch {
            command: "setLevel".into(),
            expected: 1,
            got: 0,
        });
        assert_eq!(err.exit_code(), exit_code::USAGE);
    }
}
