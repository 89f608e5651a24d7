use thiserror::Error;

/// Maximum number of characters of an offending response body carried
/// inside a [`Error::Parse`] preview.
pub const PREVIEW_LIMIT: usize = 200;

/// Top-level error type for the `hubmate-api` crate.
///
/// Covers every failure mode across all API surfaces: the Maker API,
/// hub-local management endpoints, and the eWeLink cloud.
/// `hubmate-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Data ────────────────────────────────────────────────────────
    /// Response body could not be parsed, with the endpoint and a
    /// truncated preview of the offending body for debugging.
    #[error("Malformed response from {endpoint}: {message}\nResponse preview: {preview}")]
    Parse {
        endpoint: String,
        message: String,
        preview: String,
    },

    // ── Upstream rejection ──────────────────────────────────────────
    /// The upstream endpoint answered with a non-success status where
    /// success was required (e.g. a firmware-update trigger).
    #[error("Endpoint rejected request (HTTP {status}): {description}")]
    Status { status: u16, description: String },

    // ── Cloud (eWeLink) ─────────────────────────────────────────────
    /// Login to the smart-plug cloud failed.
    #[error("eWeLink authentication failed: {message}")]
    CloudAuthentication { message: String },

    /// No cloud device with the requested name exists on the account.
    #[error("No eWeLink device named '{name}'")]
    CloudDeviceNotFound { name: String },
}

impl Error {
    /// Build a [`Error::Parse`] from an endpoint, a cause, and the raw
    /// body, truncating the body to [`PREVIEW_LIMIT`] characters.
    pub fn parse(endpoint: impl Into<String>, message: impl Into<String>, body: &str) -> Self {
        let preview = if body.chars().count() > PREVIEW_LIMIT {
            let cut: String = body.chars().take(PREVIEW_LIMIT).collect();
            format!("{cut}...")
        } else {
            body.to_string()
        };
        Self::Parse {
            endpoint: endpoint.into(),
            message: message.into(),
            preview,
        }
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_preview_truncates_long_bodies() {
        let body = "x".repeat(300);
        let err = Error::parse("http://hub/devices/1", "expected JSON", &body);
        match err {
            Error::Parse { preview, .. } => {
                assert_eq!(preview.chars().count(), PREVIEW_LIMIT + 3);
                assert!(preview.ends_with("..."));
            }
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn parse_preview_keeps_short_bodies_whole() {
        let err = Error::parse("http://hub/devices/1", "expected JSON", "<html>oops</html>");
        match err {
            Error::Parse { preview, endpoint, .. } => {
                assert_eq!(preview, "<html>oops</html>");
                assert_eq!(endpoint, "http://hub/devices/1");
            }
            other => panic!("expected Parse, got {other:?}"),
        }
    }
}
