// ── Runtime connection configuration ──
//
// These types describe *how* to reach the Maker API and, optionally,
// the eWeLink cloud. They carry credential data and connection tuning,
// but never touch disk. The CLI constructs a `ControllerConfig` and
// hands it in.

use secrecy::SecretString;
use url::Url;

use crate::model::{PollConfig, RebootConfig};

/// eWeLink cloud credentials for outlet-based power control.
#[derive(Debug, Clone)]
pub struct EweLinkCredentials {
    /// Regional API endpoint (e.g., `https://us-apia.coolkit.cc`).
    pub base_url: Url,
    pub email: String,
    pub password: SecretString,
}

/// Configuration for connecting to one Hubitat installation.
///
/// Built by the CLI, passed to `HomeController` -- core never reads
/// config files.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Base URL of the hub hosting the Maker API (e.g., `http://192.168.1.40`).
    pub base_url: Url,
    /// Maker API app instance id.
    pub app_id: String,
    /// Maker API access token.
    pub access_token: SecretString,
    /// Request timeout.
    pub timeout: std::time::Duration,
    /// Firmware update polling tuning.
    pub poll: PollConfig,
    /// Deep reboot wait tuning.
    pub reboot: RebootConfig,
    /// Power control backend; `None` disables deep reboot.
    pub ewelink: Option<EweLinkCredentials>,
}

impl ControllerConfig {
    pub fn new(base_url: Url, app_id: impl Into<String>, access_token: SecretString) -> Self {
        Self {
            base_url,
            app_id: app_id.into(),
            access_token,
            timeout: std::time::Duration::from_secs(30),
            poll: PollConfig::default(),
            reboot: RebootConfig::default(),
            ewelink: None,
        }
    }
}
