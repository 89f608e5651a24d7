// Shared transport configuration for building reqwest::Client instances.
//
// The Maker API, hub-local management endpoints, and the eWeLink cloud
// all share timeout and user-agent settings through this module. Hubitat
// hubs speak plain HTTP on the LAN, so there is no TLS configuration.

use std::time::Duration;

use crate::error::Error;

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent("hubmate/0.1.0")
            .build()
            .map_err(Error::Transport)
    }
}
