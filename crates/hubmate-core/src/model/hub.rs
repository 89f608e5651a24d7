// ── Hub orchestration record and timing configuration ──

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::power::PowerControl;

/// A Hubitat hub, derived from a [`Device`](super::Device) of kind
/// [`Hub`](super::DeviceKind::Hub) plus the management fields the
/// orchestration steps discover: local IP, management token, and
/// firmware versions. Mutated in place as those steps run.
#[derive(Clone)]
pub struct Hub {
    pub id: i64,
    pub label: String,
    pub ip: String,
    pub management_token: String,
    pub current_version: String,
    pub available_version: String,
    /// Attached once at startup when a smart plug feeds this hub;
    /// never reassigned during a reboot sequence.
    pub power_control: Option<Arc<dyn PowerControl>>,
}

impl Hub {
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            ip: String::new(),
            management_token: String::new(),
            current_version: String::new(),
            available_version: String::new(),
            power_control: None,
        }
    }

    /// `true` when the last version check saw an update pending.
    pub fn needs_update(&self) -> bool {
        self.current_version != self.available_version
    }

    /// The display name of the smart-plug outlet expected to feed this
    /// hub on the power-control account.
    pub fn outlet_name(&self) -> String {
        format!("Hub Power - {}", self.label)
    }
}

impl fmt::Debug for Hub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hub")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("ip", &self.ip)
            .field("current_version", &self.current_version)
            .field("available_version", &self.available_version)
            .field("power_control", &self.power_control.is_some())
            .finish_non_exhaustive()
    }
}

/// Timed waits of the deep-reboot sequence.
#[derive(Debug, Clone, Copy)]
pub struct RebootConfig {
    /// Grace period after the shutdown command before cutting power.
    pub shutdown_wait: Duration,
    /// How long the hub stays without mains power.
    pub power_off_wait: Duration,
}

impl Default for RebootConfig {
    fn default() -> Self {
        Self {
            shutdown_wait: Duration::from_secs(45),
            power_off_wait: Duration::from_secs(60),
        }
    }
}

/// Retry policy for restoring power after the off-wait.
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    pub max_power_restore_attempts: u32,
    pub power_restore_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_power_restore_attempts: 3,
            power_restore_delay: Duration::from_secs(5),
        }
    }
}

/// Polling policy for the firmware-update orchestration.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    pub max_attempts: u32,
    pub poll_delay: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            poll_delay: Duration::from_secs(30),
        }
    }
}
