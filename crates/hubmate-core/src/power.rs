// ── Mains power control and deep reboot ──

use std::sync::Arc;

use async_trait::async_trait;
use hubmate_api::{EweLinkClient, MakerClient};
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::{Hub, RebootConfig, RetryConfig};
use crate::progress::{ProgressEvent, ProgressSink};

/// A failed interaction with the power backend.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct PowerControlError(pub String);

impl From<hubmate_api::Error> for PowerControlError {
    fn from(e: hubmate_api::Error) -> Self {
        Self(e.to_string())
    }
}

/// Something that can cut and restore mains power to a hub.
///
/// Implementations talk to whatever smart outlet the hub is plugged
/// into. Calls are awaited strictly in sequence by the controller, so
/// implementations need not serialize internally.
#[async_trait]
pub trait PowerControl: Send + Sync {
    async fn power_on(&self) -> Result<(), PowerControlError>;

    async fn power_off(&self) -> Result<(), PowerControlError>;

    /// How stubbornly power restoration is retried.
    fn retry_config(&self) -> RetryConfig {
        RetryConfig::default()
    }
}

/// An eWeLink cloud outlet, looked up by device name at attach time.
pub struct EweLinkOutlet {
    client: Arc<EweLinkClient>,
    device_id: String,
}

impl EweLinkOutlet {
    pub fn new(client: Arc<EweLinkClient>, device_id: String) -> Self {
        Self { client, device_id }
    }

    /// Find the outlet named `name` in the eWeLink account.
    pub async fn attach(client: Arc<EweLinkClient>, name: &str) -> Result<Self, PowerControlError> {
        let device = client.find_device(name).await?;
        debug!(name, device_id = %device.device_id, "attached eWeLink outlet");
        Ok(Self::new(client, device.device_id))
    }
}

#[async_trait]
impl PowerControl for EweLinkOutlet {
    async fn power_on(&self) -> Result<(), PowerControlError> {
        self.client.set_power(&self.device_id, true).await?;
        Ok(())
    }

    async fn power_off(&self) -> Result<(), PowerControlError> {
        self.client.set_power(&self.device_id, false).await?;
        Ok(())
    }
}

/// Runs the full power-cycle ("deep reboot") sequence for a hub.
pub struct PowerCycleController {
    reboot: RebootConfig,
}

impl PowerCycleController {
    pub fn new(reboot: RebootConfig) -> Self {
        Self { reboot }
    }

    /// Cleanly shut the hub down, cut its power, and restore it.
    ///
    /// The sequence is: shutdown command over the Maker API (the reply
    /// must be exactly "OK"), a fixed wait for the OS to halt, power
    /// off, a fixed wait with power cut, then power on with retries.
    /// Any failure after power was cut and before it was restored
    /// triggers an unconditional emergency power-on; the original
    /// error is reported either way.
    pub async fn deep_reboot(
        &self,
        hub: &Hub,
        maker: &MakerClient,
        progress: &dyn ProgressSink,
    ) -> Result<(), CoreError> {
        let Some(control) = hub.power_control.as_ref() else {
            progress.emit(ProgressEvent::SequenceFailed {
                hub: hub.label.clone(),
                reason: "no power control configured".into(),
            });
            return Err(CoreError::PowerControlUnconfigured {
                label: hub.label.clone(),
            });
        };

        let mut power_cut = false;
        let result = self
            .run_sequence(hub, maker, control.as_ref(), progress, &mut power_cut)
            .await;

        match result {
            Ok(()) => {
                progress.emit(ProgressEvent::SequenceCompleted {
                    hub: hub.label.clone(),
                });
                Ok(())
            }
            Err(e) => {
                progress.emit(ProgressEvent::SequenceFailed {
                    hub: hub.label.clone(),
                    reason: e.to_string(),
                });
                if power_cut {
                    self.emergency_restore(control.as_ref(), progress).await;
                }
                Err(e)
            }
        }
    }

    async fn run_sequence(
        &self,
        hub: &Hub,
        maker: &MakerClient,
        control: &dyn PowerControl,
        progress: &dyn ProgressSink,
        power_cut: &mut bool,
    ) -> Result<(), CoreError> {
        progress.emit(ProgressEvent::ShutdownInitiated {
            hub: hub.label.clone(),
        });
        let reply = maker.device_command(hub.id, "shutdown", &[]).await?;
        if reply != "OK" {
            return Err(CoreError::PowerSequence {
                label: hub.label.clone(),
                reason: format!("shutdown command returned \"{reply}\""),
            });
        }

        progress.emit(ProgressEvent::WaitingForShutdown {
            seconds: self.reboot.shutdown_wait.as_secs(),
        });
        tokio::time::sleep(self.reboot.shutdown_wait).await;

        progress.emit(ProgressEvent::CuttingPower {
            hub: hub.label.clone(),
        });
        *power_cut = true;
        control
            .power_off()
            .await
            .map_err(|e| CoreError::PowerSequence {
                label: hub.label.clone(),
                reason: format!("power off failed: {e}"),
            })?;

        progress.emit(ProgressEvent::WaitingPoweredOff {
            seconds: self.reboot.power_off_wait.as_secs(),
        });
        tokio::time::sleep(self.reboot.power_off_wait).await;

        self.restore_power(hub, control, progress).await?;
        *power_cut = false;
        info!(hub = %hub.label, "power cycle complete");
        Ok(())
    }

    async fn restore_power(
        &self,
        hub: &Hub,
        control: &dyn PowerControl,
        progress: &dyn ProgressSink,
    ) -> Result<(), CoreError> {
        let retry = control.retry_config();
        let mut last_error = String::new();

        for attempt in 1..=retry.max_power_restore_attempts {
            progress.emit(ProgressEvent::RestoringPower {
                hub: hub.label.clone(),
                attempt,
                max: retry.max_power_restore_attempts,
            });
            match control.power_on().await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!(hub = %hub.label, attempt, error = %e, "power restore attempt failed");
                    last_error = e.to_string();
                    if attempt < retry.max_power_restore_attempts {
                        progress.emit(ProgressEvent::RestoreRetryScheduled {
                            reason: last_error.clone(),
                            seconds: retry.power_restore_delay.as_secs(),
                        });
                        tokio::time::sleep(retry.power_restore_delay).await;
                    }
                }
            }
        }

        Err(CoreError::PowerSequence {
            label: hub.label.clone(),
            reason: format!(
                "power restore failed after {} attempts: {last_error}",
                retry.max_power_restore_attempts
            ),
        })
    }

    /// Last-ditch power-on after a failure with the outlet switched
    /// off. A hub without power cannot recover on its own, so this
    /// runs even when the failure itself came from the power backend.
    async fn emergency_restore(&self, control: &dyn PowerControl, progress: &dyn ProgressSink) {
        progress.emit(ProgressEvent::EmergencyRestoreStarted);
        match control.power_on().await {
            Ok(()) => progress.emit(ProgressEvent::EmergencyRestoreSucceeded),
            Err(e) => progress.emit(ProgressEvent::EmergencyRestoreFailed {
                reason: e.to_string(),
            }),
        }
    }
}
