// ── Firmware update orchestration ──
//
// Drives a poll-until-converged firmware update across one or more
// hubs. Per hub the state machine is NeedsCheck → Known → {UpToDate |
// Updating → Updated | Failed | TimedOut}; the whole call is strictly
// sequential — no fan-out across hubs — and runs to completion or
// attempt exhaustion, with no external cancellation.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use hubmate_api::{MakerClient, ManagementClient};
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::{Hub, PollConfig};
use crate::progress::{ProgressEvent, ProgressSink};
use crate::versions::VersionTracker;

/// Per-call bookkeeping: the three sets partition the hub total.
#[derive(Debug, Clone, Default)]
pub struct UpdateProgress {
    total_hubs: usize,
    updated: BTreeSet<String>,
    failed: BTreeMap<String, String>,
    in_progress: BTreeSet<String>,
}

impl UpdateProgress {
    pub fn new(in_progress: impl IntoIterator<Item = String>) -> Self {
        let in_progress: BTreeSet<String> = in_progress.into_iter().collect();
        Self {
            total_hubs: in_progress.len(),
            updated: BTreeSet::new(),
            failed: BTreeMap::new(),
            in_progress,
        }
    }

    pub fn mark_updated(&mut self, hub: &str) {
        if self.in_progress.remove(hub) {
            self.updated.insert(hub.to_string());
        }
    }

    pub fn mark_failed(&mut self, hub: &str, reason: impl Into<String>) {
        if self.in_progress.remove(hub) {
            self.failed.insert(hub.to_string(), reason.into());
        }
    }

    pub fn is_complete(&self) -> bool {
        self.updated.len() + self.failed.len() == self.total_hubs
    }

    pub fn total(&self) -> usize {
        self.total_hubs
    }

    pub fn success_count(&self) -> usize {
        self.updated.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }

    pub fn updated(&self) -> impl Iterator<Item = &String> {
        self.updated.iter()
    }

    pub fn failed(&self) -> impl Iterator<Item = (&String, &String)> {
        self.failed.iter()
    }

    pub fn in_progress(&self) -> impl Iterator<Item = &String> {
        self.in_progress.iter()
    }
}

/// Orchestrates the fleet firmware update.
pub struct UpdateOrchestrator<'a> {
    maker: &'a MakerClient,
    management: &'a ManagementClient,
    config: PollConfig,
}

impl<'a> UpdateOrchestrator<'a> {
    pub fn new(maker: &'a MakerClient, management: &'a ManagementClient, config: PollConfig) -> Self {
        Self {
            maker,
            management,
            config,
        }
    }

    /// Update every hub that is behind, polling until all converge.
    ///
    /// - A version-prefetch failure for any hub aborts the whole call,
    ///   naming that hub.
    /// - When no hub needs an update, returns success immediately and
    ///   never issues a firmware trigger.
    /// - A rejected trigger aborts the whole call (hubs already
    ///   triggered are not rolled back — there is no way to).
    /// - During polling, a failed version query leaves the hub in
    ///   progress: it is assumed to be mid-reboot.
    /// - Attempt exhaustion with stragglers is a timeout naming the
    ///   stuck hubs and their last known versions.
    pub async fn update_with_polling(
        &self,
        hubs: &mut [Hub],
        progress: &dyn ProgressSink,
    ) -> Result<String, CoreError> {
        let tracker = VersionTracker::new(self.maker, self.management);

        // Version prefetch — abort on the first failing hub.
        for hub in hubs.iter_mut() {
            tracker
                .refresh_versions(hub)
                .await
                .map_err(|source| CoreError::VersionQuery {
                    hub: hub.label.clone(),
                    source,
                })?;
        }

        let needing: Vec<usize> = (0..hubs.len()).filter(|&i| hubs[i].needs_update()).collect();
        if needing.is_empty() {
            progress.emit(ProgressEvent::AllUpToDate);
            return Ok("All hubs are already up to date".into());
        }
        progress.emit(ProgressEvent::UpdatePlanned {
            hubs: needing.iter().map(|&i| hubs[i].label.clone()).collect(),
        });

        // The pre-update versions, to detect convergence against.
        let baselines: HashMap<String, String> = needing
            .iter()
            .map(|&i| (hubs[i].label.clone(), hubs[i].current_version.clone()))
            .collect();

        // Trigger phase — any rejection aborts the call.
        for &i in &needing {
            let hub = &hubs[i];
            self.management
                .trigger_firmware_update(&hub.ip, &hub.management_token)
                .await
                .map_err(|e| CoreError::UpdateTrigger {
                    hub: hub.label.clone(),
                    detail: e.to_string(),
                })?;
            info!(hub = %hub.label, "firmware update triggered");
            progress.emit(ProgressEvent::UpdateTriggered {
                hub: hub.label.clone(),
            });
        }

        // Poll phase.
        let mut state =
            UpdateProgress::new(needing.iter().map(|&i| hubs[i].label.clone()));
        let mut attempts = 0;

        while !state.is_complete() && attempts < self.config.max_attempts {
            tokio::time::sleep(self.config.poll_delay).await;
            attempts += 1;

            let pending: Vec<String> = state.in_progress().cloned().collect();
            for name in pending {
                let Some(hub) = hubs.iter_mut().find(|h| h.label == name) else {
                    continue;
                };
                match tracker.refresh_versions(hub).await {
                    Ok((new_current, _)) => {
                        let baseline = &baselines[&name];
                        if new_current != *baseline {
                            state.mark_updated(&name);
                            progress.emit(ProgressEvent::HubUpdated {
                                hub: name.clone(),
                                from: baseline.clone(),
                                to: new_current,
                            });
                        }
                    }
                    Err(e) => {
                        // Mid-reboot hubs drop connections; keep waiting.
                        debug!(hub = %name, error = %e, "version query failed, assuming hub is rebooting");
                    }
                }
            }

            if !state.is_complete() {
                progress.emit(ProgressEvent::PollProgress {
                    updated: state.success_count(),
                    in_progress: state.in_progress().count(),
                    total: state.total(),
                });
            }
        }

        if !state.is_complete() {
            let stuck: Vec<String> = state.in_progress().cloned().collect();
            warn!(hubs = ?stuck, "update polling exhausted");
            progress.emit(ProgressEvent::UpdateTimedOut { hubs: stuck.clone() });
            let detail = stuck
                .iter()
                .map(|name| {
                    let version = hubs
                        .iter()
                        .find(|h| h.label == *name)
                        .map(|h| h.current_version.as_str())
                        .unwrap_or_default();
                    format!("{name} (still at version {version})")
                })
                .collect::<Vec<_>>()
                .join(", ");
            return Err(CoreError::UpdateTimedOut { detail });
        }

        let success_summary = format!(
            "Successfully updated {} hub(s): {}",
            state.success_count(),
            state.updated().cloned().collect::<Vec<_>>().join(", ")
        );
        if state.failure_count() == 0 {
            Ok(success_summary)
        } else {
            let failure_summary = format!(
                "Failed to update {} hub(s): {}",
                state.failure_count(),
                state
                    .failed()
                    .map(|(name, reason)| format!("{name} ({reason})"))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            Err(CoreError::UpdateAggregate {
                failure_summary,
                success_summary,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_partition_the_total() {
        let mut state = UpdateProgress::new(["Den Hub".to_string(), "Attic Hub".into()]);
        assert_eq!(state.total(), 2);
        assert!(!state.is_complete());

        state.mark_updated("Den Hub");
        assert_eq!(state.success_count(), 1);
        assert_eq!(state.in_progress().count(), 1);
        assert!(!state.is_complete());

        state.mark_failed("Attic Hub", "trigger rejected");
        assert!(state.is_complete());
        assert_eq!(
            state.success_count() + state.failure_count() + state.in_progress().count(),
            state.total()
        );
    }

    #[test]
    fn marking_an_unknown_hub_is_a_no_op() {
        let mut state = UpdateProgress::new(["Den Hub".to_string()]);
        state.mark_updated("Garage Hub");
        assert_eq!(state.success_count(), 0);
        assert_eq!(state.in_progress().count(), 1);
    }

    #[test]
    fn a_hub_cannot_be_both_updated_and_failed() {
        let mut state = UpdateProgress::new(["Den Hub".to_string()]);
        state.mark_updated("Den Hub");
        state.mark_failed("Den Hub", "late error");
        assert_eq!(state.success_count(), 1);
        assert_eq!(state.failure_count(), 0);
    }
}
