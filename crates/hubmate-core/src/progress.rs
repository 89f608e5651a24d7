// ── Ordered progress events ──
//
// Orchestrations report every state transition through a `ProgressSink`.
// Delivery is synchronous and in transition order, each event at most
// once; a sink must not panic (there is nothing sensible an
// orchestration mid-power-cut could do about it).

use std::fmt;

/// One orchestration state transition, rendered for humans via `Display`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    // ── Firmware update ─────────────────────────────────────────────
    AllUpToDate,
    UpdatePlanned { hubs: Vec<String> },
    UpdateTriggered { hub: String },
    HubUpdated { hub: String, from: String, to: String },
    PollProgress { updated: usize, in_progress: usize, total: usize },
    UpdateTimedOut { hubs: Vec<String> },

    // ── Deep reboot ─────────────────────────────────────────────────
    ShutdownInitiated { hub: String },
    WaitingForShutdown { seconds: u64 },
    CuttingPower { hub: String },
    WaitingPoweredOff { seconds: u64 },
    RestoringPower { hub: String, attempt: u32, max: u32 },
    RestoreRetryScheduled { reason: String, seconds: u64 },
    SequenceCompleted { hub: String },
    SequenceFailed { hub: String, reason: String },
    EmergencyRestoreStarted,
    EmergencyRestoreSucceeded,
    EmergencyRestoreFailed { reason: String },
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllUpToDate => write!(f, "All hubs are already up to date"),
            Self::UpdatePlanned { hubs } => {
                write!(f, "Hubs needing update: {}", hubs.join(", "))
            }
            Self::UpdateTriggered { hub } => write!(f, "Update initiated for hub {hub}"),
            Self::HubUpdated { hub, from, to } => {
                write!(f, "Hub {hub} updated from {from} to {to}")
            }
            Self::PollProgress { updated, in_progress, total } => write!(
                f,
                "Progress: {updated}/{total} updated, {in_progress} in progress"
            ),
            Self::UpdateTimedOut { hubs } => write!(
                f,
                "Timeout: the following hubs did not complete update: {}",
                hubs.join(", ")
            ),
            Self::ShutdownInitiated { hub } => {
                write!(f, "Initiating graceful shutdown of {hub}")
            }
            Self::WaitingForShutdown { seconds } => {
                write!(f, "Hub shutting down, waiting {seconds} seconds...")
            }
            Self::CuttingPower { hub } => write!(f, "Cutting power to hub {hub}"),
            Self::WaitingPoweredOff { seconds } => write!(
                f,
                "Waiting {seconds} seconds with power off to ensure complete reset..."
            ),
            Self::RestoringPower { hub, attempt: 1, .. } => {
                write!(f, "Restoring power to hub {hub}")
            }
            Self::RestoringPower { hub, attempt, max } => write!(
                f,
                "Retry {}/{max}: attempting to restore power to hub {hub}",
                attempt - 1
            ),
            Self::RestoreRetryScheduled { reason, seconds } => write!(
                f,
                "Power restoration attempt failed: {reason}. Retrying in {seconds} seconds..."
            ),
            Self::SequenceCompleted { hub } => write!(
                f,
                "Deep reboot of {hub} completed. The hub will now begin its boot process."
            ),
            Self::SequenceFailed { hub, reason } => {
                write!(f, "Deep reboot of {hub} failed: {reason}")
            }
            Self::EmergencyRestoreStarted => {
                write!(f, "Attempting emergency power restoration...")
            }
            Self::EmergencyRestoreSucceeded => {
                write!(f, "Emergency power restoration successful")
            }
            Self::EmergencyRestoreFailed { reason } => {
                write!(f, "Emergency power restoration also failed: {reason}")
            }
        }
    }
}

/// Ordered, synchronous event sink for orchestration progress.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

/// Any non-capturing-or-`Sync` closure is a sink.
impl<F> ProgressSink for F
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    fn emit(&self, event: ProgressEvent) {
        self(event);
    }
}

/// A sink that drops every event, for callers that don't care.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _event: ProgressEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restore_attempt_wording_matches_attempt_number() {
        let first = ProgressEvent::RestoringPower {
            hub: "Den Hub".into(),
            attempt: 1,
            max: 3,
        };
        assert_eq!(first.to_string(), "Restoring power to hub Den Hub");

        let second = ProgressEvent::RestoringPower {
            hub: "Den Hub".into(),
            attempt: 2,
            max: 3,
        };
        assert_eq!(
            second.to_string(),
            "Retry 1/3: attempting to restore power to hub Den Hub"
        );
    }

    #[test]
    fn update_events_render_versions() {
        let event = ProgressEvent::HubUpdated {
            hub: "Den Hub".into(),
            from: "2.3.9.150".into(),
            to: "2.3.9.158".into(),
        };
        assert_eq!(
            event.to_string(),
            "Hub Den Hub updated from 2.3.9.150 to 2.3.9.158"
        );
    }
}
