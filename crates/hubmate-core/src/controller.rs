// ── Controller abstraction ──
//
// The facade the front ends thread through their handlers: one Maker
// API client, one management client, one device-index snapshot, one
// hub list. The CLI builds a `ControllerConfig` and calls `connect`;
// everything else goes through methods here.

use std::sync::Arc;

use hubmate_api::maker::ModeInfo;
use hubmate_api::{EweLinkClient, MakerClient, ManagementClient, TransportConfig};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::ControllerConfig;
use crate::error::CoreError;
use crate::index::{DeviceIndex, DeviceRegistry};
use crate::model::{Device, DeviceKind, Hub, KindGroup};
use crate::power::{EweLinkOutlet, PowerCycleController};
use crate::progress::ProgressSink;
use crate::update::UpdateOrchestrator;
use crate::versions::VersionTracker;

/// The result of a device command: who answered, and with what.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    pub label: String,
    pub reply: String,
}

/// The main entry point for consumers.
pub struct HomeController {
    config: ControllerConfig,
    maker: MakerClient,
    management: ManagementClient,
    registry: DeviceRegistry,
    /// Populated lazily on first hub operation; hubs are mutated in
    /// place by version refreshes, so the list lives behind a lock.
    hubs: Mutex<Vec<Hub>>,
    ewelink: Option<Arc<EweLinkClient>>,
}

impl HomeController {
    /// Build the clients and, when configured, log in to the eWeLink
    /// cloud. Does NOT fetch devices -- call [`refresh`](Self::refresh)
    /// to populate the index.
    pub async fn connect(config: ControllerConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            timeout: config.timeout,
        };
        let maker = MakerClient::new(
            config.base_url.clone(),
            config.app_id.clone(),
            config.access_token.clone(),
            &transport,
        )?;
        let management = ManagementClient::new(&transport)?;

        let ewelink = match &config.ewelink {
            Some(creds) => {
                let client = EweLinkClient::login(
                    creds.base_url.clone(),
                    &creds.email,
                    &creds.password,
                    &transport,
                )
                .await?;
                info!("eWeLink power control available");
                Some(Arc::new(client))
            }
            None => None,
        };

        Ok(Self {
            config,
            maker,
            management,
            registry: DeviceRegistry::new(),
            hubs: Mutex::new(Vec::new()),
            ewelink,
        })
    }

    /// The current device-index snapshot.
    pub fn index(&self) -> Arc<DeviceIndex> {
        self.registry.load()
    }

    /// Refetch the device list and publish a fresh index snapshot.
    ///
    /// Returns `(device_count, warnings)`; warnings cover duplicate
    /// aliases and names the abbreviation engine could not shorten.
    pub async fn refresh(&self) -> Result<(usize, Vec<String>), CoreError> {
        let records = self.maker.list_devices().await?;
        let devices: Vec<Device> = records.iter().map(Device::from_record).collect();
        let (count, warnings) = self.registry.refresh(devices);
        debug!(count, warnings = warnings.len(), "device index refreshed");
        // The hub list is derived from the index; rebuild it next use.
        self.hubs.lock().await.clear();
        Ok((count, warnings))
    }

    // ── Device commands ──────────────────────────────────────────────

    /// Resolve `alias` and run `command` on it with `args`.
    pub async fn run_device_command(
        &self,
        alias: &str,
        command: &str,
        args: &[String],
    ) -> Result<CommandReply, CoreError> {
        let device = self.index().resolve(alias, command)?;
        let expected = device.supported_ops.get(command).copied().unwrap_or(0);
        if args.len() != expected {
            return Err(CoreError::ArityMismatch {
                command: command.to_string(),
                expected,
                got: args.len(),
            });
        }
        let reply = self.maker.device_command(device.id, command, args).await?;
        Ok(CommandReply {
            label: device.label.clone(),
            reply,
        })
    }

    /// Read one attribute of a device, e.g. `contact` of a sensor.
    pub async fn device_attribute(
        &self,
        alias: &str,
        attribute: &str,
    ) -> Result<CommandReply, CoreError> {
        let device = self.index().find(alias)?;
        let reply = self.maker.device_attribute(device.id, attribute).await?;
        Ok(CommandReply {
            label: device.label.clone(),
            reply,
        })
    }

    /// The kind-grouped device listing: every device with its accepted
    /// aliases, longest first.
    pub fn list_devices(&self) -> Vec<(KindGroup, Vec<(String, Vec<String>)>)> {
        self.index().by_group()
    }

    /// Labels of every contact sensor currently reporting `open`.
    ///
    /// A sensor that fails to answer is skipped with a warning rather
    /// than failing the whole sweep.
    pub async fn open_sensors(&self) -> Result<Vec<String>, CoreError> {
        let sensors = self.index().find_by_kind(DeviceKind::ContactSensor);
        let mut open = Vec::new();
        for sensor in sensors {
            match self.maker.device_attribute(sensor.id, "contact").await {
                Ok(value) if value == "open" => open.push(sensor.label.clone()),
                Ok(_) => {}
                Err(e) => warn!(sensor = %sensor.label, error = %e, "contact query failed, skipping"),
            }
        }
        Ok(open)
    }

    // ── Modes and safety monitor ─────────────────────────────────────

    /// All hub modes.
    pub async fn modes(&self) -> Result<Vec<ModeInfo>, CoreError> {
        Ok(self.maker.list_modes().await?)
    }

    /// The name of the currently active mode.
    pub async fn current_mode(&self) -> Result<String, CoreError> {
        self.modes()
            .await?
            .into_iter()
            .find(|m| m.active)
            .map(|m| m.name)
            .ok_or(CoreError::NoActiveMode)
    }

    /// Activate the mode named `name` (case-insensitive). Returns the
    /// mode's canonical name.
    pub async fn set_mode(&self, name: &str) -> Result<String, CoreError> {
        let mode = self
            .modes()
            .await?
            .into_iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| CoreError::ModeNotFound {
                name: name.to_string(),
            })?;
        self.maker.set_mode(mode.id).await?;
        Ok(mode.name)
    }

    /// Run a Safety Monitor command (e.g. `cancelAlerts`).
    pub async fn hsm_command(&self, command: &str) -> Result<String, CoreError> {
        Ok(self.maker.hsm_command(command).await?)
    }

    // ── Hub orchestration ────────────────────────────────────────────

    /// Update every hub that is behind and wait for the fleet to
    /// converge, reporting progress along the way.
    pub async fn update_hubs(&self, progress: &dyn ProgressSink) -> Result<String, CoreError> {
        let mut hubs = self.hubs.lock().await;
        self.ensure_hubs(&mut hubs).await?;
        let orchestrator =
            UpdateOrchestrator::new(&self.maker, &self.management, self.config.poll);
        orchestrator.update_with_polling(&mut hubs, progress).await
    }

    /// Power-cycle the hub behind `alias` through its smart plug.
    pub async fn deep_reboot(
        &self,
        alias: &str,
        progress: &dyn ProgressSink,
    ) -> Result<(), CoreError> {
        let device = self.index().find(alias)?;
        if device.kind != DeviceKind::Hub {
            return Err(CoreError::NotAHub {
                label: device.label.clone(),
            });
        }

        let hub = {
            let mut hubs = self.hubs.lock().await;
            self.ensure_hubs(&mut hubs).await?;
            hubs.iter()
                .find(|h| h.id == device.id)
                .cloned()
                .ok_or_else(|| CoreError::NotAHub {
                    label: device.label.clone(),
                })?
        };

        let controller = PowerCycleController::new(self.config.reboot);
        controller.deep_reboot(&hub, &self.maker, progress).await
    }

    /// The hubs known to the current index, with IP, management token,
    /// and power control discovered. Idempotent until the next refresh.
    pub async fn initialize_hubs(&self) -> Result<Vec<Hub>, CoreError> {
        let mut hubs = self.hubs.lock().await;
        self.ensure_hubs(&mut hubs).await?;
        Ok(hubs.clone())
    }

    /// Build the hub list from the index on first use: discover each
    /// hub's local IP and management token, then attach power control
    /// when an outlet with the hub's expected name exists.
    async fn ensure_hubs(&self, hubs: &mut Vec<Hub>) -> Result<(), CoreError> {
        if !hubs.is_empty() {
            return Ok(());
        }
        let tracker = VersionTracker::new(&self.maker, &self.management);
        for device in self.index().find_by_kind(DeviceKind::Hub) {
            let mut hub = Hub::new(device.id, device.label.clone());
            tracker.initialize(&mut hub).await?;

            if let Some(client) = &self.ewelink {
                match EweLinkOutlet::attach(Arc::clone(client), &hub.outlet_name()).await {
                    Ok(outlet) => hub.power_control = Some(Arc::new(outlet)),
                    Err(e) => {
                        warn!(hub = %hub.label, error = %e, "no power control for hub");
                    }
                }
            }
            hubs.push(hub);
        }
        info!(hubs = hubs.len(), "hub list initialized");
        Ok(())
    }
}
