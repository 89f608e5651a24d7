// ── Hub version tracking ──
//
// The Hub Information Driver exposes the running and available firmware
// versions as Maker API attributes; the hub's local management endpoint
// issues the bearer token the firmware trigger needs. This module owns
// both discoveries.

use hubmate_api::{maker::DeviceDetails, MakerClient, ManagementClient};
use tracing::{debug, info};

use crate::error::CoreError;
use crate::model::Hub;

/// Attribute names published by the Hub Information Driver.
const ATTR_LOCAL_IP: &str = "localIP";
const ATTR_CURRENT_VERSION: &str = "firmwareVersionString";
const ATTR_AVAILABLE_VERSION: &str = "hubUpdateVersion";

/// Fetches hub metadata through the Maker API and the hub-local
/// management endpoints.
pub struct VersionTracker<'a> {
    maker: &'a MakerClient,
    management: &'a ManagementClient,
}

impl<'a> VersionTracker<'a> {
    pub fn new(maker: &'a MakerClient, management: &'a ManagementClient) -> Self {
        Self { maker, management }
    }

    /// Fetch `(current, available)` firmware versions for a hub and
    /// record them on it.
    ///
    /// A missing attribute resolves to an empty string — hubs mid-boot
    /// publish partial attribute sets. A malformed body is a parse
    /// error carrying the endpoint and a body preview; network failures
    /// propagate unchanged.
    pub async fn refresh_versions(
        &self,
        hub: &mut Hub,
    ) -> Result<(String, String), hubmate_api::Error> {
        let details = self.maker.device_details(hub.id).await?;
        let current = named_or_empty(&details, ATTR_CURRENT_VERSION);
        let available = named_or_empty(&details, ATTR_AVAILABLE_VERSION);
        debug!(hub = %hub.label, %current, %available, "fetched hub versions");
        hub.current_version.clone_from(&current);
        hub.available_version.clone_from(&available);
        Ok((current, available))
    }

    /// Discover a hub's local IP and management token.
    ///
    /// Runs once at startup; the token is required by the firmware
    /// trigger, the IP by every hub-local call.
    pub async fn initialize(&self, hub: &mut Hub) -> Result<(), CoreError> {
        let details = self
            .maker
            .device_details(hub.id)
            .await
            .map_err(CoreError::Api)?;
        let ip = details
            .attribute(ATTR_LOCAL_IP)
            .ok_or_else(|| CoreError::HubInit {
                hub: hub.label.clone(),
                reason: format!("'{ATTR_LOCAL_IP}' attribute missing from hub metadata"),
            })?;

        let token = self.management.management_token(&ip).await?;
        info!(hub = %hub.label, %ip, "hub initialized");
        hub.ip = ip;
        hub.management_token = token;
        Ok(())
    }
}

fn named_or_empty(details: &DeviceDetails, name: &str) -> String {
    details.attribute(name).unwrap_or_default()
}
