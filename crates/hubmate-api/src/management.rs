// Hub-local management endpoints
//
// These talk directly to a hub's IP, bypassing the Maker API app: the
// management token grant and the firmware-update trigger. Both are plain
// HTTP GETs against the hub's embedded web server.

use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Client for hub-local management endpoints.
///
/// Unlike [`MakerClient`](crate::MakerClient) this client is not bound to
/// a single hub: every call takes the target hub's `host` (IP or
/// `ip:port`), because a fleet of hubs shares one client.
pub struct ManagementClient {
    http: reqwest::Client,
}

impl ManagementClient {
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
        })
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Fetch a hub's management bearer token.
    ///
    /// `GET http://{host}/hub/advanced/getManagementToken` → token body
    pub async fn management_token(&self, host: &str) -> Result<String, Error> {
        let url = Url::parse(&format!("http://{host}/hub/advanced/getManagementToken"))?;
        debug!(host, "fetching management token");
        let body = self.http.get(url).send().await?.text().await?;
        Ok(body.trim().to_string())
    }

    /// Trigger a firmware update on a hub.
    ///
    /// `GET http://{host}/management/firmwareUpdate?token={token}`
    ///
    /// Any non-success status is an [`Error::Status`]; the caller decides
    /// whether that aborts a fleet-wide operation.
    pub async fn trigger_firmware_update(&self, host: &str, token: &str) -> Result<(), Error> {
        let mut url = Url::parse(&format!("http://{host}/management/firmwareUpdate"))?;
        url.query_pairs_mut().append_pair("token", token);
        debug!(host, "triggering firmware update");
        let status = self.http.get(url).send().await?.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::Status {
                status: status.as_u16(),
                description: status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string(),
            })
        }
    }
}
