// eWeLink cloud client
//
// Minimal client for the cloud account behind the Wi-Fi USB outlets that
// sit on hub power feeds. Only what the power-cycle sequence needs:
// login, find an outlet by its display name, and flip its switch.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// One device on the eWeLink account.
#[derive(Debug, Clone, Deserialize)]
pub struct EweLinkDevice {
    #[serde(rename = "deviceid")]
    pub device_id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    error: i64,
    #[serde(default)]
    msg: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct LoginData {
    at: String,
}

#[derive(Debug, Deserialize)]
struct ThingList {
    #[serde(rename = "thingList", default)]
    things: Vec<ThingItem>,
}

#[derive(Debug, Deserialize)]
struct ThingItem {
    #[serde(rename = "itemData")]
    item: EweLinkDevice,
}

/// Authenticated client for the eWeLink cloud.
///
/// Construction logs in; the access token lives for the process lifetime,
/// which matches how the client is used (attached to hubs once at
/// startup and then only for rare power cycles).
pub struct EweLinkClient {
    http: reqwest::Client,
    base_url: Url,
    access_token: SecretString,
}

impl EweLinkClient {
    /// Log in to the eWeLink cloud and return an authenticated client.
    pub async fn login(
        base_url: Url,
        email: &str,
        password: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let url = base_url.join("v2/user/login")?;
        debug!(email, "logging in to eWeLink cloud");

        let resp = http
            .post(url)
            .json(&json!({
                "email": email,
                "password": password.expose_secret(),
            }))
            .send()
            .await?;
        let envelope: Envelope<LoginData> = resp.json().await?;

        if envelope.error != 0 {
            return Err(Error::CloudAuthentication {
                message: envelope
                    .msg
                    .unwrap_or_else(|| format!("error code {}", envelope.error)),
            });
        }
        let data = envelope.data.ok_or(Error::CloudAuthentication {
            message: "login response carried no token".into(),
        })?;

        Ok(Self {
            http,
            base_url,
            access_token: SecretString::from(data.at),
        })
    }

    /// Find a device on the account by its display name.
    pub async fn find_device(&self, name: &str) -> Result<EweLinkDevice, Error> {
        let url = self.base_url.join("v2/device/thing")?;
        let resp = self
            .http
            .get(url)
            .bearer_auth(self.access_token.expose_secret())
            .send()
            .await?;
        let envelope: Envelope<ThingList> = resp.json().await?;
        let things = envelope.data.map(|d| d.things).unwrap_or_default();
        things
            .into_iter()
            .map(|t| t.item)
            .find(|d| d.name == name)
            .ok_or_else(|| Error::CloudDeviceNotFound { name: name.to_string() })
    }

    /// Switch a device on or off.
    pub async fn set_power(&self, device_id: &str, on: bool) -> Result<(), Error> {
        let url = self.base_url.join("v2/device/thing/status")?;
        let state = if on { "on" } else { "off" };
        debug!(device_id, state, "setting outlet power");

        let resp = self
            .http
            .post(url)
            .bearer_auth(self.access_token.expose_secret())
            .json(&json!({
                "type": 1,
                "id": device_id,
                "params": { "switch": state },
            }))
            .send()
            .await?;
        let envelope: Envelope<serde_json::Value> = resp.json().await?;

        if envelope.error == 0 {
            Ok(())
        } else {
            Err(Error::Status {
                status: 502,
                description: envelope
                    .msg
                    .unwrap_or_else(|| format!("eWeLink error code {}", envelope.error)),
            })
        }
    }
}
