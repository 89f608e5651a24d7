// Maker API HTTP client
//
// Wraps `reqwest::Client` with Hubitat-specific URL construction and the
// `access_token` query parameter every Maker API call carries. Command
// endpoints report the HTTP status line's textual description ("OK" on
// success) because that is what the Maker API surfaces to users.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// One record of the Maker API device list.
///
/// The payload only carries identity; supported operations and attributes
/// are fixed by the driver type, not transmitted.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceRecord {
    #[serde(deserialize_with = "flexible_id")]
    pub id: i64,
    pub label: String,
    #[serde(rename = "type")]
    pub driver: String,
}

/// One entry of a device-details `attributes` array.
#[derive(Debug, Clone, Deserialize)]
pub struct AttributeEntry {
    pub name: String,
    #[serde(rename = "currentValue", default)]
    pub current_value: Option<Value>,
}

/// Full device details as returned by `GET .../devices/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceDetails {
    #[serde(default)]
    pub attributes: Vec<AttributeEntry>,
}

impl DeviceDetails {
    /// Look up an attribute's current value by name, rendered as a string.
    ///
    /// Returns `None` when the named entry is absent or null.
    pub fn attribute(&self, name: &str) -> Option<String> {
        let value = self
            .attributes
            .iter()
            .find(|a| a.name == name)?
            .current_value
            .as_ref()?;
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// One hub mode as returned by `GET .../modes`.
#[derive(Debug, Clone, Deserialize)]
pub struct ModeInfo {
    #[serde(deserialize_with = "flexible_id")]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub active: bool,
}

/// The Maker API serves ids as strings in some firmware generations and
/// as numbers in others; accept both.
fn flexible_id<'de, D: Deserializer<'de>>(de: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(i64),
        Str(String),
    }
    match Raw::deserialize(de)? {
        Raw::Num(n) => Ok(n),
        Raw::Str(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

/// Raw HTTP client for the Hubitat Maker API.
///
/// Handles site URL construction (`http://{hub}/apps/api/{app_id}/...`)
/// and the `access_token` query parameter. Higher-level semantics
/// (alias resolution, orchestration) live in `hubmate-core`.
pub struct MakerClient {
    http: reqwest::Client,
    base_url: Url,
    app_id: String,
    access_token: SecretString,
}

impl MakerClient {
    /// Create a new Maker API client from a `TransportConfig`.
    ///
    /// `base_url` is the hub root (e.g. `http://hubitat.local`).
    pub fn new(
        base_url: Url,
        app_id: String,
        access_token: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            app_id,
            access_token,
        })
    }

    /// Create a Maker API client with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        app_id: String,
        access_token: SecretString,
    ) -> Self {
        Self {
            http,
            base_url,
            app_id,
            access_token,
        }
    }

    /// The hub base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for an app-scoped Maker API path:
    /// `{base}/apps/api/{app_id}/{path}`
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let url = self
            .base_url
            .join(&format!("apps/api/{}/{}", self.app_id, path))?;
        Ok(url)
    }

    fn with_token(&self, mut url: Url) -> Url {
        url.query_pairs_mut()
            .append_pair("access_token", self.access_token.expose_secret());
        url
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn get(&self, url: Url) -> Result<reqwest::Response, Error> {
        debug!("GET {}", url.path());
        self.http
            .get(self.with_token(url))
            .send()
            .await
            .map_err(Error::Transport)
    }

    /// GET a Maker API path and parse its JSON body, mapping malformed
    /// bodies to [`Error::Parse`] with the endpoint and a preview.
    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.api_url(path)?;
        let endpoint = url.to_string();
        let body = self.get(url).await?.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::parse(endpoint, e.to_string(), &body))
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// List all devices exposed through the Maker API app.
    ///
    /// `GET /apps/api/{app_id}/devices`
    pub async fn list_devices(&self) -> Result<Vec<DeviceRecord>, Error> {
        debug!("listing devices");
        self.get_json("devices").await
    }

    /// Fetch full details (including the attributes array) for one device.
    ///
    /// `GET /apps/api/{app_id}/devices/{id}`
    pub async fn device_details(&self, device_id: i64) -> Result<DeviceDetails, Error> {
        self.get_json(&format!("devices/{device_id}")).await
    }

    /// Run a command on a device, with positional arguments appended as
    /// path segments.
    ///
    /// `GET /apps/api/{app_id}/devices/{id}/{command}[/{arg}...]`
    ///
    /// Returns the HTTP status line's textual description — `"OK"` means
    /// the hub accepted the command. Non-success statuses are reported
    /// through the same string, not as errors; only transport failures
    /// error out.
    pub async fn device_command(
        &self,
        device_id: i64,
        command: &str,
        args: &[String],
    ) -> Result<String, Error> {
        let mut path = format!("devices/{device_id}/{command}");
        for arg in args {
            path.push('/');
            path.push_str(arg);
        }
        debug!(device_id, command, "running device command");
        let resp = self.get(self.api_url(&path)?).await?;
        Ok(status_description(resp.status()))
    }

    /// Read a single attribute's value from a device.
    ///
    /// `GET /apps/api/{app_id}/devices/{id}/attribute/{name}` → `{"value": ...}`
    pub async fn device_attribute(&self, device_id: i64, name: &str) -> Result<String, Error> {
        let url = self.api_url(&format!("devices/{device_id}/attribute/{name}"))?;
        let endpoint = url.to_string();
        let body = self.get(url).await?.text().await?;
        let json: Value = serde_json::from_str(&body)
            .map_err(|e| Error::parse(&endpoint, e.to_string(), &body))?;
        match json.get("value") {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Null) | None => Ok("Unknown".into()),
            Some(other) => Ok(other.to_string()),
        }
    }

    /// List all hub modes.
    ///
    /// `GET /apps/api/{app_id}/modes`
    pub async fn list_modes(&self) -> Result<Vec<ModeInfo>, Error> {
        self.get_json("modes").await
    }

    /// Activate a mode by id. The Maker API uses GET for all commands.
    ///
    /// `GET /apps/api/{app_id}/modes/{id}`
    pub async fn set_mode(&self, mode_id: i64) -> Result<(), Error> {
        let resp = self.get(self.api_url(&format!("modes/{mode_id}"))?).await?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::Status {
                status: status.as_u16(),
                description: status_description(status),
            })
        }
    }

    /// Run a command on Hubitat Safety Monitor (e.g. `cancelAlerts`).
    ///
    /// `GET /apps/api/{app_id}/hsm/{command}`
    pub async fn hsm_command(&self, command: &str) -> Result<String, Error> {
        debug!(command, "running HSM command");
        let resp = self.get(self.api_url(&format!("hsm/{command}"))?).await?;
        Ok(status_description(resp.status()))
    }
}

/// The textual description of an HTTP status line ("OK", "Not Found"...).
fn status_description(status: reqwest::StatusCode) -> String {
    status
        .canonical_reason()
        .map_or_else(|| status.as_u16().to_string(), str::to_string)
}
