#![allow(clippy::unwrap_used)]
// Integration tests for `MakerClient` using wiremock.

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hubmate_api::{Error, MakerClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, MakerClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = MakerClient::with_client(
        reqwest::Client::new(),
        base_url,
        "77".into(),
        SecretString::from("maker-token"),
    );
    (server, client)
}

// ── Device list ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices() {
    let (server, client) = setup().await;

    let body = json!([
        { "id": "34", "label": "Kitchen Light", "type": "Virtual Switch" },
        { "id": 35, "label": "Den Hub", "type": "Hub Information Driver v3" }
    ]);

    Mock::given(method("GET"))
        .and(path("/apps/api/77/devices"))
        .and(query_param("access_token", "maker-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let devices = client.list_devices().await.unwrap();

    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].id, 34);
    assert_eq!(devices[0].label, "Kitchen Light");
    assert_eq!(devices[1].driver, "Hub Information Driver v3");
}

#[tokio::test]
async fn test_list_devices_malformed_body_is_parse_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/apps/api/77/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login page</html>"))
        .mount(&server)
        .await;

    let result = client.list_devices().await;

    match result {
        Err(Error::Parse { endpoint, preview, .. }) => {
            assert!(endpoint.contains("/apps/api/77/devices"));
            assert_eq!(preview, "<html>login page</html>");
        }
        other => panic!("expected Parse error, got {other:?}"),
    }
}

// ── Device commands ─────────────────────────────────────────────────

#[tokio::test]
async fn test_device_command_returns_status_description() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/apps/api/77/devices/34/on"))
        .and(query_param("access_token", "maker-token"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let result = client.device_command(34, "on", &[]).await.unwrap();
    assert_eq!(result, "OK");
}

#[tokio::test]
async fn test_device_command_args_become_path_segments() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/apps/api/77/devices/34/setLevel/50"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let result = client
        .device_command(34, "setLevel", &["50".into()])
        .await
        .unwrap();
    assert_eq!(result, "OK");
}

#[tokio::test]
async fn test_device_command_failure_surfaces_description_not_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/apps/api/77/devices/34/on"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    // The status line description is the user-visible result; a 500 is
    // still an Ok(...) at this layer.
    let result = client.device_command(34, "on", &[]).await.unwrap();
    assert_eq!(result, "Internal Server Error");
}

// ── Attributes ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_device_attribute_value() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/apps/api/77/devices/12/attribute/contact"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "contact",
            "value": "open"
        })))
        .mount(&server)
        .await;

    let value = client.device_attribute(12, "contact").await.unwrap();
    assert_eq!(value, "open");
}

#[tokio::test]
async fn test_device_attribute_missing_value_is_unknown() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/apps/api/77/devices/12/attribute/contact"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "contact" })))
        .mount(&server)
        .await;

    let value = client.device_attribute(12, "contact").await.unwrap();
    assert_eq!(value, "Unknown");
}

// ── Device details ──────────────────────────────────────────────────

#[tokio::test]
async fn test_device_details_attributes() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/apps/api/77/devices/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "9",
            "label": "Den Hub",
            "attributes": [
                { "name": "localIP", "currentValue": "192.168.7.2" },
                { "name": "firmwareVersionString", "currentValue": "2.3.9.150" },
                { "name": "hubUpdateVersion", "currentValue": "2.3.9.158" }
            ]
        })))
        .mount(&server)
        .await;

    let details = client.device_details(9).await.unwrap();
    assert_eq!(details.attribute("localIP").as_deref(), Some("192.168.7.2"));
    assert_eq!(
        details.attribute("firmwareVersionString").as_deref(),
        Some("2.3.9.150")
    );
    assert_eq!(details.attribute("missing"), None);
}

// ── Modes & HSM ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_and_set_modes() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/apps/api/77/modes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Day", "active": false },
            { "id": 2, "name": "Night", "active": true }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/apps/api/77/modes/1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let modes = client.list_modes().await.unwrap();
    assert_eq!(modes.len(), 2);
    assert!(modes[1].active);

    client.set_mode(1).await.unwrap();
}

#[tokio::test]
async fn test_hsm_command() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/apps/api/77/hsm/cancelAlerts"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let result = client.hsm_command("cancelAlerts").await.unwrap();
    assert_eq!(result, "OK");
}
