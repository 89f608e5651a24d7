#![allow(clippy::unwrap_used)]
// Integration tests for `ManagementClient` using wiremock.

use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hubmate_api::{Error, ManagementClient};

fn host_of(server: &MockServer) -> String {
    server.uri().trim_start_matches("http://").to_string()
}

#[tokio::test]
async fn test_management_token_is_trimmed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/hub/advanced/getManagementToken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("abcd-1234\n"))
        .mount(&server)
        .await;

    let client = ManagementClient::with_client(reqwest::Client::new());
    let token = client.management_token(&host_of(&server)).await.unwrap();
    assert_eq!(token, "abcd-1234");
}

#[tokio::test]
async fn test_firmware_trigger_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/management/firmwareUpdate"))
        .and(query_param("token", "abcd-1234"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = ManagementClient::with_client(reqwest::Client::new());
    client
        .trigger_firmware_update(&host_of(&server), "abcd-1234")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_firmware_trigger_rejection_is_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/management/firmwareUpdate"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = ManagementClient::with_client(reqwest::Client::new());
    let result = client
        .trigger_firmware_update(&host_of(&server), "stale")
        .await;

    match result {
        Err(Error::Status { status, .. }) => assert_eq!(status, 401),
        other => panic!("expected Status error, got {other:?}"),
    }
}
