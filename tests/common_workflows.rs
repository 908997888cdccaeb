//! Integration tests for common Wavius workflows.
//!
//! Settings file -> client or service -> mock provider.

use std::time::Duration;

use serde_json::json;
use wavius::prelude::*;
use wavius::{RetryPolicy, Validate};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_env_file(dir: &tempfile::TempDir, server: &MockServer) -> std::path::PathBuf {
    let file = dir.path().join(".env");
    std::fs::write(
        &file,
        format!(
            "WAVIUS_API_BASE_URL={}\n\
             WAVIUS_API_TOKEN=env-token\n\
             WAVIUS_DEFAULT_INSTANCE_ID=inst-env\n\
             WAVIUS_API_RETRY_ATTEMPTS=2\n\
             WAVIUS_API_RETRY_DELAY=5\n\
             WAVIUS_LOG_REQUESTS=yes\n",
            server.uri()
        ),
    )
    .unwrap();
    file
}

// =============================================================================
// Configuration -> Client
// =============================================================================

#[tokio::test]
async fn test_env_file_drives_client() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let settings = WaviusConfig::from_file(write_env_file(&dir, &server)).unwrap();
    settings.validate().unwrap();

    assert!(settings.logging.log_requests);
    assert_eq!(settings.api.retry_attempts, 2);

    let client = WaviusClient::from_settings(&settings).unwrap();
    assert_eq!(
        client.config().retry_policy(),
        RetryPolicy::fixed(2, Duration::from_millis(5))
    );

    Mock::given(method("GET"))
        .and(path("/v1/instances/inst-env/status"))
        .and(header("Authorization", "Bearer env-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"connected": true})))
        .expect(1)
        .mount(&server)
        .await;

    let status = client.get("/status").await.unwrap();
    assert_eq!(status["connected"], true);
}

#[tokio::test]
async fn test_token_rotation_between_requests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/instances"))
        .and(header("Authorization", "Bearer old-token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "expired"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/instances"))
        .and(header("Authorization", "Bearer new-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "inst-1"}])))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .base_url(server.uri())
        .token("old-token")
        .build();
    let mut client = WaviusClient::new(config).unwrap();

    let err = client.get("/instances").await.unwrap_err();
    assert!(err.is_api_error());
    assert_eq!(err.status_code(), Some(401));

    client.set_token("new-token");
    let instances = client.get("/instances").await.unwrap();
    assert_eq!(instances[0]["id"], "inst-1");
}

#[test]
fn test_instance_prefix_is_idempotent() {
    let config = ClientConfig::builder().instance_id("abc").build();
    let client = WaviusClient::new(config).unwrap();

    let first = client.resolve(&RequestSpec::get("/messages")).unwrap();
    assert_eq!(first.url.path(), "/v1/instances/abc/messages");

    let again = client
        .resolve(&RequestSpec::get("/instances/abc/messages"))
        .unwrap();
    assert_eq!(again.url.path(), first.url.path());
}

// =============================================================================
// Configuration -> Service
// =============================================================================

#[cfg(feature = "whatsapp")]
#[tokio::test]
async fn test_env_file_drives_service() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let settings = WaviusConfig::from_file(write_env_file(&dir, &server)).unwrap();
    let service = WaviusService::from_config(settings).unwrap();

    Mock::given(method("POST"))
        .and(path("/v1/instances/inst-env/messages/location"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "loc-1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/instances/inst-env/webhooks/wh%201"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let message = OutgoingMessage::location("1555", 40.7, -74.0).with_address("5th Ave");
    let sent = service.send(&message, None).await.unwrap();
    assert_eq!(sent["id"], "loc-1");

    let deleted = service
        .call(Call::new(Endpoint::DeleteWebhook).param("webhook_id", "wh 1"))
        .await
        .unwrap();
    assert_eq!(deleted, json!({}));
}

#[cfg(feature = "whatsapp")]
#[test]
fn test_every_endpoint_resolves_with_params() {
    for endpoint in Endpoint::ALL {
        let route = endpoint.route();
        let mut call = Call::new(*endpoint);
        for param in route.params() {
            call = call.param(param, "x");
        }
        let spec = call.to_request().unwrap();
        assert_eq!(spec.method, route.method);
        assert!(!spec.path.contains('{'));
    }
}
