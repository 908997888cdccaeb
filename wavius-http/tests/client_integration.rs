//! End-to-end client tests against a mock Wavius server.

use std::time::Duration;

use serde_json::json;
use wavius_http::{ClientConfig, Error, RequestSpec, TransportError, WaviusClient};
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::builder()
        .base_url(server.uri())
        .retry_delay(Duration::from_millis(10))
        .build()
}

#[tokio::test]
async fn test_post_sends_bearer_token_and_instance_prefix() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/instances/inst-1/messages/chat"))
        .and(header("Authorization", "Bearer abc"))
        .and(header("Accept", "application/json"))
        .and(body_json(json!({"to": "15551234567", "message": "hi"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "m1", "status": "queued"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::builder()
        .base_url(server.uri())
        .token("abc")
        .instance_id("inst-1")
        .build();
    let client = WaviusClient::new(config).unwrap();

    let result = client
        .post(
            "/messages/chat",
            &json!({"to": "15551234567", "message": "hi"}),
        )
        .await
        .unwrap();

    assert_eq!(result["id"], "m1");
}

#[tokio::test]
async fn test_no_auth_header_without_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/instances"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = WaviusClient::new(config_for(&server)).unwrap();
    let result = client.get("/instances").await.unwrap();
    assert_eq!(result, json!([]));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_get_payload_goes_to_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/chats"))
        .and(query_param("limit", "20"))
        .and(query_param("archived", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = WaviusClient::new(config_for(&server)).unwrap();
    let result = client
        .get_with_query("/chats", &json!({"limit": 20, "archived": false}))
        .await
        .unwrap();

    assert_eq!(result, json!({"data": []}));
    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn test_error_status_is_api_error_and_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/instances/missing/status"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "not found"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = WaviusClient::new(config_for(&server)).unwrap();
    let err = client.get("/instances/missing/status").await.unwrap_err();

    match err {
        Error::Api(api) => {
            assert_eq!(api.status, 404);
            assert_eq!(api.message, "not found");
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_without_message_uses_body() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/contacts/block"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal failure"))
        .expect(1)
        .mount(&server)
        .await;

    let client = WaviusClient::new(config_for(&server)).unwrap();
    let err = client
        .delete_with_body("/contacts/block", &json!({"phone": "1555"}))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(500));
    assert_eq!(
        err.to_string(),
        "Wavius API error: 500 - internal failure"
    );
}

#[tokio::test]
async fn test_empty_success_body_decodes_to_empty_object() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/instances/inst-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = WaviusClient::new(config_for(&server)).unwrap();
    let result = client.delete("/instances/inst-1").await.unwrap();
    assert_eq!(result, json!({}));
}

#[tokio::test]
async fn test_per_call_instance_override_is_not_sticky() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/instances/other/contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"scope": "other"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/instances/default/contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"scope": "default"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.instance_id = Some("default".to_string());
    let client = WaviusClient::new(config).unwrap();

    let scoped = client
        .send(&RequestSpec::get("/contacts").instance("other"))
        .await
        .unwrap();
    assert_eq!(scoped["scope"], "other");

    let unscoped = client.get("/contacts").await.unwrap();
    assert_eq!(unscoped["scope"], "default");
    assert_eq!(client.instance_id(), Some("default"));
}

#[tokio::test]
async fn test_upload_sends_multipart() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/media/upload"))
        .and(body_string_contains("filename=\"photo.jpg\""))
        .and(body_string_contains("name=\"caption\""))
        .and(body_string_contains("hello there"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"media_id": "md-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("photo.jpg");
    std::fs::write(&file, b"fake-jpeg").unwrap();

    let client = WaviusClient::new(config_for(&server)).unwrap();
    let result = client
        .upload("/media/upload", &file, &json!({"caption": "hello there"}))
        .await
        .unwrap();

    assert_eq!(result["media_id"], "md-1");

    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data"));
}

#[tokio::test]
async fn test_upload_missing_file_is_io_error() {
    let server = MockServer::start().await;
    let client = WaviusClient::new(config_for(&server)).unwrap();

    let err = client
        .upload("/media/upload", "/definitely/not/here.png", &json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Io(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_connection_failure_exhausts_retries() {
    // Nothing listens on the discard port.
    let config = ClientConfig::builder()
        .base_url("http://127.0.0.1:9")
        .retry_attempts(2)
        .retry_delay(Duration::from_millis(10))
        .timeout(Duration::from_secs(5))
        .build();
    let client = WaviusClient::new(config).unwrap();

    let err = client.get("/instances").await.unwrap_err();
    match err {
        Error::Transport(TransportError::Connection(_)) | Error::Transport(TransportError::Timeout(_)) => {}
        other => panic!("expected transport error, got {:?}", other),
    }
}
