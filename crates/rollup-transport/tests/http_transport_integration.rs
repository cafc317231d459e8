//! HttpTransport integration tests against a minimal HTTP endpoint.

mod common;
use common::mock_http::{HttpHandler, MockHttpServer};

use rollup_transport::{HttpConfig, HttpTransport, Transport, TransportError};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_http_request_round_trip() {
    let handler: HttpHandler = Arc::new(|request: &Value| {
        let body = json!({"jsonrpc": "2.0", "id": request["id"], "result": {"mainContract": "0x01"}});
        (200, body.to_string())
    });
    let server = MockHttpServer::start(handler).await;
    let transport = HttpTransport::new(server.url()).unwrap();

    let result = transport.request("contract_address", Value::Null).await.unwrap();
    assert_eq!(result, json!({"mainContract": "0x01"}));

    let requests = server.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["method"], "contract_address");
    assert_eq!(requests[0]["params"], Value::Null);
    assert_eq!(requests[0]["jsonrpc"], "2.0");
}

#[tokio::test]
async fn test_http_request_ids_increase() {
    let handler: HttpHandler = Arc::new(|request: &Value| {
        (200, json!({"jsonrpc": "2.0", "id": request["id"], "result": 1}).to_string())
    });
    let server = MockHttpServer::start(handler).await;
    let transport = HttpTransport::new(server.url()).unwrap();

    transport.request("tokens", Value::Null).await.unwrap();
    transport.request("tokens", Value::Null).await.unwrap();

    let requests = server.requests().await;
    let first = requests[0]["id"].as_u64().unwrap();
    let second = requests[1]["id"].as_u64().unwrap();
    assert!(second > first);
}

#[tokio::test]
async fn test_http_remote_error() {
    let handler: HttpHandler = Arc::new(|request: &Value| {
        let body = json!({
            "jsonrpc": "2.0",
            "id": request["id"],
            "error": {"code": -32601, "message": "Method not found"}
        });
        (200, body.to_string())
    });
    let server = MockHttpServer::start(handler).await;
    let transport = HttpTransport::new(server.url()).unwrap();

    let err = transport.request("nope", json!([])).await.unwrap_err();
    assert!(matches!(err, TransportError::Rpc { code: -32601, .. }));
}

#[tokio::test]
async fn test_http_status_failure() {
    let handler: HttpHandler = Arc::new(|_: &Value| (500, "internal".to_string()));
    let server = MockHttpServer::start(handler).await;
    let transport = HttpTransport::with_config(HttpConfig {
        url: server.url(),
        request_timeout: Some(Duration::from_secs(5)),
    })
    .unwrap();

    let err = transport.request("tokens", Value::Null).await.unwrap_err();
    match err {
        TransportError::Http(msg) => assert!(msg.contains("500"), "unexpected message: {msg}"),
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_http_malformed_body() {
    let handler: HttpHandler = Arc::new(|_: &Value| (200, "not json".to_string()));
    let server = MockHttpServer::start(handler).await;
    let transport = HttpTransport::new(server.url()).unwrap();

    let err = transport.request("tokens", Value::Null).await.unwrap_err();
    assert!(matches!(err, TransportError::ParseError(_)));
}
