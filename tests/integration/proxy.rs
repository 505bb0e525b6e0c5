//! Integration tests for the saved-request API and the send proxy

use std::time::Duration;

use super::common::spawn_server;
use editor_shell::web::models::{HttpMethod, NewSavedRequest, SendRequest};
use editor_shell::{ApiClient, ClientError, Config};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn client(base_url: String) -> ApiClient {
    ApiClient::new(base_url, Duration::from_secs(5))
}

#[tokio::test]
async fn test_saved_request_lifecycle() {
    let server = spawn_server(Duration::from_secs(5)).await;
    let api = client(server.base_url());

    let seeded = api.list_requests().await.unwrap();
    let names: Vec<&str> = seeded.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Get Users", "Get Todos", "Create Post"]);

    let saved = api
        .save_request(&NewSavedRequest {
            name: None,
            method: HttpMethod::Put,
            url: "https://example.test/items/7?x=1".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(saved.name, "PUT /items/7");
    assert_eq!(api.list_requests().await.unwrap()[0], saved);

    let removed = api.delete_request(saved.id).await.unwrap();
    assert_eq!(removed, saved);

    match api.delete_request(saved.id).await {
        Err(ClientError::Http { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Request not found");
        }
        other => panic!("expected 404, got {:?}", other),
    }

    api.clear_requests().await.unwrap();
    assert!(api.list_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_send_proxies_json() {
    let server = spawn_server(Duration::from_secs(5)).await;
    let api = client(server.base_url());

    let response = api
        .send(&SendRequest {
            method: HttpMethod::Get,
            url: format!("{}/api/health", server.base_url()),
            body: None,
        })
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.status, 200);
    assert_eq!(response.is_json, Some(true));
    let body: serde_json::Value = serde_json::from_str(response.body.as_deref().unwrap()).unwrap();
    assert_eq!(body["count"], json!(6));
}

#[tokio::test]
async fn test_send_reports_unreachable_target() {
    let server = spawn_server(Duration::from_secs(5)).await;
    let api = client(server.base_url());

    // Nothing listens on the discard port
    let response = api
        .send(&SendRequest {
            method: HttpMethod::Get,
            url: "http://127.0.0.1:9/".to_string(),
            body: None,
        })
        .await
        .unwrap();

    assert!(!response.success);
    assert_eq!(response.status, 0);
    assert_eq!(response.status_text, "Error");
    assert_eq!(response.error.as_deref(), Some("Request failed"));
}

#[tokio::test]
async fn test_send_rejects_non_http_url() {
    let server = spawn_server(Duration::from_secs(5)).await;
    let api = client(server.base_url());

    let err = api
        .send(&SendRequest {
            method: HttpMethod::Get,
            url: "ftp://example.test/file".to_string(),
            body: None,
        })
        .await
        .unwrap_err();
    match err {
        ClientError::Http { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "URL parse failed");
        }
        other => panic!("expected 400, got {:?}", other),
    }
}

/// Accepts connections and never answers
async fn spawn_silent_upstream() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{}/slow", addr)
}

#[tokio::test]
async fn test_send_reports_upstream_timeout() {
    let mut config = Config::default();
    config.proxy_timeout = Duration::from_secs(1);

    let server = spawn_server(config.proxy_timeout).await;
    let api = ApiClient::new(server.base_url(), config.client_timeout());
    let upstream = spawn_silent_upstream().await;

    let response = api
        .send(&SendRequest {
            method: HttpMethod::Get,
            url: upstream,
            body: None,
        })
        .await
        .unwrap();

    assert!(!response.success);
    assert_eq!(response.status, 0);
    assert_eq!(response.status_text, "Error");
    assert_eq!(response.error.as_deref(), Some("Request timeout"));
    assert!(response.elapsed_ms >= 1000);
}

/// Answers every request with a fixed raw HTTP/1.1 response
async fn spawn_raw_upstream(response: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });
    format!("http://{}/custom", addr)
}

#[tokio::test]
async fn test_send_forwards_upstream_reason_phrase() {
    let server = spawn_server(Duration::from_secs(5)).await;
    let api = client(server.base_url());
    let upstream = spawn_raw_upstream(
        "HTTP/1.1 200 All Good\r\nContent-Type: text/plain\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok",
    )
    .await;

    let response = api
        .send(&SendRequest {
            method: HttpMethod::Get,
            url: upstream,
            body: None,
        })
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.status, 200);
    assert_eq!(response.status_text, "All Good");
    assert_eq!(response.body.as_deref(), Some("ok"));
    assert_eq!(response.is_json, Some(false));
}
