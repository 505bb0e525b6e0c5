//! API-client send proxy.
//!
//! Forwards one HTTP request on behalf of the client and reports status,
//! timing and body. Failures to reach the target are reported in the body
//! with a 500 status.

use std::time::Instant;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use hyper::ext::ReasonPhrase;
use reqwest::Url;
use serde_json::Value;

use super::parse_payload;
use crate::web::error::WebError;
use crate::web::models::{
    parse_http_url, url_from_json, DraftError, HttpMethod, SendResponse,
};
use crate::web::state::WebAppState;

/// A validated proxy request.
#[derive(Debug)]
struct Outbound {
    method: HttpMethod,
    url: Url,
    body: Option<String>,
}

fn prepare(payload: &Value) -> Result<Outbound, DraftError> {
    let method = HttpMethod::from_json(payload.get("method"))?;
    let url = parse_http_url(url_from_json(payload.get("url"))?)?;

    let body = if method.carries_body() {
        payload.get("body").map(|body| match body {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
    } else {
        None
    };

    Ok(Outbound { method, url, body })
}

/// The upstream's own reason phrase, else the canonical one for its status
fn status_text(response: &reqwest::Response) -> String {
    response
        .extensions()
        .get::<ReasonPhrase>()
        .and_then(|reason| std::str::from_utf8(reason.as_bytes()).ok())
        .map(str::to_string)
        .unwrap_or_else(|| {
            response
                .status()
                .canonical_reason()
                .unwrap_or_default()
                .to_string()
        })
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

/// Send a request. Body: `{ method, url, body? }`.
pub async fn send_request(State(state): State<WebAppState>, body: Bytes) -> Response {
    let started = Instant::now();

    let outbound = match prepare(&parse_payload(&body)) {
        Ok(outbound) => outbound,
        Err(err) => return WebError::from(err).into_response(),
    };

    tracing::debug!(method = %outbound.method, url = %outbound.url, "Proxying request");

    let mut request = state
        .http()
        .request(outbound.method.into(), outbound.url)
        .header(header::CONTENT_TYPE, "application/json")
        .timeout(state.proxy_timeout());
    if let Some(body) = outbound.body {
        request = request.body(body);
    }

    let response = match request.send().await {
        Ok(response) => response,
        Err(err) => {
            let message = if err.is_timeout() {
                "Request timeout"
            } else {
                "Request failed"
            };
            tracing::warn!(error = %err, "Proxied request failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SendResponse::failed(message, elapsed_ms(started))),
            )
                .into_response();
        }
    };

    let status = response.status();
    let status_text = status_text(&response);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let is_json = content_type.contains("application/json");

    // An unreadable body is reported as empty
    let body = match response.bytes().await {
        Ok(bytes) if is_json => serde_json::from_slice::<Value>(&bytes)
            .ok()
            .and_then(|json| serde_json::to_string_pretty(&json).ok())
            .unwrap_or_default(),
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(err) => {
            tracing::debug!(error = %err, "Failed to read proxied response body");
            String::new()
        }
    };

    Json(SendResponse::completed(
        status.as_u16(),
        status_text,
        content_type,
        is_json,
        body,
        elapsed_ms(started),
    ))
    .into_response()
}
