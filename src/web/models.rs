//! Wire types shared by the web server and the HTTP client.

use std::fmt;
use std::str::FromStr;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Standard response envelope: `{ success, data?, count?, error? }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            count: None,
            error: None,
            message: None,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            count: None,
            error: None,
            message: Some(message.into()),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            count: None,
            error: Some(error.into()),
            message: None,
        }
    }
}

/// Validation failures for API-client input.
///
/// The display strings are the error messages returned to clients.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("Invalid method")]
    InvalidMethod,
    #[error("Invalid url")]
    InvalidUrl,
    #[error("URL parse failed")]
    UrlParse,
    #[error("Invalid JSON in request body")]
    InvalidJsonBody,
}

/// HTTP methods accepted by the API client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 4] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether a request body is forwarded for this method
    pub fn carries_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }

    /// Read the method out of an untyped JSON field
    pub fn from_json(value: Option<&Value>) -> Result<Self, DraftError> {
        value
            .and_then(Value::as_str)
            .ok_or(DraftError::InvalidMethod)?
            .parse()
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = DraftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or(DraftError::InvalidMethod)
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Read a non-empty url string out of an untyped JSON field
pub fn url_from_json(value: Option<&Value>) -> Result<&str, DraftError> {
    match value.and_then(Value::as_str) {
        Some(url) if !url.is_empty() => Ok(url),
        _ => Err(DraftError::InvalidUrl),
    }
}

/// Parse an absolute url of any scheme
pub fn parse_url(url: &str) -> Result<Url, DraftError> {
    Url::parse(url).map_err(|_| DraftError::UrlParse)
}

/// Parse an absolute http(s) url
pub fn parse_http_url(url: &str) -> Result<Url, DraftError> {
    let parsed = parse_url(url)?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        _ => Err(DraftError::UrlParse),
    }
}

/// A request saved in the API client sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRequest {
    pub id: u64,
    pub name: String,
    pub method: HttpMethod,
    pub url: String,
}

/// Body of `POST /api/api-client/requests`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSavedRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub method: HttpMethod,
    pub url: String,
}

/// Body of `POST /api/api-client/send`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendRequest {
    pub method: HttpMethod,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

/// Result of a proxied request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResponse {
    pub success: bool,
    pub status: u16,
    pub status_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_json: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

impl SendResponse {
    pub fn completed(
        status: u16,
        status_text: impl Into<String>,
        content_type: String,
        is_json: bool,
        body: String,
        elapsed_ms: u64,
    ) -> Self {
        Self {
            success: true,
            status,
            status_text: status_text.into(),
            content_type: Some(content_type),
            is_json: Some(is_json),
            body: Some(body),
            error: None,
            elapsed_ms,
        }
    }

    pub fn failed(error: impl Into<String>, elapsed_ms: u64) -> Self {
        Self {
            success: false,
            status: 0,
            status_text: "Error".to_string(),
            content_type: None,
            is_json: None,
            body: None,
            error: Some(error.into()),
            elapsed_ms,
        }
    }
}

/// Editable API-client form, validated before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDraft {
    pub method: String,
    pub url: String,
    pub body: String,
}

impl Default for RequestDraft {
    fn default() -> Self {
        Self {
            method: HttpMethod::Get.as_str().to_string(),
            url: "https://jsonplaceholder.typicode.com/users".to_string(),
            body: "{\n  \"title\": \"Test\",\n  \"body\": \"Content\",\n  \"userId\": 1\n}"
                .to_string(),
        }
    }
}

impl RequestDraft {
    pub fn from_saved(saved: &SavedRequest) -> Self {
        Self {
            method: saved.method.as_str().to_string(),
            url: saved.url.clone(),
            ..Self::default()
        }
    }

    /// Check the draft and build the proxy payload.
    ///
    /// The body is parsed as JSON only for methods that carry one; an empty
    /// body is sent as no body.
    pub fn validate(&self) -> Result<SendRequest, DraftError> {
        let method: HttpMethod = self.method.trim().parse()?;
        let url = self.url.trim();
        if url.is_empty() {
            return Err(DraftError::InvalidUrl);
        }
        parse_http_url(url)?;

        let body = if method.carries_body() && !self.body.trim().is_empty() {
            let parsed = serde_json::from_str(&self.body).map_err(|_| DraftError::InvalidJsonBody)?;
            Some(parsed)
        } else {
            None
        };

        Ok(SendRequest {
            method,
            url: url.to_string(),
            body,
        })
    }
}
