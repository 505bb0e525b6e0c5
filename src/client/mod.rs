//! Typed HTTP client for the envelope API and the API-client endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::ui::poller::SnapshotSource;
use crate::web::models::{ApiEnvelope, NewSavedRequest, SavedRequest, SendRequest, SendResponse};

const REQUESTS_PATH: &str = "/api/api-client/requests";
const SEND_PATH: &str = "/api/api-client/send";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Request unsuccessful: {0}")]
    Unsuccessful(String),
}

/// Client for an editor-shell API server.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client; every request carries `timeout`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "Failed to build HTTP client, using defaults");
                reqwest::Client::new()
            });

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-2xx response into [`ClientError::Http`], using the
    /// envelope's error message when there is one
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let bytes = response.bytes().await?;
        let message = serde_json::from_slice::<ApiEnvelope<Value>>(&bytes)
            .ok()
            .and_then(|envelope| envelope.error)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string());

        Err(ClientError::Http {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Fetch an envelope from `path`
    pub async fn get_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<ApiEnvelope<T>, ClientError> {
        let response = self.http.get(self.url(path)).send().await?;
        Self::decode(Self::check(response).await?).await
    }

    /// Unwrap a successful envelope's data
    fn into_data<T>(envelope: ApiEnvelope<T>) -> Result<Option<T>, ClientError> {
        if envelope.success {
            Ok(envelope.data)
        } else {
            Err(ClientError::Unsuccessful(
                envelope.error.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }

    fn require<T>(data: Option<T>) -> Result<T, ClientError> {
        data.ok_or_else(|| ClientError::Unsuccessful("response carried no data".to_string()))
    }

    pub async fn list_requests(&self) -> Result<Vec<SavedRequest>, ClientError> {
        let envelope = self.get_envelope(REQUESTS_PATH).await?;
        Ok(Self::into_data(envelope)?.unwrap_or_default())
    }

    pub async fn save_request(&self, request: &NewSavedRequest) -> Result<SavedRequest, ClientError> {
        let response = self
            .http
            .post(self.url(REQUESTS_PATH))
            .json(request)
            .send()
            .await?;
        let envelope: ApiEnvelope<SavedRequest> = Self::decode(Self::check(response).await?).await?;
        Self::require(Self::into_data(envelope)?)
    }

    pub async fn delete_request(&self, id: u64) -> Result<SavedRequest, ClientError> {
        let response = self
            .http
            .delete(self.url(REQUESTS_PATH))
            .query(&[("id", id)])
            .send()
            .await?;
        let envelope: ApiEnvelope<SavedRequest> = Self::decode(Self::check(response).await?).await?;
        Self::require(Self::into_data(envelope)?)
    }

    /// Remove every saved request, returning the server's message
    pub async fn clear_requests(&self) -> Result<String, ClientError> {
        let response = self.http.delete(self.url(REQUESTS_PATH)).send().await?;
        let envelope: ApiEnvelope<Value> = Self::decode(Self::check(response).await?).await?;
        let message = envelope.message.clone().unwrap_or_default();
        Self::into_data(envelope)?;
        Ok(message)
    }

    /// Send a request through the proxy.
    ///
    /// Upstream failures come back as `Ok` with `success == false`; only
    /// rejected input and transport problems are errors.
    pub async fn send(&self, request: &SendRequest) -> Result<SendResponse, ClientError> {
        let response = self
            .http
            .post(self.url(SEND_PATH))
            .json(request)
            .send()
            .await?;

        if response.status() == StatusCode::INTERNAL_SERVER_ERROR {
            return Self::decode(response).await;
        }
        Self::decode(Self::check(response).await?).await
    }
}

#[async_trait]
impl SnapshotSource for ApiClient {
    async fn fetch(&self, endpoint: &str) -> Result<ApiEnvelope<Value>, ClientError> {
        self.get_envelope(endpoint).await
    }
}
