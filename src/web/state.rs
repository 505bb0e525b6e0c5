//! Shared state for the web server.

use std::sync::Arc;
use std::time::Duration;

use super::store::{InMemoryRequestStore, RequestRepository};

/// Default timeout for proxied requests.
pub const DEFAULT_PROXY_TIMEOUT: Duration = Duration::from_secs(15);

/// Application state handed to every handler.
#[derive(Clone)]
pub struct WebAppState {
    requests: Arc<dyn RequestRepository>,
    http: reqwest::Client,
    proxy_timeout: Duration,
}

impl WebAppState {
    pub fn new(requests: Arc<dyn RequestRepository>, proxy_timeout: Duration) -> Self {
        Self {
            requests,
            http: reqwest::Client::new(),
            proxy_timeout,
        }
    }

    /// State with the seeded in-memory request store
    pub fn seeded(proxy_timeout: Duration) -> Self {
        Self::new(Arc::new(InMemoryRequestStore::seeded()), proxy_timeout)
    }

    pub fn requests(&self) -> &dyn RequestRepository {
        self.requests.as_ref()
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn proxy_timeout(&self) -> Duration {
        self.proxy_timeout
    }
}

impl Default for WebAppState {
    fn default() -> Self {
        Self::seeded(DEFAULT_PROXY_TIMEOUT)
    }
}
