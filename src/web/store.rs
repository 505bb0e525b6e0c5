//! Saved-request repository backing the API client endpoints.

use chrono::Utc;
use parking_lot::RwLock;

use super::models::{HttpMethod, SavedRequest};

/// Storage for saved API-client requests.
pub trait RequestRepository: Send + Sync {
    /// All requests, newest first.
    fn list(&self) -> Vec<SavedRequest>;

    /// Store a new request at the front of the list.
    fn insert(&self, name: String, method: HttpMethod, url: String) -> SavedRequest;

    /// Remove one request by id.
    fn remove(&self, id: u64) -> Option<SavedRequest>;

    /// Remove everything, returning how many requests were dropped.
    fn clear(&self) -> usize;
}

#[derive(Debug)]
struct Inner {
    requests: Vec<SavedRequest>,
    last_id: u64,
}

/// Process-lifetime request store.
#[derive(Debug)]
pub struct InMemoryRequestStore {
    inner: RwLock<Inner>,
}

impl Default for InMemoryRequestStore {
    fn default() -> Self {
        Self::seeded()
    }
}

impl InMemoryRequestStore {
    /// A store holding the three sample requests
    pub fn seeded() -> Self {
        let requests = vec![
            SavedRequest {
                id: 1,
                name: "Get Users".to_string(),
                method: HttpMethod::Get,
                url: "https://jsonplaceholder.typicode.com/users".to_string(),
            },
            SavedRequest {
                id: 2,
                name: "Get Todos".to_string(),
                method: HttpMethod::Get,
                url: "https://jsonplaceholder.typicode.com/todos".to_string(),
            },
            SavedRequest {
                id: 3,
                name: "Create Post".to_string(),
                method: HttpMethod::Post,
                url: "https://jsonplaceholder.typicode.com/posts".to_string(),
            },
        ];
        Self::with_requests(requests)
    }

    pub fn empty() -> Self {
        Self::with_requests(Vec::new())
    }

    fn with_requests(requests: Vec<SavedRequest>) -> Self {
        let last_id = requests.iter().map(|r| r.id).max().unwrap_or(0);
        Self {
            inner: RwLock::new(Inner { requests, last_id }),
        }
    }
}

impl RequestRepository for InMemoryRequestStore {
    fn list(&self) -> Vec<SavedRequest> {
        self.inner.read().requests.clone()
    }

    fn insert(&self, name: String, method: HttpMethod, url: String) -> SavedRequest {
        let mut inner = self.inner.write();
        // Millisecond timestamps, bumped when two saves land in the same ms
        let now = Utc::now().timestamp_millis().max(0) as u64;
        let id = now.max(inner.last_id + 1);
        inner.last_id = id;

        let request = SavedRequest {
            id,
            name,
            method,
            url,
        };
        inner.requests.insert(0, request.clone());
        tracing::debug!(id, "Saved API client request");
        request
    }

    fn remove(&self, id: u64) -> Option<SavedRequest> {
        let mut inner = self.inner.write();
        let index = inner.requests.iter().position(|r| r.id == id)?;
        Some(inner.requests.remove(index))
    }

    fn clear(&self) -> usize {
        let mut inner = self.inner.write();
        let count = inner.requests.len();
        inner.requests.clear();
        count
    }
}
