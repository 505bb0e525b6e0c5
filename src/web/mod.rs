//! HTTP API server: service health plus the API-client request store and send proxy.

pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod server;
pub mod state;
pub mod store;

pub use error::WebError;
pub use models::{
    ApiEnvelope, DraftError, HttpMethod, NewSavedRequest, RequestDraft, SavedRequest,
    SendRequest, SendResponse,
};
pub use server::{build_router, run_server, ServerConfig};
pub use state::WebAppState;
pub use store::{InMemoryRequestStore, RequestRepository};
