//! REST API route definitions.

use axum::{
    routing::{get, post},
    Router,
};

use crate::web::handlers::{health, requests, send};
use crate::web::state::WebAppState;

/// Build the API router with all REST endpoints.
pub fn api_routes() -> Router<WebAppState> {
    Router::new()
        .route("/health", get(health::get_health))
        // API client routes
        .route(
            "/api-client/requests",
            get(requests::list_requests)
                .post(requests::create_request)
                .delete(requests::delete_requests),
        )
        .route("/api-client/send", post(send::send_request))
}
