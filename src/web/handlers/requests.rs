//! Saved-request handlers for the editor-shell web API.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::parse_payload;
use crate::web::error::WebError;
use crate::web::models::{parse_url, url_from_json, ApiEnvelope, HttpMethod, SavedRequest};
use crate::web::state::WebAppState;

/// Query for `DELETE /api-client/requests`.
#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub id: Option<String>,
}

/// List saved requests.
pub async fn list_requests(
    State(state): State<WebAppState>,
) -> Json<ApiEnvelope<Vec<SavedRequest>>> {
    let requests = state.requests().list();
    let count = requests.len();
    Json(ApiEnvelope::ok(requests).with_count(count))
}

/// Save a request. Body: `{ name?, method, url }`.
pub async fn create_request(
    State(state): State<WebAppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<ApiEnvelope<SavedRequest>>), WebError> {
    let payload = parse_payload(&body);
    let method = HttpMethod::from_json(payload.get("method"))?;
    let url = url_from_json(payload.get("url"))?;
    let parsed = parse_url(url)?;

    let name = payload
        .get("name")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{} {}", method, non_empty_path(parsed.path())));

    let saved = state.requests().insert(name, method, url.to_string());
    Ok((StatusCode::CREATED, Json(ApiEnvelope::ok(saved))))
}

/// Delete one request (`?id=`) or all of them.
pub async fn delete_requests(
    State(state): State<WebAppState>,
    Query(params): Query<DeleteParams>,
) -> Result<Json<ApiEnvelope<SavedRequest>>, WebError> {
    match params.id.as_deref().filter(|id| !id.is_empty()) {
        Some(raw) => {
            let removed = raw
                .trim()
                .parse::<u64>()
                .ok()
                .and_then(|id| state.requests().remove(id))
                .ok_or_else(|| WebError::NotFound("Request not found".to_string()))?;
            Ok(Json(ApiEnvelope::ok(removed)))
        }
        None => {
            let count = state.requests().clear();
            tracing::info!(count, "Cleared saved requests");
            Ok(Json(ApiEnvelope::message(format!("Cleared {} requests", count))))
        }
    }
}

fn non_empty_path(path: &str) -> &str {
    if path.is_empty() {
        "/"
    } else {
        path
    }
}
