//! HTTP request handlers for the editor-shell web API.

pub mod health;
pub mod requests;
pub mod send;

use axum::body::Bytes;
use serde_json::Value;

/// Decode a JSON request body, treating anything unreadable as `{}`.
///
/// Field validation then reports the first missing or invalid field.
pub(crate) fn parse_payload(body: &Bytes) -> Value {
    serde_json::from_slice(body).unwrap_or_else(|_| Value::Object(Default::default()))
}
