//! Service health handler for the editor-shell web API.

use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::web::models::ApiEnvelope;

const SERVICES: &[&str] = &["api", "auth", "worker", "db", "cache", "gateway"];

/// Health of one mock service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceHealth {
    pub name: String,
    pub status: String,
    pub latency_ms: u32,
    pub error_rate: f64,
    pub updated_at: String,
}

fn service_health() -> Vec<ServiceHealth> {
    let now = Utc::now().to_rfc3339();
    SERVICES
        .iter()
        .enumerate()
        .map(|(i, name)| ServiceHealth {
            name: name.to_string(),
            status: "UP".to_string(),
            latency_ms: 20 + 9 * i as u32,
            error_rate: (i as f64) * 0.05,
            updated_at: now.clone(),
        })
        .collect()
}

/// List service health.
pub async fn get_health() -> Json<ApiEnvelope<Vec<ServiceHealth>>> {
    let services = service_health();
    let count = services.len();
    Json(ApiEnvelope::ok(services).with_count(count))
}
