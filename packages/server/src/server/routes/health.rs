use axum::{extract::Extension, Json};
use chrono::Utc;
use serde::Serialize;

use crate::server::app::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: &'static str,
    mode: &'static str,
    cache: CacheHealth,
    timestamp: String,
    version: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheHealth {
    entries: usize,
    size_bytes: usize,
    tracked_interactions: usize,
}

/// Health check endpoint with cache statistics.
pub async fn health_handler(Extension(state): Extension<AppState>) -> Json<HealthResponse> {
    let stats = state.engine.cache_stats();

    Json(HealthResponse {
        status: "ok",
        mode: "cost-optimized",
        cache: CacheHealth {
            entries: stats.entry_count,
            size_bytes: stats.approx_size_bytes,
            tracked_interactions: stats.tracked_interaction_count,
        },
        timestamp: Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
    })
}
