use axum::extract::Extension;
use serde::Serialize;

use crate::server::app::AppState;
use crate::server::error::{respond, ApiResult};

#[derive(Serialize)]
pub struct ClearCacheResponse {
    message: &'static str,
    removed: usize,
}

/// Sweep expired cache entries on demand.
pub async fn clear_cache_handler(
    Extension(state): Extension<AppState>,
) -> ApiResult<ClearCacheResponse> {
    let removed = state.engine.clear_expired_cache();
    respond(ClearCacheResponse {
        message: "Expired cache entries cleared",
        removed,
    })
}
