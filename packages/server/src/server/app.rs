//! Application setup and server configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, HeaderName, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::domains::fetch::FetchEngine;
use crate::domains::webhooks::SubscriptionRegistry;
use crate::server::error::{not_found_handler, ApiError};
use crate::server::middleware::{apify_token_middleware, APIFY_TOKEN_HEADER};
use crate::server::routes::{
    check_new_posts_handler, clear_cache_handler, compare_metrics_handler, health_handler,
    interactions_handler, list_posts_handler, list_webhooks_handler, refresh_metrics_handler,
    subscribe_webhook_handler, unsubscribe_webhook_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<FetchEngine>,
    pub webhooks: Arc<SubscriptionRegistry>,
    /// Profile used when a request names none.
    pub default_profile: Option<String>,
}

impl AppState {
    /// The requested profile, else the configured default.
    pub fn resolve_profile(&self, requested: Option<&str>) -> Result<String, ApiError> {
        requested
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .or_else(|| self.default_profile.as_deref())
            .map(str::to_string)
            .ok_or_else(|| {
                ApiError::bad_request("Missing profile. Provide \"username\" or configure a default")
            })
    }
}

/// Per-IP limits for `/api/*`.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitSettings {
    pub per_second: u64,
    pub burst_size: u32,
}

/// Build the Axum application router
///
/// `rate_limit` of `None` leaves `/api/*` unthrottled. The throttled router
/// needs peer addresses, so serve it with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn build_app(
    state: AppState,
    default_token: Option<String>,
    rate_limit: Option<RateLimitSettings>,
) -> Result<Router> {
    let mut api = Router::new()
        .route("/api/check-new-posts", get(check_new_posts_handler))
        .route("/api/posts", get(list_posts_handler))
        .route("/api/posts/refresh-metrics", post(refresh_metrics_handler))
        .route("/api/posts/compare-metrics", post(compare_metrics_handler))
        .route("/api/interactions/:post_id", get(interactions_handler));

    if let Some(limits) = rate_limit {
        // Client IP from X-Forwarded-For / X-Real-IP, else the peer address
        let rate_limit_config = Arc::new(
            GovernorConfigBuilder::default()
                .per_second(limits.per_second)
                .burst_size(limits.burst_size)
                .key_extractor(SmartIpKeyExtractor)
                .use_headers()
                .finish()
                .context("Invalid rate limit configuration")?,
        );
        api = api.layer(GovernorLayer {
            config: rate_limit_config,
        });
    }

    // CORS configuration - allow any origin
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(APIFY_TOKEN_HEADER)]);

    let app = Router::new()
        // Health check (no rate limit)
        .route("/health", get(health_handler))
        .route("/cache/clear", post(clear_cache_handler))
        .route("/webhook/subscribe", post(subscribe_webhook_handler))
        .route("/webhook/unsubscribe", post(unsubscribe_webhook_handler))
        .route("/webhook/list", get(list_webhooks_handler))
        .merge(api)
        .fallback(not_found_handler)
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            apify_token_middleware(default_token.clone(), req, next)
        }))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}
