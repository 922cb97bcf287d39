// Main entry point for the engagement proxy

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use proxy_core::domains::fetch::FetchEngine;
use proxy_core::domains::webhooks::{SubscriptionRegistry, WebhookDispatcher};
use proxy_core::kernel::{start_scheduler, ApifyScraper, HttpWebhookSender};
use proxy_core::server::{build_app, AppState, RateLimitSettings};
use proxy_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,proxy_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting LinkedIn engagement proxy");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        cache_ttl_hours = config.cache_ttl_hours,
        default_profile = ?config.default_profile,
        has_default_token = config.default_apify_token.is_some(),
        "Configuration loaded"
    );

    // Webhook delivery runs on its own worker
    let registry = Arc::new(SubscriptionRegistry::new());
    let sender = Arc::new(
        HttpWebhookSender::new(config.webhook_timeout())
            .context("Failed to build webhook HTTP client")?,
    );
    let (dispatcher, _dispatcher_task) =
        WebhookDispatcher::spawn(registry.clone(), sender, config.retry_policy());

    let engine = Arc::new(FetchEngine::new(
        Arc::new(ApifyScraper::new()),
        Arc::new(dispatcher),
        config.engine_config(),
    ));

    // Start scheduled tasks (keep the scheduler alive for the process)
    let _scheduler = start_scheduler(engine.clone(), &config.cache_sweep_cron)
        .await
        .context("Failed to start scheduled tasks")?;

    let rate_limit = config.rate_limit_enabled.then_some(RateLimitSettings {
        per_second: config.rate_limit_per_second,
        burst_size: config.rate_limit_burst,
    });

    let state = AppState {
        engine,
        webhooks: registry,
        default_profile: config.default_profile.clone(),
    };
    let app = build_app(state, config.default_apify_token.clone(), rate_limit)?;

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
