// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (like "fetch only new likes") lives in domain code that uses these traits.
//
// Naming convention: Base* for trait names (e.g., BaseSocialScraper, BaseNotifier)

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::common::ApiToken;
use crate::domains::webhooks::{WebhookEvent, WebhookPayload};

// =============================================================================
// Social Scraper Trait (Infrastructure - paid upstream scraping)
// =============================================================================

/// The query kinds the upstream scraper is billed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrapeKind {
    ProfilePosts,
    PostLikers,
    PostCommenters,
}

/// One paid upstream request: a target plus a maximum item count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeQuery {
    ProfilePosts { profile: String, limit: u32 },
    PostLikers { post_url: String, limit: u32 },
    PostCommenters { post_url: String, limit: u32 },
}

impl ScrapeQuery {
    pub fn kind(&self) -> ScrapeKind {
        match self {
            Self::ProfilePosts { .. } => ScrapeKind::ProfilePosts,
            Self::PostLikers { .. } => ScrapeKind::PostLikers,
            Self::PostCommenters { .. } => ScrapeKind::PostCommenters,
        }
    }

    pub fn limit(&self) -> u32 {
        match self {
            Self::ProfilePosts { limit, .. }
            | Self::PostLikers { limit, .. }
            | Self::PostCommenters { limit, .. } => *limit,
        }
    }
}

/// Raw, heterogeneously shaped records plus what they cost.
#[derive(Debug, Clone, Default)]
pub struct ScrapeBatch {
    pub items: Vec<Value>,
    /// Cost reported by the backend, when it reports one.
    pub cost_usd: Option<f64>,
}

impl ScrapeBatch {
    pub fn new(items: Vec<Value>) -> Self {
        Self {
            items,
            cost_usd: None,
        }
    }
}

#[async_trait]
pub trait BaseSocialScraper: Send + Sync {
    /// Run one paid query. Suspends until the backend finishes; there is no
    /// cancellation once issued.
    async fn scrape(&self, token: &ApiToken, query: &ScrapeQuery) -> Result<ScrapeBatch>;
}

// =============================================================================
// Notifier Trait (Infrastructure - fire-and-forget change events)
// =============================================================================

pub trait BaseNotifier: Send + Sync {
    /// Hand an event to the notification layer. Must not block on delivery.
    fn notify(&self, event: WebhookEvent, data: Value);
}

// =============================================================================
// Webhook Sender Trait (Infrastructure - one HTTP delivery attempt)
// =============================================================================

#[async_trait]
pub trait BaseWebhookSender: Send + Sync {
    /// Deliver a payload once. Any error counts as a failed attempt.
    async fn send(&self, url: &str, payload: &WebhookPayload) -> Result<()>;
}
