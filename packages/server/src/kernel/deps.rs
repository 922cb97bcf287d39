//! Production adapters for the kernel traits.
//!
//! All external services sit behind trait abstractions so the engine can be
//! exercised with the mocks in `test_dependencies`.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use apify_client::ApifyClient;
use async_trait::async_trait;

use crate::common::ApiToken;
use crate::domains::webhooks::WebhookPayload;
use crate::kernel::{BaseSocialScraper, BaseWebhookSender, ScrapeBatch, ScrapeQuery};

// =============================================================================
// ApifyScraper (implements BaseSocialScraper)
// =============================================================================

/// Runs scrape queries as Apify actor runs.
///
/// Tokens arrive per request, so a lightweight `ApifyClient` is built per
/// call around one shared connection pool.
#[derive(Clone, Default)]
pub struct ApifyScraper {
    http: reqwest::Client,
}

impl ApifyScraper {
    pub fn new() -> Self {
        Self::default()
    }

    fn client(&self, token: &ApiToken) -> ApifyClient {
        ApifyClient::with_http_client(self.http.clone(), token.expose().to_string())
    }
}

#[async_trait]
impl BaseSocialScraper for ApifyScraper {
    async fn scrape(&self, token: &ApiToken, query: &ScrapeQuery) -> Result<ScrapeBatch> {
        let client = self.client(token);

        let batch = match query {
            ScrapeQuery::ProfilePosts { profile, limit } => {
                client.scrape_profile_posts(profile, *limit).await
            }
            ScrapeQuery::PostLikers { post_url, limit } => {
                client.scrape_post_reactions(post_url, *limit).await
            }
            ScrapeQuery::PostCommenters { post_url, limit } => {
                client.scrape_post_comments(post_url, *limit).await
            }
        }
        .map_err(|e| anyhow!("{}", e))?;

        Ok(ScrapeBatch {
            items: batch.items,
            cost_usd: batch.usage_total_usd,
        })
    }
}

// =============================================================================
// HttpWebhookSender (implements BaseWebhookSender)
// =============================================================================

pub struct HttpWebhookSender {
    client: reqwest::Client,
}

impl HttpWebhookSender {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("LinkedIn-Clay-Integration/1.0")
            .build()
            .context("Failed to build webhook HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl BaseWebhookSender for HttpWebhookSender {
    async fn send(&self, url: &str, payload: &WebhookPayload) -> Result<()> {
        let resp = self.client.post(url).json(payload).send().await?;
        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("webhook endpoint responded with {}", status);
        }
        tracing::info!(url, status = status.as_u16(), "Webhook delivered");
        Ok(())
    }
}
