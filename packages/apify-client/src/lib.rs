//! Pure Apify REST API client.
//!
//! A minimal client for the Apify platform API. Supports starting actor runs,
//! polling for completion, and fetching dataset results. Ships input types for
//! the LinkedIn actors (profile posts, post reactions, post comments).
//!
//! # Example
//!
//! ```rust,ignore
//! use apify_client::ApifyClient;
//!
//! let client = ApifyClient::new("your-api-token".into());
//!
//! let batch = client.scrape_profile_posts("satyanadella", 10).await?;
//! println!("{} raw items, cost {:?}", batch.items.len(), batch.usage_total_usd);
//! ```

pub mod error;
pub mod types;

pub use error::{ApifyError, Result};
pub use types::{DatasetBatch, PostEngagementInput, ProfilePostsInput, RunData};

use serde::de::DeserializeOwned;
use serde::Serialize;
use types::ApiResponse;

const BASE_URL: &str = "https://api.apify.com/v2";

/// Actor ID for apimaestro/linkedin-profile-posts (`/` becomes `~` in URLs).
pub const LINKEDIN_PROFILE_POSTS: &str = "apimaestro~linkedin-profile-posts";

/// Actor ID for the LinkedIn post reactions scraper.
pub const LINKEDIN_POST_REACTIONS: &str = "J9UfswnR3Kae4O6vm";

/// Actor ID for the LinkedIn post comments scraper.
pub const LINKEDIN_POST_COMMENTS: &str = "2XnpwxfhSW1fAWElp";

pub struct ApifyClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl ApifyClient {
    pub fn new(token: String) -> Self {
        Self::with_http_client(reqwest::Client::new(), token)
    }

    /// Reuse an existing connection pool. Tokens are per-caller, so one
    /// client is built per request around a shared `reqwest::Client`.
    pub fn with_http_client(client: reqwest::Client, token: String) -> Self {
        Self {
            client,
            token,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Start an actor run. Returns immediately with run metadata.
    pub async fn start_run<I: Serialize>(&self, actor_id: &str, input: &I) -> Result<RunData> {
        let url = format!("{}/acts/{}/runs", self.base_url, actor_id);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(input)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApifyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let api_resp: ApiResponse<RunData> = resp.json().await?;
        Ok(api_resp.data)
    }

    /// Poll until a run completes. Uses `waitForFinish=60` for efficient long-polling.
    pub async fn wait_for_run(&self, run_id: &str) -> Result<RunData> {
        loop {
            let url = format!(
                "{}/actor-runs/{}?waitForFinish=60",
                self.base_url, run_id
            );
            let resp = self
                .client
                .get(&url)
                .bearer_auth(&self.token)
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(ApifyError::Api {
                    status: status.as_u16(),
                    message: body,
                });
            }

            let api_resp: ApiResponse<RunData> = resp.json().await?;
            match api_resp.data.status.as_str() {
                "SUCCEEDED" => return Ok(api_resp.data),
                "FAILED" | "ABORTED" | "TIMED-OUT" => {
                    return Err(ApifyError::RunFailed(api_resp.data.status));
                }
                _ => {
                    tracing::debug!(run_id, status = %api_resp.data.status, "Run still in progress");
                    continue;
                }
            }
        }
    }

    /// Fetch dataset items from a completed run.
    pub async fn get_dataset_items<T: DeserializeOwned>(
        &self,
        dataset_id: &str,
    ) -> Result<Vec<T>> {
        let url = format!(
            "{}/datasets/{}/items?format=json",
            self.base_url, dataset_id
        );
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApifyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let items: Vec<T> = resp.json().await?;
        Ok(items)
    }

    /// Run an actor end-to-end: start run, poll, fetch raw results.
    pub async fn run_actor<I: Serialize>(&self, actor_id: &str, input: &I) -> Result<DatasetBatch> {
        let run = self.start_run(actor_id, input).await?;
        tracing::info!(actor_id, run_id = %run.id, "Apify run started, polling for completion");

        let completed = self.wait_for_run(&run.id).await?;
        tracing::info!(
            run_id = %completed.id,
            dataset_id = %completed.default_dataset_id,
            usage_usd = ?completed.usage_total_usd,
            "Run completed, fetching results"
        );

        let items: Vec<serde_json::Value> = self
            .get_dataset_items(&completed.default_dataset_id)
            .await?;

        Ok(DatasetBatch {
            items,
            usage_total_usd: completed.usage_total_usd,
        })
    }

    /// Scrape the most recent posts of a LinkedIn profile.
    pub async fn scrape_profile_posts(&self, username: &str, limit: u32) -> Result<DatasetBatch> {
        tracing::info!(username, limit, "Starting LinkedIn profile posts scrape");

        let input = ProfilePostsInput {
            username: username.to_string(),
            limit,
            page_number: 1,
        };
        let batch = self.run_actor(LINKEDIN_PROFILE_POSTS, &input).await?;
        tracing::info!(count = batch.items.len(), "Fetched LinkedIn posts");

        Ok(batch)
    }

    /// Scrape up to `max_items` reactions (likes) on a post.
    pub async fn scrape_post_reactions(&self, post_url: &str, max_items: u32) -> Result<DatasetBatch> {
        tracing::info!(post_url, max_items, "Starting LinkedIn reactions scrape");
        self.run_actor(LINKEDIN_POST_REACTIONS, &engagement_input(post_url, max_items))
            .await
    }

    /// Scrape up to `max_items` comments on a post.
    pub async fn scrape_post_comments(&self, post_url: &str, max_items: u32) -> Result<DatasetBatch> {
        tracing::info!(post_url, max_items, "Starting LinkedIn comments scrape");
        self.run_actor(LINKEDIN_POST_COMMENTS, &engagement_input(post_url, max_items))
            .await
    }
}

fn engagement_input(post_url: &str, max_items: u32) -> PostEngagementInput {
    PostEngagementInput {
        post_urls: vec![post_url.to_string()],
        max_items,
    }
}
