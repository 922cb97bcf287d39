use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Input for the apimaestro/linkedin-profile-posts actor.
#[derive(Debug, Clone, Serialize)]
pub struct ProfilePostsInput {
    pub username: String,
    pub limit: u32,
    pub page_number: u32,
}

/// Input shared by the LinkedIn reactions and comments actors.
#[derive(Debug, Clone, Serialize)]
pub struct PostEngagementInput {
    #[serde(rename = "postUrls")]
    pub post_urls: Vec<String>,
    #[serde(rename = "maxItems")]
    pub max_items: u32,
}

/// Wrapper for Apify API responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Apify actor run metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct RunData {
    pub id: String,
    pub status: String,
    #[serde(rename = "defaultDatasetId")]
    pub default_dataset_id: String,
    #[serde(rename = "startedAt")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(rename = "finishedAt")]
    pub finished_at: Option<DateTime<Utc>>,
    /// Platform-reported cost of the run in USD.
    #[serde(rename = "usageTotalUsd")]
    pub usage_total_usd: Option<f64>,
}

/// Raw dataset items from a finished run plus what the run cost.
///
/// Items are left as untyped JSON: actor output shapes drift between
/// versions and callers normalise them.
#[derive(Debug, Clone, Default)]
pub struct DatasetBatch {
    pub items: Vec<serde_json::Value>,
    pub usage_total_usd: Option<f64>,
}
