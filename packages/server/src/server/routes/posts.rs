use axum::{
    extract::{rejection::JsonRejection, Extension, Query},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domains::change_detection::{MetricsComparison, ReportedPostMetrics};
use crate::domains::posts::Post;
use crate::server::app::AppState;
use crate::server::error::{respond, ApiError, ApiResult};
use crate::server::middleware::ApifyCredential;

#[derive(Debug, Deserialize)]
pub struct ProfileQuery {
    pub username: Option<String>,
}

/// Numeric and boolean params arrive as raw strings; unparseable values fall
/// back to defaults instead of rejecting the request.
#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub username: Option<String>,
    pub max_posts: Option<String>,
    pub force_refresh: Option<String>,
}

impl ListPostsQuery {
    fn limit(&self) -> Option<u32> {
        self.max_posts
            .as_deref()
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|n| *n > 0)
    }

    fn force_refresh(&self) -> bool {
        self.force_refresh.as_deref() == Some("true")
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckNewPostsResponse {
    has_new_posts: bool,
    username: String,
    checked_at: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostsResponse {
    posts: Vec<Post>,
    total_posts: usize,
    new_post_ids: Vec<String>,
    scraped_at: String,
    profile_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshMetricsRequest {
    pub username: Option<String>,
    #[serde(default)]
    pub post_ids: Vec<String>,
}

#[derive(Serialize)]
pub struct RefreshMetricsResponse {
    posts: Vec<Post>,
    total: usize,
}

#[derive(Debug, Deserialize)]
pub struct CompareMetricsRequest {
    pub posts: Vec<ReportedPostMetrics>,
}

/// Cheap probe: does the profile have a post newer than the cached one?
pub async fn check_new_posts_handler(
    Extension(state): Extension<AppState>,
    credential: Option<Extension<ApifyCredential>>,
    Query(query): Query<ProfileQuery>,
) -> ApiResult<CheckNewPostsResponse> {
    let token = ApifyCredential::token_or_empty(credential);
    let username = state.resolve_profile(query.username.as_deref())?;

    let has_new_posts = state
        .engine
        .quick_check_new_posts(&token, &username)
        .await?;

    respond(CheckNewPostsResponse {
        has_new_posts,
        username,
        checked_at: Utc::now().to_rfc3339(),
    })
}

/// List a profile's recent posts, served from cache when possible.
pub async fn list_posts_handler(
    Extension(state): Extension<AppState>,
    credential: Option<Extension<ApifyCredential>>,
    Query(query): Query<ListPostsQuery>,
) -> ApiResult<PostsResponse> {
    let token = ApifyCredential::token_or_empty(credential);
    let username = state.resolve_profile(query.username.as_deref())?;

    let listing = state
        .engine
        .list_posts(&token, &username, query.limit(), query.force_refresh())
        .await?;

    let size_bytes = serde_json::to_vec(&listing.posts).map(|b| b.len()).unwrap_or(0);
    tracing::debug!(
        username = %username,
        size_bytes,
        from_cache = listing.from_cache,
        "Posts response prepared"
    );

    respond(PostsResponse {
        total_posts: listing.posts.len(),
        posts: listing.posts,
        new_post_ids: listing.new_post_ids,
        scraped_at: Utc::now().to_rfc3339(),
        profile_url: format!("https://www.linkedin.com/in/{}/", username),
    })
}

/// Re-fetch fresh metrics for specific posts. Always hits upstream.
pub async fn refresh_metrics_handler(
    Extension(state): Extension<AppState>,
    credential: Option<Extension<ApifyCredential>>,
    payload: Result<Json<RefreshMetricsRequest>, JsonRejection>,
) -> ApiResult<RefreshMetricsResponse> {
    let Json(request) = payload?;
    if request.post_ids.is_empty() {
        return Err(ApiError::bad_request("Missing required field: postIds"));
    }

    let token = ApifyCredential::token_or_empty(credential);
    let username = state.resolve_profile(request.username.as_deref())?;

    let posts = state
        .engine
        .refresh_metrics(&token, &username, &request.post_ids)
        .await?;

    respond(RefreshMetricsResponse {
        total: posts.len(),
        posts,
    })
}

/// Compare caller-reported metrics with tracked snapshots. No upstream call.
pub async fn compare_metrics_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<CompareMetricsRequest>, JsonRejection>,
) -> ApiResult<MetricsComparison> {
    let Json(request) = payload?;
    respond(state.engine.compare_metrics(&request.posts))
}
