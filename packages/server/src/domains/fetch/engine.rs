//! The fetch engine: every operation callers invoke, each composed so the
//! paid scraper is called as rarely and as narrowly as possible.
//!
//! ```text
//! caller ─► FetchEngine ─► change detection (cache + snapshots)
//!                  │
//!                  └─(only if needed)─► scraper ─► normaliser ─► cache/snapshots
//! ```

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::config::EngineConfig;
use super::error::{EngineError, EngineResult};
use super::in_flight::KeyedLocks;
use crate::common::{post_feed_url, ApiToken};
use crate::domains::cache::{CacheKey, CacheStore, CachedData};
use crate::domains::change_detection::{
    classify_metrics, latest_post_changed, plan_interactions, stats_signature, CurrentStats,
    InteractionFetch, InteractionPlan, MetricsComparison, ReportedPostMetrics,
};
use crate::domains::interactions::{
    normalize_comments, normalize_likes, IdentifiedInteraction, Interaction, SnapshotTracker,
};
use crate::domains::posts::{normalize_posts, Post};
use crate::domains::webhooks::WebhookEvent;
use crate::kernel::{BaseNotifier, BaseSocialScraper, ScrapeBatch, ScrapeQuery};

/// Rough per-item prices, only used for cost logging.
const USD_PER_POST: f64 = 0.005;
const USD_PER_LIKE: f64 = 0.003;
const USD_PER_COMMENT: f64 = 0.007;

/// Result of listing a profile's posts.
#[derive(Debug, Clone, PartialEq)]
pub struct PostsListing {
    pub posts: Vec<Post>,
    /// Ids absent from the previous cache generation. Empty on a cache hit.
    pub new_post_ids: Vec<String>,
    pub from_cache: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub entry_count: usize,
    pub approx_size_bytes: usize,
    pub tracked_interaction_count: usize,
}

/// Owns all cached and tracked state for the process.
pub struct FetchEngine {
    scraper: Arc<dyn BaseSocialScraper>,
    notifier: Arc<dyn BaseNotifier>,
    config: EngineConfig,
    cache: CacheStore<CachedData>,
    snapshots: SnapshotTracker,
    in_flight: KeyedLocks,
}

impl FetchEngine {
    pub fn new(
        scraper: Arc<dyn BaseSocialScraper>,
        notifier: Arc<dyn BaseNotifier>,
        config: EngineConfig,
    ) -> Self {
        Self {
            scraper,
            notifier,
            cache: CacheStore::new(config.cache_ttl),
            snapshots: SnapshotTracker::new(),
            in_flight: KeyedLocks::new(),
            config,
        }
    }

    /// List a profile's most recent posts, from cache unless forced or expired.
    pub async fn list_posts(
        &self,
        token: &str,
        profile: &str,
        limit: Option<u32>,
        force_refresh: bool,
    ) -> EngineResult<PostsListing> {
        let token = require_token(token)?;
        let limit = limit.unwrap_or(self.config.default_post_limit).max(1);
        let key = CacheKey::posts(profile);

        let _guard = self.in_flight.lock(&key).await;
        let previous = self.cached_posts(&key);

        if let (false, Some(posts)) = (force_refresh, previous.as_ref()) {
            info!(profile, count = posts.len(), "Using cached posts");
            let listing = PostsListing {
                posts: posts.clone(),
                new_post_ids: Vec::new(),
                from_cache: true,
            };
            self.announce_latest(&listing.posts);
            return Ok(listing);
        }

        info!(profile, limit, force_refresh, "Fetching fresh posts");
        let batch = self
            .scrape(
                &token,
                ScrapeQuery::ProfilePosts {
                    profile: profile.to_string(),
                    limit,
                },
            )
            .await?;

        let mut posts = normalize_posts(&batch.items);
        posts.truncate(limit as usize);

        let new_post_ids: Vec<String> = match &previous {
            Some(prev) => posts
                .iter()
                .filter(|p| !prev.iter().any(|old| old.has_id(&p.id)))
                .map(|p| p.id.clone())
                .collect(),
            None => posts.iter().map(|p| p.id.clone()).collect(),
        };

        info!(
            profile,
            count = posts.len(),
            new = new_post_ids.len(),
            reported_cost_usd = ?batch.cost_usd,
            estimated_cost_usd = posts.len() as f64 * USD_PER_POST,
            "Fetched posts"
        );

        self.cache.put(&key, CachedData::Posts(posts.clone()), None);
        self.announce_latest(&posts);

        Ok(PostsListing {
            posts,
            new_post_ids,
            from_cache: false,
        })
    }

    /// Cheapest existence probe: one upstream item compared with the cached
    /// most recent post.
    ///
    /// Without a cache entry nothing is fetched and `true` is returned. A
    /// failed probe is logged and reported as `false`.
    pub async fn quick_check_new_posts(&self, token: &str, profile: &str) -> EngineResult<bool> {
        let token = require_token(token)?;
        let key = CacheKey::posts(profile);

        let Some(cached) = self.cached_posts(&key) else {
            info!(profile, "No cached posts, assuming new posts exist");
            return Ok(true);
        };

        let query = ScrapeQuery::ProfilePosts {
            profile: profile.to_string(),
            limit: 1,
        };
        let batch = match self.scraper.scrape(&token, &query).await {
            Ok(batch) => batch,
            Err(e) => {
                warn!(profile, error = %e, "Quick check failed");
                return Ok(false);
            }
        };

        let latest = normalize_posts(&batch.items).into_iter().next();
        let cached_latest = cached.first().map(|p| p.id.as_str());
        let has_new = latest_post_changed(cached_latest, latest.as_ref().map(|p| p.id.as_str()));

        info!(
            profile,
            latest = ?latest.as_ref().map(|p| &p.id),
            cached = ?cached_latest,
            has_new,
            estimated_cost_usd = USD_PER_POST,
            "Quick check complete"
        );
        Ok(has_new)
    }

    /// Interactions on a post that were not seen by any earlier call.
    ///
    /// Upstream failures here are absorbed: whatever was collected before the
    /// failure is tracked, cached and returned.
    pub async fn get_new_interactions(
        &self,
        token: &str,
        post_id: &str,
        current: CurrentStats,
    ) -> EngineResult<Vec<Interaction>> {
        let token = require_token(token)?;
        let key = CacheKey::interactions(post_id);

        let _guard = self.in_flight.lock(&key).await;
        let cached = self.cache.get(&key);
        let snapshot = self.snapshots.get_or_create(post_id);

        let plan = plan_interactions(
            cached.as_ref().map(|e| e.hash.as_str()),
            &current,
            &snapshot,
            &self.config.caps,
        );

        let request = match plan {
            InteractionPlan::Skip => {
                info!(post_id, "No interaction changes, skipping upstream");
                return Ok(Vec::new());
            }
            InteractionPlan::Fetch {
                request,
                deltas,
                cold_start,
            } => {
                info!(
                    post_id,
                    likes_delta = deltas.likes,
                    comments_delta = deltas.comments,
                    cold_start,
                    "Interaction stats changed"
                );
                request
            }
        };

        let mut found = Vec::new();
        if let Err(e) = self
            .collect_new_interactions(&token, post_id, request, &mut found)
            .await
        {
            warn!(
                post_id,
                error = %e,
                kept = found.len(),
                "Interaction fetch failed, keeping partial results"
            );
        }
        self.snapshots.touch(post_id);

        let new: Vec<Interaction> = found.into_iter().map(|i| i.interaction).collect();

        let mut all = match cached.map(|e| e.data) {
            Some(CachedData::Interactions(previous)) => previous,
            _ => Vec::new(),
        };
        all.extend(new.iter().cloned());
        self.cache.put(
            &key,
            CachedData::Interactions(all),
            Some(stats_signature(&current)),
        );

        let estimated_cost = request.likes.unwrap_or(0) as f64 * USD_PER_LIKE
            + request.comments.unwrap_or(0) as f64 * USD_PER_COMMENT;
        info!(
            post_id,
            new = new.len(),
            estimated_cost_usd = estimated_cost,
            "Interaction check complete"
        );

        for interaction in &new {
            self.emit(WebhookEvent::NewInteraction, interaction);
        }

        Ok(new)
    }

    /// Re-fetch a profile's posts and return the requested ones with fresh
    /// metrics. Always calls upstream.
    pub async fn refresh_metrics(
        &self,
        token: &str,
        profile: &str,
        post_ids: &[String],
    ) -> EngineResult<Vec<Post>> {
        let token = require_token(token)?;
        let limit = (post_ids.len() as u32)
            .saturating_mul(2)
            .max(self.config.refresh_min_batch);

        info!(profile, requested = post_ids.len(), limit, "Refreshing post metrics");
        let batch = self
            .scrape(
                &token,
                ScrapeQuery::ProfilePosts {
                    profile: profile.to_string(),
                    limit,
                },
            )
            .await?;

        let fetched = normalize_posts(&batch.items);
        let targets: Vec<Post> = fetched
            .iter()
            .filter(|p| post_ids.iter().any(|id| p.has_id(id)))
            .cloned()
            .collect();

        info!(
            profile,
            matched = targets.len(),
            fetched = fetched.len(),
            estimated_cost_usd = limit as f64 * USD_PER_POST,
            "Metrics refresh fetched"
        );

        let key = CacheKey::posts(profile);
        let _guard = self.in_flight.lock(&key).await;
        if let Some(cached) = self.cached_posts(&key) {
            let merged: Vec<Post> = cached
                .into_iter()
                .map(|old| {
                    targets
                        .iter()
                        .find(|t| t.has_id(&old.id))
                        .cloned()
                        .unwrap_or(old)
                })
                .collect();
            self.cache.put(&key, CachedData::Posts(merged), None);
        }

        Ok(targets)
    }

    /// Classify caller-reported metrics against tracked snapshots. No side
    /// effects, no upstream calls.
    pub fn compare_metrics(&self, reported: &[ReportedPostMetrics]) -> MetricsComparison {
        classify_metrics(reported, |id| self.snapshots.get(id))
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.cache.len(),
            approx_size_bytes: self.cache.approx_size_bytes(),
            tracked_interaction_count: self.snapshots.tracked_interaction_count(),
        }
    }

    /// Remove expired cache entries. Returns how many were removed.
    pub fn clear_expired_cache(&self) -> usize {
        let cleared = self.cache.sweep_expired();
        if cleared > 0 {
            info!(cleared, "Cleared expired cache entries");
        }
        cleared
    }

    /// Tracked like/comment counts for a post, if it has a snapshot.
    pub fn tracked_counts(&self, post_id: &str) -> Option<CurrentStats> {
        self.snapshots.get(post_id).map(|s| CurrentStats {
            likes: s.like_count(),
            comments: s.comment_count(),
        })
    }

    /// Cached interactions for a post together with the stats signature
    /// they were stored under.
    pub fn cached_interactions(&self, post_id: &str) -> Option<(Vec<Interaction>, String)> {
        let entry = self.cache.get(&CacheKey::interactions(post_id))?;
        match entry.data {
            CachedData::Interactions(interactions) => Some((interactions, entry.hash)),
            CachedData::Posts(_) => None,
        }
    }

    fn cached_posts(&self, key: &str) -> Option<Vec<Post>> {
        match self.cache.get(key)?.data {
            CachedData::Posts(posts) => Some(posts),
            CachedData::Interactions(_) => None,
        }
    }

    async fn scrape(&self, token: &ApiToken, query: ScrapeQuery) -> EngineResult<ScrapeBatch> {
        self.scraper.scrape(token, &query).await.map_err(|e| {
            warn!(kind = ?query.kind(), error = %e, "Upstream scrape failed");
            EngineError::from(e)
        })
    }

    async fn collect_new_interactions(
        &self,
        token: &ApiToken,
        post_id: &str,
        request: InteractionFetch,
        found: &mut Vec<IdentifiedInteraction>,
    ) -> anyhow::Result<()> {
        let post_url = post_feed_url(post_id);

        if let Some(limit) = request.likes {
            let query = ScrapeQuery::PostLikers {
                post_url: post_url.clone(),
                limit,
            };
            let batch = self.scraper.scrape(token, &query).await?;
            let before = found.len();
            found.extend(
                normalize_likes(&batch.items)
                    .into_iter()
                    .filter(|like| self.snapshots.record_like(post_id, &like.identity)),
            );
            info!(
                post_id,
                new_likes = found.len() - before,
                tracked = self.snapshots.count_likes(post_id),
                "Likes fetched"
            );
        }

        if let Some(limit) = request.comments {
            let query = ScrapeQuery::PostCommenters { post_url, limit };
            let batch = self.scraper.scrape(token, &query).await?;
            let before = found.len();
            found.extend(
                normalize_comments(&batch.items)
                    .into_iter()
                    .filter(|comment| self.snapshots.record_comment(post_id, &comment.identity)),
            );
            info!(
                post_id,
                new_comments = found.len() - before,
                tracked = self.snapshots.count_comments(post_id),
                "Comments fetched"
            );
        }

        Ok(())
    }

    fn announce_latest(&self, posts: &[Post]) {
        if let Some(latest) = posts.first() {
            self.emit(WebhookEvent::NewPost, latest);
        }
    }

    fn emit<T: Serialize>(&self, event: WebhookEvent, data: &T) {
        match serde_json::to_value(data) {
            Ok(value) => self.notifier.notify(event, value),
            Err(e) => warn!(?event, error = %e, "Failed to serialize webhook data"),
        }
    }
}

fn require_token(raw: &str) -> EngineResult<ApiToken> {
    ApiToken::new(raw).ok_or(EngineError::MissingCredential)
}
