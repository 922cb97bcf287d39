//! Change detection - decides whether a paid upstream call is needed and how
//! large it has to be.
//!
//! Everything here is pure: callers pass in cached state and current
//! observations, and get back a plan.

pub mod metrics;

pub use metrics::{classify_metrics, MetricChanges, MetricsComparison, ReportedPostMetrics};

use serde::{Deserialize, Serialize};

use crate::common::canonical_post_id;
use crate::domains::interactions::InteractionSnapshot;

/// Engagement totals the caller currently observes on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CurrentStats {
    pub likes: u64,
    pub comments: u64,
}

/// Per-category request ceilings bounding the cost of one delta fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchCaps {
    pub likes: u32,
    pub comments: u32,
}

impl Default for FetchCaps {
    fn default() -> Self {
        Self {
            likes: 100,
            comments: 50,
        }
    }
}

/// Signature stored alongside cached interactions.
///
/// Distinct `(likes, comments)` pairs always produce distinct strings.
pub fn stats_signature(stats: &CurrentStats) -> String {
    format!("{}-{}", stats.likes, stats.comments)
}

/// Reported total minus what the snapshot already holds. Negative when
/// interactions were withdrawn on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deltas {
    pub likes: i64,
    pub comments: i64,
}

impl Deltas {
    pub fn between(current: &CurrentStats, snapshot: &InteractionSnapshot) -> Self {
        Self {
            likes: signed_delta(current.likes, snapshot.like_count()),
            comments: signed_delta(current.comments, snapshot.comment_count()),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.likes == 0 && self.comments == 0
    }
}

/// `current - previous`, clamped to `±i64::MAX`.
pub(crate) fn signed_delta(current: u64, previous: u64) -> i64 {
    if current >= previous {
        clamp_count(current - previous)
    } else {
        -clamp_count(previous - current)
    }
}

/// A count as `i64`, saturating at `i64::MAX`.
pub(crate) fn clamp_count(count: u64) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

/// Upstream request sizes. `None` means that category is not fetched.
///
/// Sizes cover the current total rather than the delta: the actors cannot
/// skip already-seen items, so new ones are found by filtering the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InteractionFetch {
    pub likes: Option<u32>,
    pub comments: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionPlan {
    /// Nothing changed; serve from cache with no upstream cost.
    Skip,
    /// Stats changed; fetch the listed categories.
    Fetch {
        request: InteractionFetch,
        deltas: Deltas,
        cold_start: bool,
    },
}

/// Decide what to fetch for a post's interactions.
///
/// `cached_hash` is the signature stored with the post's cached interactions,
/// if any entry exists.
pub fn plan_interactions(
    cached_hash: Option<&str>,
    current: &CurrentStats,
    snapshot: &InteractionSnapshot,
    caps: &FetchCaps,
) -> InteractionPlan {
    let deltas = Deltas::between(current, snapshot);

    if cached_hash == Some(stats_signature(current).as_str()) && deltas.is_zero() {
        return InteractionPlan::Skip;
    }

    let cold_start = cached_hash.is_none()
        && snapshot.like_user_ids.is_empty()
        && snapshot.comment_ids.is_empty();

    let wants = |delta: i64, total: u64, tracked_empty: bool| delta > 0 || (total > 0 && tracked_empty);

    let request = InteractionFetch {
        likes: wants(deltas.likes, current.likes, snapshot.like_user_ids.is_empty())
            .then(|| cap(current.likes, caps.likes)),
        comments: wants(deltas.comments, current.comments, snapshot.comment_ids.is_empty())
            .then(|| cap(current.comments, caps.comments)),
    };

    InteractionPlan::Fetch {
        request,
        deltas,
        cold_start,
    }
}

fn cap(total: u64, ceiling: u32) -> u32 {
    total.min(ceiling as u64) as u32
}

/// Quick-check verdict: does the single most recent upstream post differ from
/// the most recent cached one?
///
/// No cached post means we cannot rule anything out, so new content is assumed.
/// An empty upstream probe means there is nothing to report.
pub fn latest_post_changed(cached_latest: Option<&str>, upstream_latest: Option<&str>) -> bool {
    match (cached_latest, upstream_latest) {
        (_, None) => false,
        (None, Some(_)) => true,
        (Some(cached), Some(upstream)) => {
            canonical_post_id(cached) != canonical_post_id(upstream)
        }
    }
}
