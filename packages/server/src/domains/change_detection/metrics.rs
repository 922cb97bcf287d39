use serde::{Deserialize, Serialize};
use tracing::info;

use super::{clamp_count, signed_delta};
use crate::domains::interactions::InteractionSnapshot;

/// Metrics a caller observed for one of its stored posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportedPostMetrics {
    pub id: String,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub reposts: u64,
}

/// Per-metric differences. Without a snapshot these are the reported totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reposts: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricDetail {
    pub id: String,
    pub changes: MetricChanges,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsComparison {
    pub changed: Vec<String>,
    pub unchanged: Vec<String>,
    pub details: Vec<MetricDetail>,
}

/// Partition reported posts into changed and unchanged against tracked
/// snapshots.
///
/// A post with no snapshot is always changed. Any repost count above zero
/// marks a post changed, since reposts have no tracked baseline.
pub fn classify_metrics<F>(reported: &[ReportedPostMetrics], snapshot_for: F) -> MetricsComparison
where
    F: Fn(&str) -> Option<InteractionSnapshot>,
{
    let mut result = MetricsComparison::default();

    for post in reported {
        let Some(snapshot) = snapshot_for(&post.id) else {
            result.changed.push(post.id.clone());
            result.details.push(MetricDetail {
                id: post.id.clone(),
                changes: MetricChanges {
                    likes: Some(clamp_count(post.likes)),
                    comments: Some(clamp_count(post.comments)),
                    reposts: Some(clamp_count(post.reposts)),
                },
            });
            continue;
        };

        let prev_likes = snapshot.like_count();
        let prev_comments = snapshot.comment_count();

        let changes = MetricChanges {
            likes: (post.likes != prev_likes).then(|| signed_delta(post.likes, prev_likes)),
            comments: (post.comments != prev_comments)
                .then(|| signed_delta(post.comments, prev_comments)),
            reposts: (post.reposts > 0).then(|| clamp_count(post.reposts)),
        };

        if changes == MetricChanges::default() {
            result.unchanged.push(post.id.clone());
        } else {
            result.changed.push(post.id.clone());
            result.details.push(MetricDetail {
                id: post.id.clone(),
                changes,
            });
        }
    }

    info!(
        changed = result.changed.len(),
        unchanged = result.unchanged.len(),
        "Metrics comparison complete"
    );
    result
}
