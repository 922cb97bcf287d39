//! Per-post record of interaction identities already fetched.
//!
//! Comparing a platform-reported total against the size of the tracked set
//! tells us how many interactions are new without knowing which ones. Sets
//! only grow for the lifetime of the process, so tracked counts never exceed
//! what the platform has reported.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use crate::common::canonical_post_id;

#[derive(Debug, Clone)]
pub struct InteractionSnapshot {
    pub like_user_ids: HashSet<String>,
    pub comment_ids: HashSet<String>,
    pub last_checked: DateTime<Utc>,
}

impl InteractionSnapshot {
    fn new() -> Self {
        Self {
            like_user_ids: HashSet::new(),
            comment_ids: HashSet::new(),
            last_checked: Utc::now(),
        }
    }

    pub fn like_count(&self) -> u64 {
        self.like_user_ids.len() as u64
    }

    pub fn comment_count(&self) -> u64 {
        self.comment_ids.len() as u64
    }
}

/// Snapshots keyed by canonical post id.
#[derive(Default)]
pub struct SnapshotTracker {
    snapshots: RwLock<HashMap<String, InteractionSnapshot>>,
}

impl SnapshotTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot for a post, creating an empty one on first sight.
    pub fn get_or_create(&self, post_id: &str) -> InteractionSnapshot {
        self.snapshots
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .entry(canonical_post_id(post_id))
            .or_insert_with(InteractionSnapshot::new)
            .clone()
    }

    pub fn get(&self, post_id: &str) -> Option<InteractionSnapshot> {
        self.snapshots
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&canonical_post_id(post_id))
            .cloned()
    }

    /// Returns `true` when the identity was not tracked before.
    pub fn record_like(&self, post_id: &str, identity: &str) -> bool {
        self.with_snapshot(post_id, |s| s.like_user_ids.insert(identity.to_string()))
    }

    /// Returns `true` when the identity was not tracked before.
    pub fn record_comment(&self, post_id: &str, identity: &str) -> bool {
        self.with_snapshot(post_id, |s| s.comment_ids.insert(identity.to_string()))
    }

    pub fn count_likes(&self, post_id: &str) -> u64 {
        self.get(post_id).map_or(0, |s| s.like_count())
    }

    pub fn count_comments(&self, post_id: &str) -> u64 {
        self.get(post_id).map_or(0, |s| s.comment_count())
    }

    /// Stamp the post as checked now.
    pub fn touch(&self, post_id: &str) {
        self.with_snapshot(post_id, |s| s.last_checked = Utc::now());
    }

    /// Total identities tracked across all posts.
    pub fn tracked_interaction_count(&self) -> usize {
        self.snapshots
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .map(|s| s.like_user_ids.len() + s.comment_ids.len())
            .sum()
    }

    fn with_snapshot<R>(&self, post_id: &str, f: impl FnOnce(&mut InteractionSnapshot) -> R) -> R {
        let mut snapshots = self.snapshots.write().unwrap_or_else(|e| e.into_inner());
        let snapshot = snapshots
            .entry(canonical_post_id(post_id))
            .or_insert_with(InteractionSnapshot::new);
        f(snapshot)
    }
}
