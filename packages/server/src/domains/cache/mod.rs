//! Cache domain - in-memory, TTL-bounded results keyed by query identity.

pub mod store;

pub use store::{CacheEntry, CacheStore};

use serde::Serialize;

use crate::common::canonical_post_id;
use crate::domains::interactions::Interaction;
use crate::domains::posts::Post;

/// What the engine keeps in its cache.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CachedData {
    Posts(Vec<Post>),
    Interactions(Vec<Interaction>),
}

/// Cache key builders. Keys are `<operation>:<query>`.
pub struct CacheKey;

impl CacheKey {
    pub fn posts(profile: &str) -> String {
        format!("posts:{}", profile)
    }

    pub fn interactions(post_id: &str) -> String {
        format!("interactions:{}", canonical_post_id(post_id))
    }
}
