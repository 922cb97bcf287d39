use serde::{Deserialize, Serialize};

use crate::common::canonical_post_id;
use crate::domains::interactions::Interaction;

/// Canonical post shape every raw actor variant is normalised into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub url: String,
    pub author_name: String,
    pub author_url: String,
    pub author_headline: String,
    pub content: String,
    pub published_at: String,
    pub media_urls: Vec<String>,
    pub metrics: PostMetrics,
    /// Populated lazily; always empty straight out of the normaliser.
    #[serde(default)]
    pub interactions: Vec<Interaction>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMetrics {
    pub likes: u64,
    pub comments: u64,
    pub reposts: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
}

impl Post {
    /// Comparison key for this post's id, see [`canonical_post_id`].
    pub fn canonical_id(&self) -> String {
        canonical_post_id(&self.id)
    }

    pub fn has_id(&self, other: &str) -> bool {
        self.canonical_id() == canonical_post_id(other)
    }
}
