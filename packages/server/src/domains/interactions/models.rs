use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Like,
    Comment,
    Repost,
}

/// A single like, comment or repost on a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    pub user_url: String,
    pub user_name: String,
    pub user_headline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_profile_picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Only set for comments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_text: Option<String>,
}

/// An interaction paired with the key used to deduplicate it in a snapshot.
///
/// For likes this is the liker's profile URL (or best fallback); for
/// comments it is the comment id, since one user may comment repeatedly.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifiedInteraction {
    pub identity: String,
    pub interaction: Interaction,
}
