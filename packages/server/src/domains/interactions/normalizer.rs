//! Raw reactions/comments actor output → [`IdentifiedInteraction`]s.

use serde_json::Value;

use super::models::{IdentifiedInteraction, Interaction, InteractionKind};
use crate::common::raw::first_str;

const UNKNOWN_USER: &str = "Unknown";

const LIKER_IDENTITY: &[&str] = &[
    "/profile_url",
    "/profileUrl",
    "/reactor/profile_url",
    "/url",
    "/id",
];
const LIKER_NAME: &[&str] = &["/name", "/full_name", "/userName", "/reactor/name"];
const LIKER_HEADLINE: &[&str] = &["/headline", "/userHeadline", "/reactor/headline"];
const LIKER_PICTURE: &[&str] = &["/profile_picture", "/profilePicture"];
const LIKER_TIMESTAMP: &[&str] = &["/reacted_at", "/reactedAt", "/timestamp"];

const COMMENT_IDENTITY: &[&str] = &["/comment_id", "/id", "/urn"];
const COMMENTER_URL: &[&str] = &["/author/profile_url", "/authorProfileUrl", "/profileUrl"];
const COMMENTER_NAME: &[&str] = &["/author/name", "/authorName", "/name"];
const COMMENTER_HEADLINE: &[&str] = &["/author/headline", "/authorHeadline", "/headline"];
const COMMENTER_PICTURE: &[&str] = &["/author/profile_picture", "/authorProfilePicture"];
const COMMENT_TEXT: &[&str] = &["/text", "/comment", "/replyText"];
const COMMENT_TIMESTAMP: &[&str] = &["/posted_at/date", "/posted_at", "/postedAt", "/timestamp"];

/// Normalise reaction records. Records with no usable identity are dropped.
pub fn normalize_likes(items: &[Value]) -> Vec<IdentifiedInteraction> {
    items.iter().filter_map(normalize_like).collect()
}

/// Normalise comment records. Records with no usable identity are dropped.
pub fn normalize_comments(items: &[Value]) -> Vec<IdentifiedInteraction> {
    items.iter().filter_map(normalize_comment).collect()
}

fn normalize_like(raw: &Value) -> Option<IdentifiedInteraction> {
    let name = first_str(raw, LIKER_NAME);
    let identity = first_str(raw, LIKER_IDENTITY)
        .or_else(|| name.as_ref().map(|n| format!("user-{}", n)))?;

    Some(IdentifiedInteraction {
        interaction: Interaction {
            kind: InteractionKind::Like,
            user_url: identity.clone(),
            user_name: name.unwrap_or_else(|| UNKNOWN_USER.to_string()),
            user_headline: first_str(raw, LIKER_HEADLINE).unwrap_or_default(),
            user_profile_picture: first_str(raw, LIKER_PICTURE),
            timestamp: first_str(raw, LIKER_TIMESTAMP),
            comment_text: None,
        },
        identity,
    })
}

fn normalize_comment(raw: &Value) -> Option<IdentifiedInteraction> {
    let name = first_str(raw, COMMENTER_NAME);
    let timestamp = first_str(raw, COMMENT_TIMESTAMP);
    let identity = first_str(raw, COMMENT_IDENTITY).or_else(|| match (&name, &timestamp) {
        (Some(n), Some(t)) => Some(format!("{}-{}", n, t)),
        _ => None,
    })?;

    Some(IdentifiedInteraction {
        identity,
        interaction: Interaction {
            kind: InteractionKind::Comment,
            user_url: first_str(raw, COMMENTER_URL).unwrap_or_default(),
            user_name: name.unwrap_or_else(|| UNKNOWN_USER.to_string()),
            user_headline: first_str(raw, COMMENTER_HEADLINE).unwrap_or_default(),
            user_profile_picture: first_str(raw, COMMENTER_PICTURE),
            timestamp,
            comment_text: Some(first_str(raw, COMMENT_TEXT).unwrap_or_default()),
        },
    })
}
