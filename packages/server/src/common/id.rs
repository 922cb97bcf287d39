//! Post identifier canonicalisation.
//!
//! LinkedIn post ids arrive in several shapes depending on the actor version
//! and on what the caller stored: a bare activity id (`7123`), a urn
//! (`urn:li:activity:7123`), a feed URL containing the urn, or a share URL
//! (`/posts/<slug>-activity-7123-<suffix>`). Every comparison between ids goes
//! through [`canonical_post_id`] so these forms compare equal, while unrelated
//! ids that merely share digits do not.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // `urn:li:activity:<id>` and `...-activity-<id>-...`
    static ref ACTIVITY_ID_REGEX: Regex = Regex::new(r"activity[:-](\d+)").unwrap();
}

/// Reduce a post id to its comparison key.
///
/// A bare numeric id is its own key. Otherwise the digits following
/// `activity:` or `activity-` are the key. Anything else compares as the
/// whole trimmed string.
pub fn canonical_post_id(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');

    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return trimmed.to_string();
    }

    match ACTIVITY_ID_REGEX.captures(trimmed).and_then(|c| c.get(1)) {
        Some(id) => id.as_str().to_string(),
        None => trimmed.to_string(),
    }
}

/// Feed URL the engagement actors expect for a post.
pub fn post_feed_url(post_id: &str) -> String {
    format!(
        "https://www.linkedin.com/feed/update/urn:li:activity:{}/",
        canonical_post_id(post_id)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urn_url_and_bare_id_share_a_key() {
        let bare = canonical_post_id("7123456789");
        assert_eq!(canonical_post_id("urn:li:activity:7123456789"), bare);
        assert_eq!(
            canonical_post_id("https://www.linkedin.com/feed/update/urn:li:activity:7123456789/"),
            bare
        );
    }

    #[test]
    fn share_url_resolves_to_activity_id() {
        assert_eq!(
            canonical_post_id("https://www.linkedin.com/posts/alice_hello-activity-9002-AbCd"),
            "9002"
        );
        assert_eq!(
            canonical_post_id("https://www.linkedin.com/posts/bob_my-activity-recap-activity-55-x1Yz/"),
            "55"
        );
    }

    #[test]
    fn substring_ids_are_not_equal() {
        assert_ne!(
            canonical_post_id("1234"),
            canonical_post_id("urn:li:activity:91234")
        );
    }

    #[test]
    fn shared_trailing_digits_are_not_equal() {
        assert_ne!(canonical_post_id("abc-1"), canonical_post_id("xyz-1"));
        assert_ne!(
            canonical_post_id("urn:li:share:55"),
            canonical_post_id("urn:li:activity:55")
        );
    }

    #[test]
    fn non_activity_ids_are_trimmed_only() {
        assert_eq!(canonical_post_id("  abc-def "), "abc-def");
        assert_eq!(canonical_post_id("urn:li:share:55"), "urn:li:share:55");
    }

    #[test]
    fn feed_url_wraps_canonical_id() {
        assert_eq!(
            post_feed_url("urn:li:activity:42"),
            "https://www.linkedin.com/feed/update/urn:li:activity:42/"
        );
    }
}
