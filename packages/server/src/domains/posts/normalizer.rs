//! Raw profile-posts actor output → canonical [`Post`]s.
//!
//! Actor versions disagree on both envelope and field names. A dataset item
//! may wrap posts under `data.posts` or `posts`, or be a post itself. Field
//! resolution order for every canonical field is listed in the tables below.

use serde_json::Value;
use tracing::debug;

use super::models::{Post, PostMetrics};
use crate::common::post_feed_url;
use crate::common::raw::{first_array, first_str, first_u64};

/// Where a dataset item may carry a batch of posts, in priority order.
const POSTS_ARRAY: &[&str] = &["/data/posts", "/posts"];

/// Primary then fallback identifier. Structured urns resolve to their activity urn.
const ID: &[&str] = &["/urn/activity_urn", "/urn", "/full_urn"];

/// An item carrying any of these is itself a post.
const SELF_IDENTIFYING: &[&str] = &["/urn", "/full_urn", "/url"];

const URL: &[&str] = &["/url", "/post_url"];
const AUTHOR_FIRST_NAME: &[&str] = &["/author/first_name", "/author/firstName"];
const AUTHOR_LAST_NAME: &[&str] = &["/author/last_name", "/author/lastName"];
const AUTHOR_NAME: &[&str] = &["/author/name", "/authorName"];
const AUTHOR_URL: &[&str] = &["/author/profile_url", "/author/profileUrl", "/authorProfileUrl"];
const AUTHOR_HEADLINE: &[&str] = &["/author/headline", "/authorHeadline"];
const CONTENT: &[&str] = &["/text", "/commentary/text", "/content"];
const PUBLISHED_AT: &[&str] = &["/posted_at/date", "/posted_at", "/postedAt"];
const LIKES: &[&str] = &["/stats/like", "/stats/likes", "/num_likes"];
const COMMENTS: &[&str] = &["/stats/comments", "/num_comments"];
const REPOSTS: &[&str] = &["/stats/reposts", "/num_shares"];
const VIEWS: &[&str] = &["/stats/views", "/num_views"];

const MEDIA_SINGLE: &[&str] = &["/media/url", "/media/thumbnail"];
const MEDIA_IMAGES: &str = "/media/images";

/// Normalise a batch of raw dataset items.
///
/// Pure and infallible: unrecognised shapes and posts without an id are
/// dropped, never defaulted.
pub fn normalize_posts(items: &[Value]) -> Vec<Post> {
    let posts: Vec<Post> = items
        .iter()
        .flat_map(candidate_posts)
        .filter_map(normalize_post)
        .collect();

    debug!(raw_items = items.len(), posts = posts.len(), "Normalized posts");
    posts
}

fn candidate_posts(item: &Value) -> Vec<&Value> {
    if let Some(posts) = first_array(item, POSTS_ARRAY) {
        return posts.iter().collect();
    }
    if SELF_IDENTIFYING.iter().any(|p| item.pointer(p).is_some()) {
        return vec![item];
    }
    Vec::new()
}

fn normalize_post(raw: &Value) -> Option<Post> {
    let id = first_str(raw, ID)?;

    Some(Post {
        url: first_str(raw, URL).unwrap_or_else(|| post_feed_url(&id)),
        author_name: author_name(raw),
        author_url: first_str(raw, AUTHOR_URL).unwrap_or_default(),
        author_headline: first_str(raw, AUTHOR_HEADLINE).unwrap_or_default(),
        content: first_str(raw, CONTENT).unwrap_or_default(),
        published_at: first_str(raw, PUBLISHED_AT).unwrap_or_default(),
        media_urls: media_urls(raw),
        metrics: PostMetrics {
            likes: first_u64(raw, LIKES).unwrap_or(0),
            comments: first_u64(raw, COMMENTS).unwrap_or(0),
            reposts: first_u64(raw, REPOSTS).unwrap_or(0),
            views: first_u64(raw, VIEWS),
        },
        interactions: Vec::new(),
        id,
    })
}

fn author_name(raw: &Value) -> String {
    let parts: Vec<String> = [AUTHOR_FIRST_NAME, AUTHOR_LAST_NAME]
        .iter()
        .filter_map(|paths| first_str(raw, paths))
        .collect();

    if parts.is_empty() {
        first_str(raw, AUTHOR_NAME).unwrap_or_default()
    } else {
        parts.join(" ")
    }
}

fn media_urls(raw: &Value) -> Vec<String> {
    let mut urls: Vec<String> = MEDIA_SINGLE
        .iter()
        .filter_map(|path| first_str(raw, &[*path]))
        .collect();

    if let Some(images) = raw.pointer(MEDIA_IMAGES).and_then(Value::as_array) {
        urls.extend(images.iter().filter_map(|img| first_str(img, &["/url"])));
    }

    urls
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_post(activity: &str) -> Value {
        json!({
            "urn": { "activity_urn": activity, "share_urn": "999" },
            "full_urn": format!("urn:li:activity:{}", activity),
            "url": format!("https://www.linkedin.com/posts/x-{}", activity),
            "text": "Hello network",
            "posted_at": { "date": "2024-05-01 10:00:00", "timestamp": 1714557600000u64 },
            "author": {
                "first_name": "Ada",
                "last_name": "Lovelace",
                "headline": "Engineer",
                "profile_url": "https://www.linkedin.com/in/ada"
            },
            "stats": { "like": 10, "comments": 2, "reposts": 1 },
            "media": {
                "url": "https://cdn/video.mp4",
                "images": [{ "url": "https://cdn/a.jpg" }, { "alt": "no url" }]
            }
        })
    }

    #[test]
    fn flat_item_maps_every_field() {
        let posts = normalize_posts(&[raw_post("7001")]);
        assert_eq!(posts.len(), 1);

        let post = &posts[0];
        assert_eq!(post.id, "7001");
        assert_eq!(post.author_name, "Ada Lovelace");
        assert_eq!(post.author_url, "https://www.linkedin.com/in/ada");
        assert_eq!(post.author_headline, "Engineer");
        assert_eq!(post.content, "Hello network");
        assert_eq!(post.published_at, "2024-05-01 10:00:00");
        assert_eq!(post.media_urls, vec!["https://cdn/video.mp4", "https://cdn/a.jpg"]);
        assert_eq!(
            post.metrics,
            PostMetrics { likes: 10, comments: 2, reposts: 1, views: None }
        );
        assert!(post.interactions.is_empty());
    }

    #[test]
    fn wrapped_arrays_are_flattened() {
        let items = vec![
            json!({ "data": { "posts": [raw_post("1"), raw_post("2")] } }),
            json!({ "posts": [raw_post("3")] }),
            raw_post("4"),
        ];

        let ids: Vec<String> = normalize_posts(&items).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn unidentifiable_records_are_dropped() {
        let items = vec![
            json!({ "url": "https://example.com/no-urn", "text": "orphan" }),
            json!({ "unrelated": true }),
            json!("not even an object"),
            raw_post("5"),
        ];

        let posts = normalize_posts(&items);
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, "5");
    }

    #[test]
    fn fallback_fields_and_defaults_apply() {
        let item = json!({
            "full_urn": "urn:li:activity:42",
            "commentary": { "text": "fallback body" },
            "num_likes": 3,
            "num_comments": 4,
            "num_shares": 5
        });

        let post = &normalize_posts(&[item])[0];
        assert_eq!(post.id, "urn:li:activity:42");
        assert_eq!(post.url, "https://www.linkedin.com/feed/update/urn:li:activity:42/");
        assert_eq!(post.content, "fallback body");
        assert_eq!(post.author_name, "");
        assert_eq!(post.author_url, "");
        assert!(post.media_urls.is_empty());
        assert_eq!(post.metrics.likes, 3);
        assert_eq!(post.metrics.comments, 4);
        assert_eq!(post.metrics.reposts, 5);
    }

    #[test]
    fn string_urn_is_used_directly() {
        let item = json!({ "urn": "urn:li:activity:77", "stats": { "like": 0, "comments": 1 } });
        let post = &normalize_posts(&[item])[0];
        assert_eq!(post.id, "urn:li:activity:77");
        assert_eq!(post.metrics.likes, 0);
        assert_eq!(post.metrics.comments, 1);
    }

    #[test]
    fn normalization_is_idempotent() {
        let items = vec![raw_post("8"), json!({ "posts": [raw_post("9")] })];
        assert_eq!(normalize_posts(&items), normalize_posts(&items));
    }
}
