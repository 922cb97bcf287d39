//! Raw upstream records in the shapes the scraping actors return.

use serde_json::{json, Value};

/// A profile-posts record with a structured urn.
pub fn raw_post(activity_id: &str, likes: u64, comments: u64) -> Value {
    json!({
        "urn": { "activity_urn": activity_id, "share_urn": format!("share-{}", activity_id) },
        "url": format!("https://www.linkedin.com/posts/alice_{}", activity_id),
        "text": format!("Post {}", activity_id),
        "posted_at": { "date": "2024-05-01 10:00:00" },
        "author": {
            "first_name": "Alice",
            "last_name": "Liddell",
            "headline": "Explorer",
            "profile_url": "https://www.linkedin.com/in/alice"
        },
        "stats": { "like": likes, "comments": comments, "reposts": 0 }
    })
}

/// `count` raw posts with descending activity ids starting at `newest`.
pub fn raw_posts(newest: u64, count: u64) -> Vec<Value> {
    (0..count)
        .map(|i| raw_post(&(newest - i).to_string(), 10 + i, i))
        .collect()
}

/// A reaction record for liker number `n`.
pub fn raw_like(n: u32) -> Value {
    json!({
        "reaction_type": "LIKE",
        "reactor": {
            "name": format!("Liker {}", n),
            "headline": "Reader",
            "profile_url": format!("https://www.linkedin.com/in/liker-{}", n)
        }
    })
}

pub fn raw_likes(range: std::ops::RangeInclusive<u32>) -> Vec<Value> {
    range.map(raw_like).collect()
}

/// A comment record with its own id.
pub fn raw_comment(n: u32) -> Value {
    json!({
        "comment_id": format!("c-{}", n),
        "text": format!("Comment {}", n),
        "posted_at": { "date": "2024-05-02 12:00:00" },
        "author": {
            "name": format!("Commenter {}", n),
            "headline": "Writer",
            "profile_url": format!("https://www.linkedin.com/in/commenter-{}", n)
        }
    })
}

pub fn raw_comments(range: std::ops::RangeInclusive<u32>) -> Vec<Value> {
    range.map(raw_comment).collect()
}
