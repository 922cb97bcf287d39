use axum::extract::{Extension, Path, Query};
use serde::{Deserialize, Serialize};

use crate::domains::change_detection::CurrentStats;
use crate::domains::interactions::Interaction;
use crate::server::app::AppState;
use crate::server::error::{respond, ApiResult};
use crate::server::middleware::ApifyCredential;

#[derive(Debug, Deserialize)]
pub struct InteractionsQuery {
    pub current_likes: Option<String>,
    pub current_comments: Option<String>,
}

impl InteractionsQuery {
    fn current_stats(&self) -> CurrentStats {
        CurrentStats {
            likes: parse_count(self.current_likes.as_deref()),
            comments: parse_count(self.current_comments.as_deref()),
        }
    }
}

fn parse_count(raw: Option<&str>) -> u64 {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(0)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionsResponse {
    post_id: String,
    interactions: Vec<Interaction>,
    total: usize,
}

/// Interactions on a post not returned by any earlier call.
pub async fn interactions_handler(
    Extension(state): Extension<AppState>,
    credential: Option<Extension<ApifyCredential>>,
    Path(post_id): Path<String>,
    Query(query): Query<InteractionsQuery>,
) -> ApiResult<InteractionsResponse> {
    let token = ApifyCredential::token_or_empty(credential);

    let interactions = state
        .engine
        .get_new_interactions(&token, &post_id, query.current_stats())
        .await?;

    respond(InteractionsResponse {
        total: interactions.len(),
        interactions,
        post_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparseable_counts_default_to_zero() {
        let query = InteractionsQuery {
            current_likes: Some("12".to_string()),
            current_comments: Some("lots".to_string()),
        };
        assert_eq!(query.current_stats(), CurrentStats { likes: 12, comments: 0 });
    }
}
