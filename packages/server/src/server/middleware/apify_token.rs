use axum::{
    body::Body,
    extract::{Extension, Query, Request},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use tracing::debug;

pub const APIFY_TOKEN_HEADER: &str = "x-apify-token";

/// Scraper credential resolved for the current request.
#[derive(Clone)]
pub struct ApifyCredential(pub String);

impl std::fmt::Debug for ApifyCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApifyCredential(***)")
    }
}

impl ApifyCredential {
    /// Token resolved for the request, or empty when none was.
    pub fn token_or_empty(credential: Option<Extension<ApifyCredential>>) -> String {
        credential.map(|Extension(c)| c.0).unwrap_or_default()
    }
}

#[derive(Deserialize)]
struct TokenQuery {
    apify_token: Option<String>,
}

/// Apify token middleware
///
/// Resolves the scraper credential from the `x-apify-token` header, then the
/// `apify_token` query parameter, then the configured default, and adds it to
/// request extensions. Without any, the request continues without a
/// credential and the engine rejects it.
pub async fn apify_token_middleware(
    default_token: Option<String>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    match resolve_token(&request, default_token.as_deref()) {
        Some(token) => {
            request.extensions_mut().insert(ApifyCredential(token));
        }
        None => debug!("No Apify token on request"),
    }

    next.run(request).await
}

fn resolve_token(request: &Request<Body>, default_token: Option<&str>) -> Option<String> {
    let from_header = request
        .headers()
        .get(APIFY_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(non_blank);

    from_header
        .or_else(|| {
            Query::<TokenQuery>::try_from_uri(request.uri())
                .ok()
                .and_then(|Query(q)| q.apify_token)
                .as_deref()
                .and_then(non_blank)
        })
        .or_else(|| default_token.and_then(non_blank))
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(uri: &str, header: Option<&str>) -> Request<Body> {
        let mut builder = axum::http::Request::builder().uri(uri);
        if let Some(token) = header {
            builder = builder.header(APIFY_TOKEN_HEADER, token);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn header_wins_over_query_and_default() {
        let req = request("/api/posts?apify_token=from-query", Some("from-header"));
        assert_eq!(resolve_token(&req, Some("default")).as_deref(), Some("from-header"));
    }

    #[test]
    fn query_used_when_header_missing_or_blank() {
        let req = request("/api/posts?username=alice&apify_token=from-query", None);
        assert_eq!(resolve_token(&req, Some("default")).as_deref(), Some("from-query"));

        let req = request("/api/posts?apify_token=from-query", Some("  "));
        assert_eq!(resolve_token(&req, None).as_deref(), Some("from-query"));
    }

    #[test]
    fn default_used_last() {
        let req = request("/api/posts", None);
        assert_eq!(resolve_token(&req, Some("default")).as_deref(), Some("default"));
    }

    #[test]
    fn nothing_resolves_to_none() {
        let req = request("/api/posts?apify_token=", None);
        assert_eq!(resolve_token(&req, None), None);
        assert_eq!(resolve_token(&req, Some("")), None);
    }
}
