use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::domains::change_detection::FetchCaps;
use crate::domains::fetch::EngineConfig;
use crate::domains::webhooks::RetryPolicy;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Used when a request carries no token of its own.
    pub default_apify_token: Option<String>,
    /// Used when a request names no profile.
    pub default_profile: Option<String>,
    pub max_posts_per_scrape: u32,
    pub cache_ttl_hours: i64,
    pub likes_fetch_cap: u32,
    pub comments_fetch_cap: u32,
    pub webhook_max_retries: u32,
    pub webhook_timeout_ms: u64,
    pub cache_sweep_cron: String,
    pub rate_limit_enabled: bool,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            default_apify_token: None,
            default_profile: None,
            max_posts_per_scrape: 10,
            cache_ttl_hours: 24,
            likes_fetch_cap: 100,
            comments_fetch_cap: 50,
            webhook_max_retries: 3,
            webhook_timeout_ms: 10_000,
            cache_sweep_cron: "0 0 */6 * * *".to_string(),
            rate_limit_enabled: true,
            rate_limit_per_second: 10,
            rate_limit_burst: 20,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();
        let defaults = Self::default();

        Ok(Self {
            port: parse_or("PORT", defaults.port)?,
            default_apify_token: non_empty_var("APIFY_API_TOKEN"),
            default_profile: non_empty_var("TARGET_PROFILE_USERNAME"),
            max_posts_per_scrape: parse_or("MAX_POSTS_PER_SCRAPE", defaults.max_posts_per_scrape)?,
            cache_ttl_hours: parse_or("CACHE_TTL_HOURS", defaults.cache_ttl_hours)?,
            likes_fetch_cap: parse_or("LIKES_FETCH_CAP", defaults.likes_fetch_cap)?,
            comments_fetch_cap: parse_or("COMMENTS_FETCH_CAP", defaults.comments_fetch_cap)?,
            webhook_max_retries: parse_or("WEBHOOK_MAX_RETRIES", defaults.webhook_max_retries)?,
            webhook_timeout_ms: parse_or("WEBHOOK_TIMEOUT_MS", defaults.webhook_timeout_ms)?,
            cache_sweep_cron: non_empty_var("CACHE_SWEEP_CRON").unwrap_or(defaults.cache_sweep_cron),
            rate_limit_enabled: parse_or("RATE_LIMIT_ENABLED", defaults.rate_limit_enabled)?,
            rate_limit_per_second: parse_or("RATE_LIMIT_PER_SECOND", defaults.rate_limit_per_second)?,
            rate_limit_burst: parse_or("RATE_LIMIT_BURST", defaults.rate_limit_burst)?,
        })
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::builder()
            .cache_ttl(chrono::Duration::hours(self.cache_ttl_hours))
            .default_post_limit(self.max_posts_per_scrape)
            .caps(FetchCaps {
                likes: self.likes_fetch_cap,
                comments: self.comments_fetch_cap,
            })
            .build()
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.webhook_max_retries,
            ..RetryPolicy::default()
        }
    }

    pub fn webhook_timeout(&self) -> Duration {
        Duration::from_millis(self.webhook_timeout_ms)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match non_empty_var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid value, got {:?}", name, raw)),
        None => Ok(default),
    }
}
