use chrono::Duration;
use typed_builder::TypedBuilder;

use crate::domains::change_detection::FetchCaps;

/// Values the fetch engine runs with.
#[derive(Clone, Debug, TypedBuilder)]
pub struct EngineConfig {
    /// How long cached results stay valid.
    #[builder(default = Duration::hours(24))]
    pub cache_ttl: Duration,
    /// Posts requested when the caller gives no limit.
    #[builder(default = 10)]
    pub default_post_limit: u32,
    /// Per-category ceilings for one interaction fetch.
    #[builder(default)]
    pub caps: FetchCaps,
    /// Smallest batch requested when refreshing metrics.
    #[builder(default = 20)]
    pub refresh_min_batch: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
