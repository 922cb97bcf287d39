//! Test harness wiring a `FetchEngine` to in-memory mocks.
//!
//! No network and no containers: the scraper replays queued responses and the
//! notifier records every emitted event.

use std::sync::Arc;

use proxy_core::domains::fetch::{EngineConfig, FetchEngine};
use proxy_core::kernel::{MockScraper, RecordingNotifier};

pub const TEST_TOKEN: &str = "apify_test_token";

pub struct TestHarness {
    pub engine: Arc<FetchEngine>,
    pub scraper: Arc<MockScraper>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestHarness {
    pub fn new(scraper: MockScraper) -> Self {
        Self::with_config(scraper, EngineConfig::default())
    }

    pub fn with_config(scraper: MockScraper, config: EngineConfig) -> Self {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let scraper = Arc::new(scraper);
        let notifier = Arc::new(RecordingNotifier::new());
        let engine = Arc::new(FetchEngine::new(
            scraper.clone(),
            notifier.clone(),
            config,
        ));

        Self {
            engine,
            scraper,
            notifier,
        }
    }
}
