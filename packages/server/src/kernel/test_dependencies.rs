// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into the engine and webhook
// dispatcher for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use super::{BaseNotifier, BaseSocialScraper, BaseWebhookSender, ScrapeBatch, ScrapeKind, ScrapeQuery};
use crate::common::ApiToken;
use crate::domains::webhooks::{WebhookEvent, WebhookPayload};

// =============================================================================
// Mock Social Scraper
// =============================================================================

enum MockResponse {
    Items(Vec<Value>),
    Failure(String),
}

/// Replays queued responses per query kind and records every call.
///
/// When a kind's queue is empty the scraper answers with an empty batch.
pub struct MockScraper {
    responses: Mutex<HashMap<ScrapeKind, VecDeque<MockResponse>>>,
    calls: Mutex<Vec<ScrapeQuery>>,
    delay: Option<Duration>,
}

impl MockScraper {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Queue a successful response for the next call of `kind`.
    pub fn with_items(self, kind: ScrapeKind, items: Vec<Value>) -> Self {
        self.push(kind, MockResponse::Items(items));
        self
    }

    /// Queue a failure for the next call of `kind`.
    pub fn with_failure(self, kind: ScrapeKind, message: &str) -> Self {
        self.push(kind, MockResponse::Failure(message.to_string()));
        self
    }

    /// Hold every call for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// All queries issued so far, in order.
    pub fn calls(&self) -> Vec<ScrapeQuery> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_of(&self, kind: ScrapeKind) -> Vec<ScrapeQuery> {
        self.calls()
            .into_iter()
            .filter(|q| q.kind() == kind)
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn push(&self, kind: ScrapeKind, response: MockResponse) {
        self.responses
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .push_back(response);
    }
}

impl Default for MockScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseSocialScraper for MockScraper {
    async fn scrape(&self, _token: &ApiToken, query: &ScrapeQuery) -> Result<ScrapeBatch> {
        self.calls.lock().unwrap().push(query.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self
            .responses
            .lock()
            .unwrap()
            .get_mut(&query.kind())
            .and_then(VecDeque::pop_front);

        match next {
            Some(MockResponse::Items(items)) => Ok(ScrapeBatch::new(items)),
            Some(MockResponse::Failure(message)) => Err(anyhow::anyhow!(message)),
            None => Ok(ScrapeBatch::default()),
        }
    }
}

// =============================================================================
// Recording Notifier
// =============================================================================

/// Captures emitted events instead of delivering them.
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<(WebhookEvent, Value)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(WebhookEvent, Value)> {
        self.events.lock().unwrap().clone()
    }

    pub fn events_of(&self, event: WebhookEvent) -> Vec<Value> {
        self.events()
            .into_iter()
            .filter(|(e, _)| *e == event)
            .map(|(_, data)| data)
            .collect()
    }
}

impl BaseNotifier for RecordingNotifier {
    fn notify(&self, event: WebhookEvent, data: Value) {
        self.events.lock().unwrap().push((event, data));
    }
}

// =============================================================================
// Mock Webhook Sender
// =============================================================================

/// Fails the first `failures` attempts, then succeeds. Records every attempt.
pub struct MockWebhookSender {
    failures: usize,
    attempts: AtomicUsize,
    deliveries: Mutex<Vec<(String, WebhookPayload)>>,
}

impl MockWebhookSender {
    pub fn new() -> Self {
        Self::failing(0)
    }

    pub fn failing(failures: usize) -> Self {
        Self {
            failures,
            attempts: AtomicUsize::new(0),
            deliveries: Mutex::new(Vec::new()),
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Successful deliveries as (url, payload).
    pub fn deliveries(&self) -> Vec<(String, WebhookPayload)> {
        self.deliveries.lock().unwrap().clone()
    }
}

impl Default for MockWebhookSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseWebhookSender for MockWebhookSender {
    async fn send(&self, url: &str, payload: &WebhookPayload) -> Result<()> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt < self.failures {
            anyhow::bail!("simulated delivery failure {}", attempt + 1);
        }
        self.deliveries
            .lock()
            .unwrap()
            .push((url.to_string(), payload.clone()));
        Ok(())
    }
}
