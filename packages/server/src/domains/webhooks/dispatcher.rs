//! Asynchronous webhook fan-out.
//!
//! ```text
//! engine ──notify()──► mpsc queue ──► worker ──► one task per subscriber
//!                                                   attempt → backoff → retry
//!                                                   (abandon after max_retries)
//! ```
//!
//! `notify` never waits on delivery, and delivery failures never reach the
//! operation that emitted the event.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::models::{WebhookEvent, WebhookPayload};
use super::registry::SubscriptionRegistry;
use crate::kernel::{BaseNotifier, BaseWebhookSender};

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Wait before the first retry; doubles for each one after.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Wait before retry number `retry` (1-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(retry.saturating_sub(1))
    }
}

pub struct WebhookDispatcher {
    tx: mpsc::UnboundedSender<WebhookPayload>,
}

impl WebhookDispatcher {
    /// Start the delivery worker. Must be called inside a Tokio runtime.
    pub fn spawn(
        registry: Arc<SubscriptionRegistry>,
        sender: Arc<dyn BaseWebhookSender>,
        policy: RetryPolicy,
    ) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<WebhookPayload>();

        let worker = tokio::spawn(async move {
            while let Some(payload) = rx.recv().await {
                let subscribers = registry.subscribers_for(payload.event);
                if subscribers.is_empty() {
                    debug!(event = ?payload.event, "No subscribers for event");
                    continue;
                }

                info!(event = ?payload.event, count = subscribers.len(), "Notifying webhooks");
                for sub in subscribers {
                    let sender = sender.clone();
                    let payload = payload.clone();
                    let policy = policy.clone();
                    tokio::spawn(async move {
                        deliver_with_retry(sender.as_ref(), &sub.url, &payload, &policy).await;
                    });
                }
            }
            debug!("Webhook dispatcher stopped");
        });

        (Self { tx }, worker)
    }
}

impl BaseNotifier for WebhookDispatcher {
    fn notify(&self, event: WebhookEvent, data: Value) {
        if self.tx.send(WebhookPayload::new(event, data)).is_err() {
            warn!(?event, "Webhook dispatcher is shut down, dropping event");
        }
    }
}

/// Deliver one payload to one URL. Returns whether it was eventually delivered.
pub async fn deliver_with_retry(
    sender: &dyn BaseWebhookSender,
    url: &str,
    payload: &WebhookPayload,
    policy: &RetryPolicy,
) -> bool {
    let mut retry = 0;
    loop {
        match sender.send(url, payload).await {
            Ok(()) => return true,
            Err(e) if retry < policy.max_retries => {
                retry += 1;
                let wait = policy.backoff(retry);
                warn!(url, error = %e, retry, max_retries = policy.max_retries, wait_ms = wait.as_millis() as u64, "Webhook delivery failed, retrying");
                tokio::time::sleep(wait).await;
            }
            Err(e) => {
                error!(url, error = %e, retries = policy.max_retries, "Webhook abandoned after retries");
                return false;
            }
        }
    }
}
