use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use tracing::info;

use super::models::{WebhookEvent, WebhookSubscription};

/// Registered callback endpoints, keyed by URL.
#[derive(Default)]
pub struct SubscriptionRegistry {
    subscriptions: RwLock<HashMap<String, WebhookSubscription>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `url` for `events`, replacing any previous registration.
    pub fn subscribe(&self, url: &str, events: Vec<WebhookEvent>) -> WebhookSubscription {
        let subscription = WebhookSubscription {
            url: url.to_string(),
            events,
            created_at: Utc::now(),
        };
        self.subscriptions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(url.to_string(), subscription.clone());

        info!(url, "Webhook subscribed");
        subscription
    }

    /// Returns whether a subscription was removed.
    pub fn unsubscribe(&self, url: &str) -> bool {
        let removed = self
            .subscriptions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(url)
            .is_some();

        if removed {
            info!(url, "Webhook unsubscribed");
        }
        removed
    }

    pub fn list(&self) -> Vec<WebhookSubscription> {
        let mut subs: Vec<WebhookSubscription> = self
            .subscriptions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect();
        subs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.url.cmp(&b.url)));
        subs
    }

    pub fn subscribers_for(&self, event: WebhookEvent) -> Vec<WebhookSubscription> {
        self.list().into_iter().filter(|s| s.wants(event)).collect()
    }
}
