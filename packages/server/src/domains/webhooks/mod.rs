//! Webhooks domain - subscriber registry and retrying delivery of change events.

pub mod dispatcher;
pub mod models;
pub mod registry;

pub use dispatcher::{deliver_with_retry, RetryPolicy, WebhookDispatcher};
pub use models::{WebhookEvent, WebhookPayload, WebhookSubscription};
pub use registry::SubscriptionRegistry;
