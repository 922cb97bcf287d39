// Business domains
pub mod cache;
pub mod change_detection;
pub mod fetch;
pub mod interactions;
pub mod posts;
pub mod webhooks;
