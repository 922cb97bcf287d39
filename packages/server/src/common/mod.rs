// Common types and utilities shared across the application

pub mod id;
pub mod raw;
pub mod types;

pub use id::{canonical_post_id, post_feed_url};
pub use types::*;
