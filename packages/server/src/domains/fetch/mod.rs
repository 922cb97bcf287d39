//! Fetch domain - the cost-minimising orchestrator callers talk to.

pub mod config;
pub mod engine;
pub mod error;
pub mod in_flight;

pub use config::EngineConfig;
pub use engine::{CacheStats, FetchEngine, PostsListing};
pub use error::{EngineError, EngineResult};
pub use in_flight::KeyedLocks;
