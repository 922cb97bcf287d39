// LinkedIn engagement proxy - API Core
//
// Cost-aware proxy in front of a paid LinkedIn scraping backend. Results are
// cached, interaction deltas are fetched incrementally, and new activity is
// pushed to webhook subscribers.
//
// Core logic lives in domains/*; the axum surface in server/.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
