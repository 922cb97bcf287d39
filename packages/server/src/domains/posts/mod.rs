//! Posts domain - canonical post model and raw actor output normalisation.

pub mod models;
pub mod normalizer;

pub use models::{Post, PostMetrics};
pub use normalizer::normalize_posts;
