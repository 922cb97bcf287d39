// HTTP middleware
pub mod apify_token;

pub use apify_token::*;
