// HTTP routes
pub mod cache;
pub mod health;
pub mod interactions;
pub mod posts;
pub mod webhooks;

pub use cache::*;
pub use health::*;
pub use interactions::*;
pub use posts::*;
pub use webhooks::*;
