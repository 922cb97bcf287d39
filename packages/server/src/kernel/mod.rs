//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod scheduled_tasks;
pub mod test_dependencies;
pub mod traits;

pub use deps::{ApifyScraper, HttpWebhookSender};
pub use scheduled_tasks::start_scheduler;
pub use test_dependencies::{MockScraper, MockWebhookSender, RecordingNotifier};
pub use traits::*;
