//! Interactions domain - likes/comments on posts and the snapshot used to
//! compute deltas between polls.

pub mod models;
pub mod normalizer;
pub mod snapshot;

pub use models::{IdentifiedInteraction, Interaction, InteractionKind};
pub use normalizer::{normalize_comments, normalize_likes};
pub use snapshot::{InteractionSnapshot, SnapshotTracker};
