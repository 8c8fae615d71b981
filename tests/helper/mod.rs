//! Shared fixtures for integration tests

pub mod feed;
pub mod inventory;

pub use feed::{FixedClock, rss_document, rss_item};
pub use inventory::{create_manifest, module};
