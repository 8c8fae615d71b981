//! Persisted dashboard settings
//!
//! Settings live in a single JSON document. Loading always yields a complete
//! value: missing keys are filled from defaults, and a missing document is
//! created on first load.
//!
//! # Modules
//!
//! - [`types`]: `Settings` and its defaults
//! - [`store`]: `SettingsStore` for load/save with defaults merge
//! - [`document`]: atomic JSON document reads and writes shared with the update cache
//! - [`error`]: Error types for persisted documents

pub mod document;
pub mod error;
pub mod store;
pub mod types;

pub use store::SettingsStore;
pub use types::{DisplayPreferences, Settings};
