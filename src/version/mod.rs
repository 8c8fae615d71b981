//! Module update checking
//!
//! This module fetches remote feeds of published module versions, compares
//! them with what is installed, and caches the outcome between checks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │    Feeds    │────▶│   Checker   │────▶│    Cache    │
//! │  (fetch)    │     │ (orchestr.) │     │  (storage)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │
//!                            ▼
//!                     ┌─────────────┐
//!                     │   Compare   │
//!                     │(version cmp)│
//!                     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`]: JSON cache of the last check result
//! - [`checker`]: Freshness decision, feed merge, and installed-version diff
//! - [`clock`]: Time source used for freshness
//! - [`compare`]: Dotted version comparison
//! - [`feed`]: Feed trait, RSS client, and title parsing
//! - [`error`]: Error types for feed retrieval
//! - [`types`]: `AvailableModuleInfo`, `ModuleUpdate`, `UpdateCheckResult`

pub mod cache;
pub mod checker;
pub mod clock;
pub mod compare;
pub mod error;
pub mod feed;
pub mod types;
