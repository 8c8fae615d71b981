//! Dashboard entry points
//!
//! This module is what the presentation layer calls: it orders and groups the
//! module list, and hosts the mutating endpoints.
//!
//! # Modules
//!
//! - [`backend`]: `Dashboard`, the entry points for render and mutation
//! - [`actions`]: Request guards and response envelopes
//! - [`overview`]: Stats, sections, and cards for one render
//! - [`sort`]: Applying and validating the custom display order

pub mod actions;
pub mod backend;
pub mod overview;
pub mod sort;

pub use backend::Dashboard;
