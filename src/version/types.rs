//! Update check data types

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A module version advertised by a remote feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableModuleInfo {
    pub name: String,
    pub version: String,
    /// Free-text date as published in the feed title
    pub release_date: String,
    pub download_link: String,
    pub description: String,
}

/// An installed module for which a newer version is available
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleUpdate {
    pub current_version: String,
    pub available_version: String,
    pub download_link: String,
    pub release_date: String,
}

/// Outcome of an update check, also the shape of the cache document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateCheckResult {
    /// Keyed by module name, in inventory order
    pub updates: IndexMap<String, ModuleUpdate>,
    /// Epoch seconds of the check that produced this result, 0 if none
    pub last_check_epoch: i64,
}

impl UpdateCheckResult {
    /// Result returned when checking is disabled or nothing has run yet
    pub fn empty() -> Self {
        Self::default()
    }

    /// Look up the pending update for a module by name
    pub fn update_for(&self, module_name: &str) -> Option<&ModuleUpdate> {
        self.updates.get(module_name)
    }

    pub fn has_updates(&self) -> bool {
        !self.updates.is_empty()
    }
}
