//! Seams to the host platform
//!
//! The host owns module loading and lifecycle. This crate only reads the
//! inventory and asks the host to activate or deactivate a module.
//!
//! - [`manifest`]: a JSON manifest standing in for the host, used by the CLI

#[cfg(test)]
use mockall::automock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settings::error::StoreError;

pub mod manifest;

pub use manifest::ManifestInventory;

/// An action a module registers for the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionLink {
    pub label: String,
    pub action_id: String,
}

/// An installed module as reported by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDescriptor {
    /// Stable key, usually the module's path relative to the plugin directory
    pub identifier: String,
    pub name: String,
    pub version: String,
    pub is_active: bool,
    #[serde(default)]
    pub is_system_module: bool,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub actions: Vec<ActionLink>,
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("Unknown module: {0}")]
    UnknownModule(String),

    #[error("Module store error: {0}")]
    Store(#[from] StoreError),
}

/// Read-only view of the installed modules
#[cfg_attr(test, automock)]
pub trait ModuleInventory: Send + Sync {
    /// Every installed module, active or not, in host order
    fn all_modules(&self) -> Vec<ModuleDescriptor>;

    /// Only the active modules
    fn active_modules(&self) -> Vec<ModuleDescriptor> {
        self.all_modules()
            .into_iter()
            .filter(|module| module.is_active)
            .collect()
    }
}

/// Module activation, owned by the host
#[cfg_attr(test, automock)]
pub trait ModuleLifecycle: Send + Sync {
    fn activate(&self, identifier: &str) -> Result<(), HostError>;

    fn deactivate(&self, identifier: &str) -> Result<(), HostError>;
}
