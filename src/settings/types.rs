//! Settings document schema

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::DEFAULT_UPDATE_CHECK_INTERVAL_SECS;

/// Persisted dashboard settings
///
/// Keys not known to this version are kept in `extra` and written back
/// unchanged on save.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub show_inactive_modules: bool,
    pub show_system_modules: bool,
    pub group_by_status: bool,
    pub check_for_updates_enabled: bool,
    pub update_check_interval_seconds: i64,
    /// Epoch seconds of the last completed update check, 0 if never checked
    pub last_update_check_epoch: i64,
    /// Module identifiers in the user's display order
    pub module_sort_order: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_inactive_modules: true,
            show_system_modules: true,
            group_by_status: true,
            check_for_updates_enabled: true,
            update_check_interval_seconds: DEFAULT_UPDATE_CHECK_INTERVAL_SECS,
            last_update_check_epoch: 0,
            module_sort_order: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// The toggles exposed on the settings form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayPreferences {
    pub show_inactive_modules: bool,
    pub show_system_modules: bool,
    pub group_by_status: bool,
    pub check_for_updates_enabled: bool,
}

impl Settings {
    /// Current display toggles
    pub fn preferences(&self) -> DisplayPreferences {
        DisplayPreferences {
            show_inactive_modules: self.show_inactive_modules,
            show_system_modules: self.show_system_modules,
            group_by_status: self.group_by_status,
            check_for_updates_enabled: self.check_for_updates_enabled,
        }
    }

    /// Overwrite the display toggles, leaving timestamps and ordering alone
    pub fn apply_preferences(&mut self, preferences: DisplayPreferences) {
        self.show_inactive_modules = preferences.show_inactive_modules;
        self.show_system_modules = preferences.show_system_modules;
        self.group_by_status = preferences.group_by_status;
        self.check_for_updates_enabled = preferences.check_for_updates_enabled;
    }
}
