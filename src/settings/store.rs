use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use crate::settings::document::{read_document, write_document};
use crate::settings::error::StoreError;
use crate::settings::types::Settings;

/// File-backed settings store
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, merging the persisted document over defaults.
    ///
    /// A missing document is created from defaults before returning, so this
    /// call may write. Unreadable or malformed documents fall back to defaults
    /// for whatever could not be used.
    pub fn load(&self) -> Settings {
        let document = match read_document(&self.path) {
            Ok(Some(document)) => document,
            Ok(None) => {
                info!("No settings at {:?}, creating defaults", self.path);
                let defaults = Settings::default();
                self.save(&defaults);
                return defaults;
            }
            Err(e) => {
                warn!("Ignoring unreadable settings at {:?}: {}", self.path, e);
                return Settings::default();
            }
        };

        match document {
            Value::Object(fields) => merge_with_defaults(fields),
            other => {
                warn!(
                    "Settings document at {:?} is not an object ({}), using defaults",
                    self.path,
                    json_kind(&other)
                );
                Settings::default()
            }
        }
    }

    /// Persist settings, returning false on any failure.
    pub fn save(&self, settings: &Settings) -> bool {
        self.try_save(settings)
            .inspect_err(|e| error!("Failed to save settings to {:?}: {}", self.path, e))
            .is_ok()
    }

    /// Persist settings, returning the cause on failure.
    pub fn try_save(&self, settings: &Settings) -> Result<(), StoreError> {
        write_document(&self.path, settings)?;
        debug!("Saved settings to {:?}", self.path);
        Ok(())
    }
}

/// Overlay persisted keys onto defaults one key at a time.
///
/// A present key replaces the default wholesale. A key whose value has the
/// wrong shape is dropped so the remaining keys still apply.
fn merge_with_defaults(document: Map<String, Value>) -> Settings {
    let mut merged = match serde_json::to_value(Settings::default()) {
        Ok(Value::Object(defaults)) => defaults,
        _ => return Settings::default(),
    };

    for (key, value) in document {
        let mut candidate = merged.clone();
        candidate.insert(key.clone(), value);

        if serde_json::from_value::<Settings>(Value::Object(candidate.clone())).is_ok() {
            merged = candidate;
        } else {
            warn!("Ignoring malformed settings key {:?}", key);
        }
    }

    serde_json::from_value(Value::Object(merged)).unwrap_or_default()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
