//! Manifest-backed inventory
//!
//! `modules.json` holds an array of module descriptors. Lifecycle calls flip
//! `isActive` and rewrite the manifest. An entry that does not parse is left
//! out of the inventory but kept in the file.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;
use tracing::{info, warn};

use crate::host::{HostError, ModuleDescriptor, ModuleInventory, ModuleLifecycle};
use crate::settings::document::{read_document, write_document};

pub struct ManifestInventory {
    path: PathBuf,
    // Serializes read-modify-write of the manifest within this process
    write_lock: Mutex<()>,
}

impl ManifestInventory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw manifest entries, kept as JSON so a rewrite preserves entries this
    /// crate cannot parse
    fn read_entries(&self) -> Vec<Value> {
        match read_document(&self.path) {
            Ok(Some(Value::Array(entries))) => entries,
            Ok(Some(_)) => {
                warn!("Module manifest {:?} is not a list", self.path);
                Vec::new()
            }
            Ok(None) => {
                warn!("No module manifest at {:?}", self.path);
                Vec::new()
            }
            Err(e) => {
                warn!("Failed to read module manifest {:?}: {}", self.path, e);
                Vec::new()
            }
        }
    }

    fn read_modules(&self) -> Vec<ModuleDescriptor> {
        self.read_entries()
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                serde_json::from_value(entry)
                    .inspect_err(|e| {
                        warn!("Skipping manifest entry {} in {:?}: {}", index, self.path, e)
                    })
                    .ok()
            })
            .collect()
    }

    fn set_active(&self, identifier: &str, active: bool) -> Result<(), HostError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut entries = self.read_entries();
        let entry = entries
            .iter_mut()
            .filter_map(Value::as_object_mut)
            .find(|entry| entry.get("identifier").and_then(Value::as_str) == Some(identifier))
            .ok_or_else(|| HostError::UnknownModule(identifier.to_string()))?;

        if entry.get("isActive").and_then(Value::as_bool) == Some(active) {
            return Ok(());
        }
        entry.insert("isActive".to_string(), Value::Bool(active));

        write_document(&self.path, &entries)?;
        info!(
            "{} module {}",
            if active { "Activated" } else { "Deactivated" },
            identifier
        );
        Ok(())
    }
}

impl ModuleInventory for ManifestInventory {
    fn all_modules(&self) -> Vec<ModuleDescriptor> {
        self.read_modules()
    }
}

impl ModuleLifecycle for ManifestInventory {
    fn activate(&self, identifier: &str) -> Result<(), HostError> {
        self.set_active(identifier, true)
    }

    fn deactivate(&self, identifier: &str) -> Result<(), HostError> {
        self.set_active(identifier, false)
    }
}
