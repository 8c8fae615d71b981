use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::settings::document::{read_document, write_document};
use crate::settings::error::StoreError;
use crate::version::types::UpdateCheckResult;

/// File-backed cache of the most recent update check
#[derive(Debug, Clone)]
pub struct UpdateCache {
    path: PathBuf,
}

impl UpdateCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached result.
    ///
    /// Returns `None` when the cache is missing, unreadable, or does not have
    /// the expected shape; callers treat all three as "never cached".
    pub fn load(&self) -> Option<UpdateCheckResult> {
        let document = match read_document(&self.path) {
            Ok(Some(document)) => document,
            Ok(None) => {
                debug!("No update cache at {:?}", self.path);
                return None;
            }
            Err(e) => {
                warn!("Ignoring unreadable update cache at {:?}: {}", self.path, e);
                return None;
            }
        };

        serde_json::from_value(document)
            .inspect_err(|e| warn!("Ignoring malformed update cache at {:?}: {}", self.path, e))
            .ok()
    }

    /// Replace the cached result wholesale
    pub fn store(&self, result: &UpdateCheckResult) -> Result<(), StoreError> {
        write_document(&self.path, result)?;
        info!(
            "Cached {} available updates at {:?}",
            result.updates.len(),
            self.path
        );
        Ok(())
    }
}
