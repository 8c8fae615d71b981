//! JSON documents on disk
//!
//! Writes go to a temporary file in the target directory and are renamed over
//! the destination, so a concurrent reader sees either the old or the new
//! document, never a partial one.

use std::io::{ErrorKind, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::settings::error::StoreError;

/// Read a JSON document.
///
/// # Returns
/// * `Ok(None)` - The file does not exist
/// * `Ok(Some(value))` - The file parsed as JSON
/// * `Err(StoreError)` - The file could not be read or is not valid JSON
pub fn read_document(path: &Path) -> Result<Option<Value>, StoreError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let value = serde_json::from_str(&content)?;
    Ok(Some(value))
}

/// Serialize `value` as pretty JSON and atomically replace the document at `path`.
///
/// Parent directories are created as needed.
pub fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    serde_json::to_writer_pretty(&mut temp, value)?;
    temp.write_all(b"\n")?;
    temp.as_file().sync_all()?;
    temp.persist(path)?;

    debug!("Wrote document {:?}", path);
    Ok(())
}
