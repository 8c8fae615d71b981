//! Inventory fixtures

use std::path::Path;

use module_manager::host::{ManifestInventory, ModuleDescriptor};
use module_manager::settings::document::write_document;

pub fn module(identifier: &str, name: &str, version: &str, is_active: bool) -> ModuleDescriptor {
    ModuleDescriptor {
        identifier: identifier.to_string(),
        name: name.to_string(),
        version: version.to_string(),
        is_active,
        is_system_module: false,
        author: "Test Author".to_string(),
        description: String::new(),
        actions: Vec::new(),
    }
}

/// Write `modules` to a manifest under `dir` and open it
pub fn create_manifest(dir: &Path, modules: &[ModuleDescriptor]) -> ManifestInventory {
    let path = dir.join("modules.json");
    write_document(&path, &modules).unwrap();
    ManifestInventory::new(path)
}
