//! Custom display ordering of modules

use std::collections::{HashMap, HashSet};

use crate::host::ModuleDescriptor;

/// Reorder modules by a persisted identifier order.
///
/// Modules named in `order` come first, in that order. The rest follow in
/// their original relative order. Identifiers with no matching module are
/// skipped, and an empty order leaves the list unchanged.
pub fn apply_order(modules: Vec<ModuleDescriptor>, order: &[String]) -> Vec<ModuleDescriptor> {
    if order.is_empty() {
        return modules;
    }

    let mut positions: HashMap<String, usize> = HashMap::with_capacity(modules.len());
    for (i, module) in modules.iter().enumerate() {
        positions.entry(module.identifier.clone()).or_insert(i);
    }

    let mut remaining: Vec<Option<ModuleDescriptor>> = modules.into_iter().map(Some).collect();
    let mut sorted = Vec::with_capacity(remaining.len());

    for identifier in order {
        if let Some(module) = positions
            .get(identifier)
            .and_then(|&i| remaining[i].take())
        {
            sorted.push(module);
        }
    }

    sorted.extend(remaining.into_iter().flatten());
    sorted
}

/// Validate a requested order against the installed identifiers.
///
/// Unknown identifiers are dropped and duplicates collapse to their first
/// occurrence; relative order is preserved.
pub fn set_order(candidate_order: &[String], valid_identifiers: &HashSet<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(candidate_order.len());
    candidate_order
        .iter()
        .filter(|identifier| valid_identifiers.contains(identifier.as_str()))
        .filter(|identifier| seen.insert(identifier.as_str()))
        .cloned()
        .collect()
}
