//! Data the dashboard page renders

use serde::Serialize;

use crate::dashboard::sort::apply_order;
use crate::host::ModuleDescriptor;
use crate::settings::Settings;
use crate::version::types::{ModuleUpdate, UpdateCheckResult};

/// Module counts shown above the list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModuleStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub system: usize,
    pub custom: usize,
}

impl ModuleStats {
    pub fn from_modules(modules: &[ModuleDescriptor]) -> Self {
        let active = modules.iter().filter(|m| m.is_active).count();
        let system = modules.iter().filter(|m| m.is_system_module).count();
        Self {
            total: modules.len(),
            active,
            inactive: modules.len() - active,
            system,
            custom: modules.len() - system,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleCard {
    #[serde(flatten)]
    pub module: ModuleDescriptor,
    pub update: Option<ModuleUpdate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Active,
    Inactive,
    All,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub kind: SectionKind,
    pub cards: Vec<ModuleCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    /// Counts over every installed module, before filtering
    pub stats: ModuleStats,
    pub sections: Vec<Section>,
    pub last_update_check_epoch: i64,
}

impl Overview {
    /// Number of cards across all sections
    pub fn visible_count(&self) -> usize {
        self.sections.iter().map(|s| s.cards.len()).sum()
    }
}

/// Build the dashboard view: apply the custom order, filter by the display
/// settings, then group by status if enabled. Empty sections are omitted.
pub fn build_overview(
    modules: Vec<ModuleDescriptor>,
    settings: &Settings,
    updates: &UpdateCheckResult,
) -> Overview {
    let stats = ModuleStats::from_modules(&modules);

    let cards: Vec<ModuleCard> = apply_order(modules, &settings.module_sort_order)
        .into_iter()
        .filter(|m| settings.show_inactive_modules || m.is_active)
        .filter(|m| settings.show_system_modules || !m.is_system_module)
        .map(|module| ModuleCard {
            update: updates.update_for(&module.name).cloned(),
            module,
        })
        .collect();

    let sections = if settings.group_by_status {
        let (active, inactive): (Vec<_>, Vec<_>) =
            cards.into_iter().partition(|card| card.module.is_active);
        vec![
            Section {
                kind: SectionKind::Active,
                cards: active,
            },
            Section {
                kind: SectionKind::Inactive,
                cards: inactive,
            },
        ]
    } else {
        vec![Section {
            kind: SectionKind::All,
            cards,
        }]
    };

    Overview {
        stats,
        sections: sections
            .into_iter()
            .filter(|section| !section.cards.is_empty())
            .collect(),
        last_update_check_epoch: updates.last_check_epoch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn module(identifier: &str, active: bool, system: bool) -> ModuleDescriptor {
        ModuleDescriptor {
            identifier: identifier.to_string(),
            name: identifier.to_uppercase(),
            version: "1.0".to_string(),
            is_active: active,
            is_system_module: system,
            author: String::new(),
            description: String::new(),
            actions: Vec::new(),
        }
    }

    fn modules() -> Vec<ModuleDescriptor> {
        vec![
            module("a", true, false),
            module("b", false, false),
            module("c", true, true),
            module("d", false, true),
        ]
    }

    fn section_ids(overview: &Overview) -> Vec<(SectionKind, Vec<&str>)> {
        overview
            .sections
            .iter()
            .map(|s| {
                (
                    s.kind,
                    s.cards
                        .iter()
                        .map(|c| c.module.identifier.as_str())
                        .collect(),
                )
            })
            .collect()
    }

    #[test]
    fn module_stats_counts_status_and_origin() {
        assert_eq!(
            ModuleStats::from_modules(&modules()),
            ModuleStats {
                total: 4,
                active: 2,
                inactive: 2,
                system: 2,
                custom: 2,
            }
        );
    }

    #[test]
    fn build_overview_groups_sorted_modules_by_status() {
        let settings = Settings {
            module_sort_order: vec!["d".to_string(), "c".to_string()],
            ..Settings::default()
        };

        let overview = build_overview(modules(), &settings, &UpdateCheckResult::empty());

        assert_eq!(
            section_ids(&overview),
            vec![
                (SectionKind::Active, vec!["c", "a"]),
                (SectionKind::Inactive, vec!["d", "b"]),
            ]
        );
    }

    #[test]
    fn build_overview_hides_inactive_and_system_when_disabled() {
        let settings = Settings {
            show_inactive_modules: false,
            show_system_modules: false,
            group_by_status: false,
            ..Settings::default()
        };

        let overview = build_overview(modules(), &settings, &UpdateCheckResult::empty());

        assert_eq!(section_ids(&overview), vec![(SectionKind::All, vec!["a"])]);
        assert_eq!(overview.stats.total, 4);
        assert_eq!(overview.visible_count(), 1);
    }

    #[test]
    fn build_overview_omits_empty_sections() {
        let settings = Settings {
            show_inactive_modules: false,
            ..Settings::default()
        };

        let overview = build_overview(modules(), &settings, &UpdateCheckResult::empty());

        assert_eq!(
            section_ids(&overview),
            vec![(SectionKind::Active, vec!["a", "c"])]
        );
    }

    #[test]
    fn build_overview_attaches_updates_by_module_name() {
        let update = ModuleUpdate {
            current_version: "1.0".to_string(),
            available_version: "1.1".to_string(),
            download_link: "https://example.com/a".to_string(),
            release_date: "Jan 1, 2024".to_string(),
        };
        let updates = UpdateCheckResult {
            updates: IndexMap::from([("A".to_string(), update.clone())]),
            last_check_epoch: 99,
        };

        let overview = build_overview(modules(), &Settings::default(), &updates);

        let cards = &overview.sections[0].cards;
        assert_eq!(cards[0].update, Some(update));
        assert_eq!(cards[1].update, None);
        assert_eq!(overview.last_update_check_epoch, 99);
    }
}
