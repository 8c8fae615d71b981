//! Update check orchestration
//!
//! A live check is only made when the last one is older than the configured
//! interval, or when forced. Otherwise the cached result is served as-is.

use std::sync::Arc;

use futures::future::join_all;
use indexmap::IndexMap;
use tracing::{debug, error, info};

use crate::host::{ModuleDescriptor, ModuleInventory};
use crate::settings::{Settings, SettingsStore};
use crate::version::cache::UpdateCache;
use crate::version::clock::{Clock, SystemClock};
use crate::version::compare::is_newer;
use crate::version::feed::{FeedSource, fetch_feed};
use crate::version::types::{AvailableModuleInfo, ModuleUpdate, UpdateCheckResult};

/// Whether the last check is recent enough to serve from cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
}

/// Classify the last check time against the configured interval
pub fn freshness(settings: &Settings, now: i64) -> Freshness {
    let elapsed = now.saturating_sub(settings.last_update_check_epoch);
    if elapsed < settings.update_check_interval_seconds {
        Freshness::Fresh
    } else {
        Freshness::Stale
    }
}

/// Merge feed results in order; a later feed's entry replaces an earlier one
/// with the same module name.
pub fn merge_feeds<I>(feeds: I) -> IndexMap<String, AvailableModuleInfo>
where
    I: IntoIterator<Item = Vec<AvailableModuleInfo>>,
{
    let mut merged = IndexMap::new();
    for module in feeds.into_iter().flatten() {
        merged.insert(module.name.clone(), module);
    }
    merged
}

/// Installed modules for which a strictly newer version is available
pub fn find_updates(
    installed: &[ModuleDescriptor],
    available: &IndexMap<String, AvailableModuleInfo>,
) -> IndexMap<String, ModuleUpdate> {
    installed
        .iter()
        .filter_map(|module| {
            let remote = available.get(&module.name)?;
            if !is_newer(&remote.version, &module.version) {
                return None;
            }
            debug!(
                "Update available for {}: {} -> {}",
                module.name, module.version, remote.version
            );
            Some((
                module.name.clone(),
                ModuleUpdate {
                    current_version: module.version.clone(),
                    available_version: remote.version.clone(),
                    download_link: remote.download_link.clone(),
                    release_date: remote.release_date.clone(),
                },
            ))
        })
        .collect()
}

/// Look up the pending update for a module in a check result
pub fn get_update_for<'a>(
    module_name: &str,
    result: &'a UpdateCheckResult,
) -> Option<&'a ModuleUpdate> {
    result.update_for(module_name)
}

pub struct UpdateChecker {
    feeds: Vec<Arc<dyn FeedSource>>,
    inventory: Arc<dyn ModuleInventory>,
    settings_store: SettingsStore,
    cache: UpdateCache,
    clock: Arc<dyn Clock>,
}

impl UpdateChecker {
    pub fn new(
        feeds: Vec<Arc<dyn FeedSource>>,
        inventory: Arc<dyn ModuleInventory>,
        settings_store: SettingsStore,
        cache: UpdateCache,
    ) -> Self {
        Self {
            feeds,
            inventory,
            settings_store,
            cache,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used for freshness and timestamps
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Check for module updates.
    ///
    /// When checking is disabled, returns an empty result without touching the
    /// network or disk. When the last check is fresh and a cache exists, the
    /// cache is returned verbatim. Otherwise all feeds are fetched, compared to
    /// the installed modules, and both `settings.last_update_check_epoch` and
    /// the cache are rewritten. Feed and write failures are logged, never
    /// returned.
    pub async fn check_for_updates(
        &self,
        settings: &mut Settings,
        force_check: bool,
    ) -> UpdateCheckResult {
        if !settings.check_for_updates_enabled {
            debug!("Update checks disabled");
            return UpdateCheckResult::empty();
        }

        let now = self.clock.now();

        if !force_check && freshness(settings, now) == Freshness::Fresh {
            if let Some(cached) = self.cache.load() {
                debug!(
                    "Serving cached update check from {}",
                    cached.last_check_epoch
                );
                return cached;
            }
            info!("Update cache missing within check interval, checking now");
        }

        info!(
            "Checking {} feeds for module updates (forced: {})",
            self.feeds.len(),
            force_check
        );

        let available = self.fetch_available().await;
        let installed = self.inventory.all_modules();
        let updates = find_updates(&installed, &available);

        info!(
            "Update check found {} updates among {} installed modules",
            updates.len(),
            installed.len()
        );

        // Reload so changes saved while the feeds were in flight survive
        let mut latest = self.settings_store.load();
        latest.last_update_check_epoch = now;
        self.settings_store.save(&latest);
        settings.last_update_check_epoch = now;

        let result = UpdateCheckResult {
            updates,
            last_check_epoch: now,
        };
        let _ = self
            .cache
            .store(&result)
            .inspect_err(|e| error!("Failed to write update cache: {}", e));

        result
    }

    /// Fetch every feed concurrently and merge in configured order
    async fn fetch_available(&self) -> IndexMap<String, AvailableModuleInfo> {
        let fetched = join_all(self.feeds.iter().map(|feed| fetch_feed(feed.as_ref()))).await;
        merge_feeds(fetched)
    }
}
