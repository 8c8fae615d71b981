use std::collections::HashSet;
use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::config::DASHBOARD_PATH;
use crate::dashboard::actions::{
    ActionResponse, Envelope, JsonResponse, RequestContext, guard_lifecycle, guard_settings_update,
};
use crate::dashboard::overview::{Overview, build_overview};
use crate::dashboard::sort::set_order;
use crate::host::{HostError, ModuleInventory, ModuleLifecycle};
use crate::settings::error::StoreError;
use crate::settings::{DisplayPreferences, Settings, SettingsStore};
use crate::version::checker::UpdateChecker;
use crate::version::types::UpdateCheckResult;

/// Entry points called by the presentation layer
pub struct Dashboard {
    settings_store: SettingsStore,
    inventory: Arc<dyn ModuleInventory>,
    lifecycle: Arc<dyn ModuleLifecycle>,
    checker: UpdateChecker,
}

impl Dashboard {
    pub fn new(
        settings_store: SettingsStore,
        inventory: Arc<dyn ModuleInventory>,
        lifecycle: Arc<dyn ModuleLifecycle>,
        checker: UpdateChecker,
    ) -> Self {
        Self {
            settings_store,
            inventory,
            lifecycle,
            checker,
        }
    }

    pub fn settings(&self) -> Settings {
        self.settings_store.load()
    }

    /// Everything one dashboard render needs. May run a live update check.
    pub async fn overview(&self) -> Overview {
        let mut settings = self.settings_store.load();
        let updates = self.checker.check_for_updates(&mut settings, false).await;
        build_overview(self.inventory.all_modules(), &settings, &updates)
    }

    pub async fn check_for_updates(&self, force_check: bool) -> UpdateCheckResult {
        let mut settings = self.settings_store.load();
        self.checker
            .check_for_updates(&mut settings, force_check)
            .await
    }

    /// Validate and persist a new display order, returning what was stored
    pub fn set_sort_order(&self, candidate_order: &[String]) -> Result<Vec<String>, StoreError> {
        let valid: HashSet<String> = self
            .inventory
            .all_modules()
            .into_iter()
            .map(|module| module.identifier)
            .collect();
        let order = set_order(candidate_order, &valid);

        let mut settings = self.settings_store.load();
        settings.module_sort_order = order.clone();
        self.settings_store.try_save(&settings)?;

        info!("Saved sort order of {} modules", order.len());
        Ok(order)
    }

    /// Sort-order endpoint.
    ///
    /// `raw_sort_order` is the JSON-encoded list posted by the page; a missing
    /// field counts as an empty list. Anything other than a JSON array is a
    /// 400, and non-string entries are dropped.
    pub fn save_sort_order(
        &self,
        ctx: &RequestContext,
        raw_sort_order: Option<&str>,
    ) -> JsonResponse {
        if let Err(e) = guard_settings_update(ctx) {
            warn!("Rejected sort order update: {}", e);
            return e.into();
        }

        let Some(candidate) = parse_sort_order(raw_sort_order.unwrap_or("[]")) else {
            return JsonResponse::error(StatusCode::BAD_REQUEST, "Invalid sort order");
        };

        match self.set_sort_order(&candidate) {
            Ok(order) => JsonResponse::ok(Envelope::saved(order)),
            Err(e) => {
                error!("Failed to save sort order: {}", e);
                JsonResponse::error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save settings")
            }
        }
    }

    pub fn activate(&self, ctx: &RequestContext, identifier: &str) -> ActionResponse {
        self.run_lifecycle(ctx, identifier, |lifecycle, id| lifecycle.activate(id))
    }

    pub fn deactivate(&self, ctx: &RequestContext, identifier: &str) -> ActionResponse {
        self.run_lifecycle(ctx, identifier, |lifecycle, id| lifecycle.deactivate(id))
    }

    /// Settings form endpoint: overwrite the display toggles and persist them
    pub fn update_preferences(
        &self,
        ctx: &RequestContext,
        preferences: DisplayPreferences,
    ) -> JsonResponse {
        if let Err(e) = guard_settings_update(ctx) {
            warn!("Rejected preferences update: {}", e);
            return e.into();
        }

        let mut settings = self.settings_store.load();
        settings.apply_preferences(preferences);
        match self.settings_store.try_save(&settings) {
            Ok(()) => {
                info!("Saved display preferences");
                JsonResponse::ok(Envelope::done())
            }
            Err(e) => {
                error!("Failed to save preferences: {}", e);
                JsonResponse::error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save settings")
            }
        }
    }

    fn run_lifecycle<F>(&self, ctx: &RequestContext, identifier: &str, action: F) -> ActionResponse
    where
        F: FnOnce(&dyn ModuleLifecycle, &str) -> Result<(), HostError>,
    {
        if let Err(e) = guard_lifecycle(ctx) {
            warn!("Rejected lifecycle request for {}: {}", identifier, e);
            return ActionResponse::Rejected(e.into());
        }

        match action(self.lifecycle.as_ref(), identifier) {
            Ok(()) => ActionResponse::Redirect(DASHBOARD_PATH.to_string()),
            Err(e) => {
                error!("Lifecycle request for {} failed: {}", identifier, e);
                let status = match e {
                    HostError::UnknownModule(_) => StatusCode::NOT_FOUND,
                    HostError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                ActionResponse::Rejected(JsonResponse::error(status, e.to_string()))
            }
        }
    }
}

/// Parse the posted order; `None` unless it is a JSON array
fn parse_sort_order(raw: &str) -> Option<Vec<String>> {
    match serde_json::from_str::<Value>(raw).ok()? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(identifier) => Some(identifier),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    }
}
