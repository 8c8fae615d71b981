use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::settings::document::read_document;

// =============================================================================
// Time-related constants
// =============================================================================

/// Default update check interval in seconds (24 hours)
pub const DEFAULT_UPDATE_CHECK_INTERVAL_SECS: i64 = 24 * 60 * 60;

/// Timeout for a single feed fetch in seconds
pub const FEED_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Remote feeds
// =============================================================================

/// Feeds consulted on every live check, in merge order.
/// A module listed by both feeds takes the entry of the later one.
pub const DEFAULT_FEED_URLS: &[&str] = &[
    "https://interactivetools.com/plugins/rss.php",
    "https://www.sagentic.dev/public/plugins/rss.php",
];

/// User agent sent with feed requests
pub const USER_AGENT: &str = concat!("module-manager/", env!("CARGO_PKG_VERSION"));

/// Where activate/deactivate send the browser after success
pub const DASHBOARD_PATH: &str = "/admin/modules";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "MODULE_MANAGER_DATA_DIR";

/// Feed configuration, read from `feeds.json` in the data directory
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FeedConfig {
    pub urls: Vec<String>,
    /// Per-feed timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            urls: DEFAULT_FEED_URLS.iter().map(|url| url.to_string()).collect(),
            timeout_secs: FEED_TIMEOUT_SECS,
        }
    }
}

impl FeedConfig {
    /// Read the feed configuration at `path`. Missing keys keep their
    /// defaults; a missing or unusable file yields the defaults.
    pub fn load(path: &Path) -> Self {
        match read_document(path) {
            Ok(Some(document)) => serde_json::from_value(document)
                .inspect_err(|e| warn!("Ignoring malformed feed config {:?}: {}", path, e))
                .unwrap_or_default(),
            Ok(None) => Self::default(),
            Err(e) => {
                warn!("Ignoring unreadable feed config {:?}: {}", path, e);
                Self::default()
            }
        }
    }
}

/// Directory holding every document this crate writes.
///
/// `MODULE_MANAGER_DATA_DIR` wins when set. Otherwise the platform data
/// directory is used (`$XDG_DATA_HOME` or `~/.local/share` on Linux), and the
/// working directory as a last resort.
pub fn data_dir() -> PathBuf {
    resolve_data_dir(std::env::var_os(DATA_DIR_ENV).map(PathBuf::from), dirs::data_dir())
}

fn resolve_data_dir(explicit: Option<PathBuf>, platform: Option<PathBuf>) -> PathBuf {
    explicit
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| platform.unwrap_or_default().join("module-manager"))
}

pub fn settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join("settings.json")
}

pub fn update_cache_path(data_dir: &Path) -> PathBuf {
    data_dir.join("updates_cache.json")
}

/// Manifest read by the CLI's inventory
pub fn modules_manifest_path(data_dir: &Path) -> PathBuf {
    data_dir.join("modules.json")
}

pub fn feed_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("feeds.json")
}

pub fn log_path(data_dir: &Path) -> PathBuf {
    data_dir.join("module-manager.log")
}
