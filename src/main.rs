use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;

use module_manager::config::{
    self, FeedConfig, feed_config_path, log_path, modules_manifest_path, settings_path,
    update_cache_path,
};
use module_manager::dashboard::Dashboard;
use module_manager::dashboard::actions::{ActionResponse, RequestContext};
use module_manager::host::ManifestInventory;
use module_manager::settings::{DisplayPreferences, SettingsStore};
use module_manager::version::cache::UpdateCache;
use module_manager::version::checker::UpdateChecker;
use module_manager::version::feed::{FeedSource, RssFeed};

#[derive(Parser)]
#[command(name = "module-manager")]
#[command(version, about = "Update checks and display order for installed CMS modules")]
struct Cli {
    /// Directory holding settings, the update cache, and logs
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Module manifest to use as the inventory [default: <data-dir>/modules.json]
    #[arg(long, global = true)]
    modules: Option<PathBuf>,

    /// Feed URL to check; repeat to check several, later feeds win on conflicts.
    /// Replaces the feeds from feeds.json
    #[arg(long = "feed", global = true)]
    feeds: Vec<String>,

    /// Per-feed timeout in seconds [default: from feeds.json, else 10]
    #[arg(long, global = true)]
    feed_timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check the feeds for newer module versions
    Check {
        /// Ignore the check interval and fetch now
        #[arg(long)]
        force: bool,
    },
    /// Print the dashboard overview
    Overview,
    /// Print the current settings
    Settings,
    /// Store a custom display order
    Order {
        /// Module identifiers, first shown first
        identifiers: Vec<String>,
    },
    /// Activate a module
    Activate { identifier: String },
    /// Deactivate a module
    Deactivate { identifier: String },
    /// Change display preferences; omitted flags keep their value
    Configure {
        #[arg(long)]
        show_inactive: Option<bool>,
        #[arg(long)]
        show_system: Option<bool>,
        #[arg(long)]
        group_by_status: Option<bool>,
        #[arg(long)]
        check_for_updates: Option<bool>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = cli.data_dir.clone().unwrap_or_else(config::data_dir);
    let _log_guard = module_manager::logging::init(&log_path(&data_dir))?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli, data_dir))
}

async fn run(cli: Cli, data_dir: PathBuf) -> anyhow::Result<()> {
    let dashboard = build_dashboard(&cli, &data_dir)?;

    match cli.command {
        Command::Check { force } => {
            let result = dashboard.check_for_updates(force).await;
            if let Some(checked_at) = chrono::DateTime::from_timestamp(result.last_check_epoch, 0)
                .filter(|_| result.last_check_epoch > 0)
            {
                eprintln!("Last checked {}", checked_at.format("%Y-%m-%d %H:%M:%S UTC"));
            }
            if !result.has_updates() {
                eprintln!("All modules are up to date");
            }
            print_json(&result)
        }
        Command::Overview => {
            let overview = dashboard.overview().await;
            eprintln!(
                "Showing {} of {} modules",
                overview.visible_count(),
                overview.stats.total
            );
            print_json(&overview)
        }
        Command::Settings => print_json(&dashboard.settings()),
        Command::Order { identifiers } => {
            let stored = dashboard.set_sort_order(&identifiers)?;
            print_json(&stored)
        }
        Command::Activate { identifier } => {
            report(dashboard.activate(&RequestContext::trusted_admin_post(), &identifier))
        }
        Command::Deactivate { identifier } => {
            report(dashboard.deactivate(&RequestContext::trusted_admin_post(), &identifier))
        }
        Command::Configure {
            show_inactive,
            show_system,
            group_by_status,
            check_for_updates,
        } => {
            let current = dashboard.settings().preferences();
            let preferences = DisplayPreferences {
                show_inactive_modules: show_inactive.unwrap_or(current.show_inactive_modules),
                show_system_modules: show_system.unwrap_or(current.show_system_modules),
                group_by_status: group_by_status.unwrap_or(current.group_by_status),
                check_for_updates_enabled: check_for_updates
                    .unwrap_or(current.check_for_updates_enabled),
            };
            let response =
                dashboard.update_preferences(&RequestContext::trusted_admin_post(), preferences);
            if !response.body.success {
                print_json(&response.body)?;
                anyhow::bail!("request rejected with status {}", response.status);
            }
            print_json(&dashboard.settings())
        }
    }
}

fn build_dashboard(cli: &Cli, data_dir: &Path) -> anyhow::Result<Dashboard> {
    let settings_store = SettingsStore::new(settings_path(data_dir));
    let inventory = Arc::new(ManifestInventory::new(
        cli.modules
            .clone()
            .unwrap_or_else(|| modules_manifest_path(data_dir)),
    ));

    let mut feed_config = FeedConfig::load(&feed_config_path(data_dir));
    if let Some(timeout_secs) = cli.feed_timeout {
        feed_config.timeout_secs = timeout_secs;
    }
    if !cli.feeds.is_empty() {
        feed_config.urls = cli.feeds.clone();
    }

    let feeds = feed_config
        .urls
        .iter()
        .map(|url| -> anyhow::Result<Arc<dyn FeedSource>> {
            let feed = RssFeed::with_timeout(url, Duration::from_secs(feed_config.timeout_secs))?;
            Ok(Arc::new(feed))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let checker = UpdateChecker::new(
        feeds,
        inventory.clone(),
        settings_store.clone(),
        UpdateCache::new(update_cache_path(data_dir)),
    );

    Ok(Dashboard::new(
        settings_store,
        inventory.clone(),
        inventory,
        checker,
    ))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn report(response: ActionResponse) -> anyhow::Result<()> {
    match response {
        ActionResponse::Redirect(_) => {
            eprintln!("Done");
            Ok(())
        }
        ActionResponse::Rejected(rejected) => {
            print_json(&rejected.body)?;
            anyhow::bail!("request rejected with status {}", rejected.status)
        }
    }
}
