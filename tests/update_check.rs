//! Update check against HTTP feeds served by mockito

mod helper;

use std::sync::Arc;
use std::time::Duration;

use mockito::Server;
use tempfile::TempDir;

use helper::{FixedClock, create_manifest, module, rss_document, rss_item};
use module_manager::settings::SettingsStore;
use module_manager::version::cache::UpdateCache;
use module_manager::version::checker::{UpdateChecker, get_update_for};
use module_manager::version::feed::{FeedSource, RssFeed};

const NOW: i64 = 1_720_000_000;

fn feed(url: String) -> Arc<dyn FeedSource> {
    Arc::new(RssFeed::with_timeout(&url, Duration::from_secs(2)).unwrap())
}

#[tokio::test]
async fn check_merges_feeds_and_reports_newer_versions() {
    let temp_dir = TempDir::new().unwrap();
    let mut server = Server::new_async().await;

    let first = server
        .mock("GET", "/first.rss")
        .with_status(200)
        .with_body(rss_document(&[
            rss_item("Foo", "1.1", "Jan 1, 2024", "https://first/foo"),
            rss_item("Bar", "3.0", "Feb 2, 2024", "https://first/bar"),
            "<item><title>Bar BAD TITLE</title></item>".to_string(),
        ]))
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("GET", "/second.rss")
        .with_status(200)
        .with_body(rss_document(&[rss_item(
            "Bar",
            "2.5 BETA",
            "Mar 3, 2024",
            "https://second/bar",
        )]))
        .expect(1)
        .create_async()
        .await;

    let inventory = Arc::new(create_manifest(
        temp_dir.path(),
        &[
            module("foo/foo.php", "Foo", "1.0", true),
            module("bar/bar.php", "Bar", "2.0", false),
            module("baz/baz.php", "Baz", "0.9", true),
        ],
    ));
    let settings_store = SettingsStore::new(temp_dir.path().join("settings.json"));
    let checker = UpdateChecker::new(
        vec![
            feed(format!("{}/first.rss", server.url())),
            feed(format!("{}/second.rss", server.url())),
        ],
        inventory,
        settings_store.clone(),
        UpdateCache::new(temp_dir.path().join("updates_cache.json")),
    )
    .with_clock(Arc::new(FixedClock(NOW)));

    let mut settings = settings_store.load();
    let result = checker.check_for_updates(&mut settings, true).await;

    first.assert_async().await;
    second.assert_async().await;

    let foo = get_update_for("Foo", &result).unwrap();
    assert_eq!(foo.current_version, "1.0");
    assert_eq!(foo.available_version, "1.1");
    assert_eq!(foo.download_link, "https://first/foo");

    // The second feed's Bar entry replaced the first feed's
    let bar = get_update_for("Bar", &result).unwrap();
    assert_eq!(bar.available_version, "2.5 BETA");
    assert_eq!(bar.release_date, "Mar 3, 2024");

    assert_eq!(get_update_for("Baz", &result), None);
    assert_eq!(result.last_check_epoch, NOW);
    assert_eq!(settings_store.load().last_update_check_epoch, NOW);
}

#[tokio::test]
async fn second_check_within_interval_is_served_from_cache() {
    let temp_dir = TempDir::new().unwrap();
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/rss")
        .with_status(200)
        .with_body(rss_document(&[rss_item(
            "Foo",
            "1.1",
            "Jan 1, 2024",
            "https://example.com/foo",
        )]))
        .expect(1)
        .create_async()
        .await;

    let settings_store = SettingsStore::new(temp_dir.path().join("settings.json"));
    let checker = UpdateChecker::new(
        vec![feed(format!("{}/rss", server.url()))],
        Arc::new(create_manifest(
            temp_dir.path(),
            &[module("foo/foo.php", "Foo", "1.0", true)],
        )),
        settings_store.clone(),
        UpdateCache::new(temp_dir.path().join("updates_cache.json")),
    )
    .with_clock(Arc::new(FixedClock(NOW)));

    let mut settings = settings_store.load();
    let first = checker.check_for_updates(&mut settings, false).await;

    // A later request loads settings afresh, as a new render would
    let mut settings = settings_store.load();
    let second = checker.check_for_updates(&mut settings, false).await;

    mock.assert_async().await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn unreachable_feeds_still_complete_the_check() {
    let temp_dir = TempDir::new().unwrap();
    let mut server = Server::new_async().await;
    let broken = server
        .mock("GET", "/rss")
        .with_status(503)
        .create_async()
        .await;

    let settings_store = SettingsStore::new(temp_dir.path().join("settings.json"));
    let cache = UpdateCache::new(temp_dir.path().join("updates_cache.json"));
    let checker = UpdateChecker::new(
        vec![
            feed(format!("{}/rss", server.url())),
            feed("http://invalid.localhost.test:99999/rss".to_string()),
        ],
        Arc::new(create_manifest(
            temp_dir.path(),
            &[module("foo/foo.php", "Foo", "1.0", true)],
        )),
        settings_store.clone(),
        cache.clone(),
    )
    .with_clock(Arc::new(FixedClock(NOW)));

    let mut settings = settings_store.load();
    let result = checker.check_for_updates(&mut settings, false).await;

    broken.assert_async().await;
    assert!(!result.has_updates());
    assert_eq!(result.last_check_epoch, NOW);
    assert_eq!(cache.load(), Some(result));
    assert_eq!(settings_store.load().last_update_check_epoch, NOW);
}

#[tokio::test]
async fn stale_cache_is_refreshed() {
    let temp_dir = TempDir::new().unwrap();
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/rss")
        .with_status(200)
        .with_body(rss_document(&[rss_item(
            "Foo",
            "2.0",
            "Jun 1, 2024",
            "https://example.com/foo",
        )]))
        .expect(1)
        .create_async()
        .await;

    let settings_store = SettingsStore::new(temp_dir.path().join("settings.json"));
    let mut settings = settings_store.load();
    settings.last_update_check_epoch = NOW - 2 * 86400;
    assert!(settings_store.save(&settings));

    let cache = UpdateCache::new(temp_dir.path().join("updates_cache.json"));
    cache
        .store(&module_manager::version::types::UpdateCheckResult {
            last_check_epoch: NOW - 2 * 86400,
            ..Default::default()
        })
        .unwrap();

    let checker = UpdateChecker::new(
        vec![feed(format!("{}/rss", server.url()))],
        Arc::new(create_manifest(
            temp_dir.path(),
            &[module("foo/foo.php", "Foo", "1.0", true)],
        )),
        settings_store.clone(),
        cache.clone(),
    )
    .with_clock(Arc::new(FixedClock(NOW)));

    let result = checker.check_for_updates(&mut settings, false).await;

    mock.assert_async().await;
    assert_eq!(result.last_check_epoch, NOW);
    assert_eq!(result.updates["Foo"].available_version, "2.0");
}
