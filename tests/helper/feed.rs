//! Feed fixtures

use module_manager::version::clock::Clock;

/// Clock pinned to a single instant
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0
    }
}

/// One RSS item in the title convention the feeds use
pub fn rss_item(name: &str, version: &str, date: &str, link: &str) -> String {
    format!(
        "<item><title>{name} v{version} (updated {date})</title><link>{link}</link><description>{name} module</description></item>"
    )
}

/// A complete RSS document around the given items
pub fn rss_document(items: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Module releases</title>
    <link>https://example.com/modules</link>
    {}
  </channel>
</rss>"#,
        items.join("\n    ")
    )
}
