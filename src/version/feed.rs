//! Remote module feeds
//!
//! A feed is an RSS document whose item titles follow the convention
//! `"<Name> v<Version> (updated <Date>)"`. Items that do not follow it are
//! skipped; the feed is not under our control.

use std::sync::LazyLock;
use std::time::Duration;

#[cfg(test)]
use mockall::automock;

use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::events::Event;
use regex::Regex;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::{FEED_TIMEOUT_SECS, USER_AGENT};
use crate::version::error::FeedError;
use crate::version::types::AvailableModuleInfo;

static TITLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.+?)\s+v(\d[\d.]*(?:\s*[a-z]+)?)\s*\(updated\s+(.+?)\)")
        .expect("title pattern is valid")
});

/// Trait for retrieving available module versions from a remote source
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Location of the feed, for logging
    fn location(&self) -> String;

    /// Fetches every well-formed module entry the feed currently lists
    ///
    /// # Returns
    /// * `Ok(Vec<AvailableModuleInfo>)` - Entries in feed order
    /// * `Err(FeedError)` - If the feed could not be retrieved or parsed
    async fn fetch_modules(&self) -> Result<Vec<AvailableModuleInfo>, FeedError>;
}

/// Fetch a feed, absorbing every failure into an empty list.
pub async fn fetch_feed(feed: &dyn FeedSource) -> Vec<AvailableModuleInfo> {
    feed.fetch_modules()
        .await
        .inspect(|modules| debug!("Feed {} listed {} modules", feed.location(), modules.len()))
        .inspect_err(|e| warn!("Failed to fetch feed {}: {}", feed.location(), e))
        .unwrap_or_default()
}

/// RSS feed over HTTP(S)
pub struct RssFeed {
    client: Client,
    url: String,
}

impl RssFeed {
    /// Creates a feed client with the default timeout
    pub fn new(url: &str) -> Result<Self, FeedError> {
        Self::with_timeout(url, Duration::from_secs(FEED_TIMEOUT_SECS))
    }

    /// Creates a feed client whose requests give up after `timeout`
    pub fn with_timeout(url: &str, timeout: Duration) -> Result<Self, FeedError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

#[async_trait]
impl FeedSource for RssFeed {
    fn location(&self) -> String {
        self.url.clone()
    }

    async fn fetch_modules(&self) -> Result<Vec<AvailableModuleInfo>, FeedError> {
        debug!("Fetching feed: {}", self.url);

        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }

        let body = response.text().await?;
        parse_feed(&body)
    }
}

/// Raw text of one `<item>` element
#[derive(Debug, Default)]
struct FeedItem {
    title: String,
    link: String,
    description: String,
}

#[derive(Debug, Clone, Copy)]
enum ItemField {
    Title,
    Link,
    Description,
}

/// Parse an RSS document into module entries.
///
/// A document that is not well-formed XML, or has no `<channel>`, is an error
/// and yields nothing. Items inside a well-formed document are parsed one by
/// one; an item without a recognizable title is skipped.
pub fn parse_feed(xml: &str) -> Result<Vec<AvailableModuleInfo>, FeedError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut saw_channel = false;
    let mut current: Option<FeedItem> = None;
    let mut field: Option<ItemField> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"channel" => saw_channel = true,
                b"item" => current = Some(FeedItem::default()),
                b"title" if current.is_some() => field = Some(ItemField::Title),
                b"link" if current.is_some() => field = Some(ItemField::Link),
                b"description" if current.is_some() => field = Some(ItemField::Description),
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"item" => {
                    if let Some(item) = current.take() {
                        items.push(item);
                    }
                    field = None;
                }
                b"title" | b"link" | b"description" => field = None,
                _ => {}
            },
            Event::Text(text) => {
                if let (Some(item), Some(field)) = (current.as_mut(), field) {
                    let text = text.unescape()?;
                    append_field(item, field, &text);
                }
            }
            Event::CData(data) => {
                if let (Some(item), Some(field)) = (current.as_mut(), field) {
                    let text = String::from_utf8_lossy(&data);
                    append_field(item, field, &text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_channel {
        return Err(FeedError::InvalidDocument(
            "missing <channel> element".to_string(),
        ));
    }

    Ok(items.into_iter().filter_map(parse_item).collect())
}

fn append_field(item: &mut FeedItem, field: ItemField, text: &str) {
    let target = match field {
        ItemField::Title => &mut item.title,
        ItemField::Link => &mut item.link,
        ItemField::Description => &mut item.description,
    };
    target.push_str(text);
}

fn parse_item(item: FeedItem) -> Option<AvailableModuleInfo> {
    let Some((name, version, release_date)) = parse_title(&item.title) else {
        debug!("Skipping feed item with unrecognized title: {:?}", item.title);
        return None;
    };

    Some(AvailableModuleInfo {
        name,
        version,
        release_date,
        download_link: item.link.trim().to_string(),
        description: item.description.trim().to_string(),
    })
}

/// Split a feed title into (name, version, release date).
///
/// Examples:
/// - "Foo v1.2 (updated Jan 1, 2024)" -> ("Foo", "1.2", "Jan 1, 2024")
/// - "Bar Baz v3.0 BETA (updated Aug 21, 2025)" -> ("Bar Baz", "3.0 BETA", "Aug 21, 2025")
pub fn parse_title(title: &str) -> Option<(String, String, String)> {
    let captures = TITLE_PATTERN.captures(title.trim())?;

    let name = captures.get(1)?.as_str().trim();
    let version = captures.get(2)?.as_str().trim();
    let release_date = captures.get(3)?.as_str().trim();

    if name.is_empty() {
        return None;
    }

    Some((
        name.to_string(),
        version.to_string(),
        release_date.to_string(),
    ))
}
