// ABOUTME: Feed parsing implementation using feed-rs.
// ABOUTME: Maps RSS, Atom and JSON Feed entries to FeedItem with plain-text summaries.

use crate::error::FeedError;
use crate::models::{Feed, FeedItem};
use feed_rs::model::{Entry, Link};
use scraper::Html;

/// Parses feed bytes into a Feed struct.
///
/// # Arguments
/// * `data` - Raw feed bytes (RSS, Atom, or JSON Feed)
/// * `feed_url` - The URL the feed was fetched from (stored as-is)
///
/// An empty feed parses successfully; [`select_items`](crate::select_items)
/// is where "no items" is reported.
pub fn parse_feed_bytes(data: &[u8], feed_url: &str) -> Result<Feed, FeedError> {
    let parsed = feed_rs::parser::parse(data).map_err(FeedError::parse)?;

    let items = parsed.entries.iter().map(map_entry).collect();

    Ok(Feed {
        title: parsed.title.map(|t| t.content).unwrap_or_default(),
        home_url: extract_home_url(&parsed.links),
        feed_url: feed_url.to_string(),
        items,
    })
}

fn extract_home_url(links: &[Link]) -> String {
    // First try rel="alternate"
    for link in links {
        if link.rel.as_deref() == Some("alternate") {
            return link.href.clone();
        }
    }

    links.first().map(|l| l.href.clone()).unwrap_or_default()
}

fn is_enclosure_link(link: &Link) -> bool {
    link.rel.as_deref() == Some("enclosure")
}

/// Article link of an entry: rel="alternate", else the first non-enclosure link.
fn extract_item_link(entry: &Entry) -> String {
    entry
        .links
        .iter()
        .find(|l| l.rel.as_deref() == Some("alternate"))
        .or_else(|| entry.links.iter().find(|l| !is_enclosure_link(l)))
        .map(|l| l.href.trim().to_string())
        .unwrap_or_default()
}

/// Strip markup from an HTML snippet and collapse whitespace.
fn plain_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text: String = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn map_entry(entry: &Entry) -> FeedItem {
    let summary_html = entry
        .summary
        .as_ref()
        .map(|t| t.content.as_str())
        .unwrap_or_default();

    FeedItem {
        title: entry
            .title
            .as_ref()
            .map(|t| t.content.clone())
            .unwrap_or_default(),
        link: extract_item_link(entry),
        guid: entry.id.clone(),
        summary: plain_text(summary_html),
        published_ms: entry
            .published
            .or(entry.updated)
            .and_then(|dt| u64::try_from(dt.timestamp_millis()).ok())
            .unwrap_or(0),
    }
}
