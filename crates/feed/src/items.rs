// ABOUTME: Chooses which feed items are handed on for content extraction.
// ABOUTME: Takes the newest window of items, oldest first, skipping items without links.

use crate::error::FeedError;
use crate::models::{Feed, FeedItem};

/// Select up to `max_items` linked items from the head of the feed.
///
/// Feeds list newest first; the window of the first `max_items` entries is
/// returned oldest first. Entries without a link are skipped. A feed with no
/// entries at all is reported as [`FeedError::NoItems`] rather than an empty
/// list, so callers can tell "nothing published" from "nothing to extract".
pub fn select_items(feed: &Feed, max_items: usize) -> Result<Vec<FeedItem>, FeedError> {
    if feed.items.is_empty() {
        return Err(FeedError::no_items(&feed.feed_url));
    }

    let selected: Vec<FeedItem> = feed
        .items
        .iter()
        .take(max_items)
        .rev()
        .filter(|item| !item.link.is_empty())
        .cloned()
        .collect();

    for item in &selected {
        tracing::debug!(link = %item.link, "selected feed item");
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(link: &str) -> FeedItem {
        FeedItem {
            link: link.to_string(),
            ..Default::default()
        }
    }

    fn feed(links: &[&str]) -> Feed {
        Feed {
            feed_url: "https://example.com/feed".to_string(),
            items: links.iter().map(|l| item(l)).collect(),
            ..Default::default()
        }
    }

    fn links(items: &[FeedItem]) -> Vec<&str> {
        items.iter().map(|i| i.link.as_str()).collect()
    }

    #[test]
    fn test_empty_feed_is_no_items() {
        let err = select_items(&feed(&[]), 5).unwrap_err();
        assert!(err.is_no_items());
        assert_eq!(err.to_string(), "feed has no items: https://example.com/feed");
    }

    #[test]
    fn test_window_is_reversed() {
        let f = feed(&["/4", "/3", "/2", "/1"]);
        assert_eq!(links(&select_items(&f, 2).unwrap()), vec!["/3", "/4"]);
        assert_eq!(
            links(&select_items(&f, 10).unwrap()),
            vec!["/1", "/2", "/3", "/4"]
        );
    }

    #[test]
    fn test_items_without_links_are_skipped() {
        let f = feed(&["/3", "", "/1"]);
        assert_eq!(links(&select_items(&f, 3).unwrap()), vec!["/1", "/3"]);
    }

    #[test]
    fn test_zero_max_items_selects_nothing() {
        let f = feed(&["/1"]);
        assert!(select_items(&f, 0).unwrap().is_empty());
    }
}
