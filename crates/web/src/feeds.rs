// ABOUTME: Loads a feed over HTTP and selects the items to extract.
// ABOUTME: Combines the fetcher's 403 retry with feed parsing and item selection.

use cetd_feed::{parse_feed_bytes, select_items, Feed, FeedItem};

use crate::error::FeedFetchError;
use crate::fetch::Fetcher;

/// A fetched feed together with the items chosen for extraction.
#[derive(Debug, Clone)]
pub struct FetchedFeed {
    pub feed: Feed,
    pub items: Vec<FeedItem>,
}

/// Fetch `url`, parse it as a feed and select up to `max_items` linked items.
pub async fn fetch_feed_items(
    fetcher: &Fetcher,
    url: &str,
    max_items: usize,
) -> Result<FetchedFeed, FeedFetchError> {
    let fetched = fetcher.get_with_retry(url).await?;
    let feed = parse_feed_bytes(&fetched.body, &fetched.url)?;
    let items = select_items(&feed, max_items)?;
    tracing::debug!(url, total = feed.items.len(), selected = items.len(), "loaded feed");
    Ok(FetchedFeed { feed, items })
}
