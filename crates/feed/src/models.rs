// ABOUTME: Rust models for parsed feed data.
// ABOUTME: Only the fields needed to enumerate and label article links are kept.

use serde::{Deserialize, Serialize};

/// A single item/entry within a feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: String,
    /// Article URL; empty when the entry carries no usable link.
    pub link: String,
    pub guid: String,
    /// Plain-text summary with markup stripped.
    pub summary: String,
    pub published_ms: u64,
}

/// A parsed feed with metadata and items in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    pub title: String,
    pub home_url: String,
    pub feed_url: String,
    pub items: Vec<FeedItem>,
}
