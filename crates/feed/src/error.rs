// ABOUTME: Error types for feed parsing operations.
// ABOUTME: Provides FeedError with Parse and NoItems variants.

use std::fmt;
use thiserror::Error;

/// Errors that can occur while turning feed bytes into items.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Failed to parse the feed data (malformed XML/JSON).
    #[error("failed to parse feed: {0}")]
    Parse(String),

    /// The feed parsed but contains no items.
    #[error("feed has no items: {0}")]
    NoItems(String),
}

impl FeedError {
    /// Creates a Parse error from an underlying feed-rs error.
    pub fn parse(err: impl fmt::Display) -> Self {
        FeedError::Parse(err.to_string())
    }

    /// Creates a NoItems error for the given feed URL.
    pub fn no_items(feed_url: impl Into<String>) -> Self {
        FeedError::NoItems(feed_url.into())
    }

    /// Returns true if the feed parsed but was empty.
    pub fn is_no_items(&self) -> bool {
        matches!(self, FeedError::NoItems(_))
    }
}
