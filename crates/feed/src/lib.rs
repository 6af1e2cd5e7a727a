// ABOUTME: Feed parsing library used to enumerate article links for extraction.
// ABOUTME: Provides feed parsing, item selection, and the FeedError type.

pub mod error;
pub mod items;
pub mod models;
pub mod parser;

pub use error::FeedError;
pub use items::select_items;
pub use models::{Feed, FeedItem};
pub use parser::parse_feed_bytes;
