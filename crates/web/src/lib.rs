// ABOUTME: Network-facing collaborators of the density extractor.
// ABOUTME: Fetching with charset decoding, feed retrieval, page info, readable rendering, HTTP API.

pub mod error;
pub mod feeds;
pub mod fetch;
pub mod info;
pub mod render;
pub mod server;

pub use error::{ErrorCode, FeedFetchError, WebError};
pub use feeds::{fetch_feed_items, FetchedFeed};
pub use fetch::{FetchOptions, FetchResult, Fetcher, FetcherBuilder};
pub use info::{page_info, PageInfo};
pub use render::{render_readable, wrap_document, RenderOptions};
pub use server::{router, AppState};
