// ABOUTME: Main library entry point for the cetd content extraction engine.
// ABOUTME: Re-exports the public API: Extractor, ExtractorBuilder, Options, Registry, Segment, ExtractError.

//! cetd - content extraction via tag/text density.
//!
//! The engine turns an HTML page into the ordered text of its main content
//! region. It strips boilerplate subtrees, indexes every element under
//! `<body>` by a structural fingerprint, scores each element by how much
//! plain (non-link) text it carries per tag, and emits the text of the best
//! scoring container.
//!
//! Every call builds its own [`Registry`], so independent documents can be
//! processed concurrently without any shared state.
//!
//! # Example
//!
//! ```
//! use cetd_core::extract_html;
//!
//! let html = "<html><body><div><p>Some article text.</p></div></body></html>";
//! let extraction = extract_html(html).unwrap();
//! for segment in &extraction.segments {
//!     println!("{}:{}", segment.tag, segment.text);
//! }
//! ```

pub mod density;
pub mod dom;
pub mod error;
pub mod extract;
pub mod extractor;
pub mod index;
pub mod options;
pub mod score;

pub use crate::density::DensityStats;
pub use crate::dom::fingerprint::{fingerprint, Fingerprint};
pub use crate::dom::sanitize::sanitize;
pub use crate::error::ExtractError;
pub use crate::extract::{collapse_whitespace, extract_segments, Inclusion, Segment};
pub use crate::extractor::{Analysis, CandidateSummary, Extraction, Extractor};
pub use crate::index::{Registry, TreeEntry};
pub use crate::options::{ExtractorBuilder, Options, DEFAULT_REMOVAL_TAGS};
pub use crate::score::select_candidate;

/// Extract the main content of `html` using default options.
pub fn extract_html(html: &str) -> Result<Extraction, ExtractError> {
    Extractor::default().extract(html)
}
