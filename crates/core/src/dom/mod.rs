// ABOUTME: DOM parsing and traversal helpers built on scraper's HTML document tree.
// ABOUTME: Hosts the sanitizer and the structural fingerprinter.

//! DOM utilities for the extraction pipeline.
//!
//! Documents are parsed with `scraper` (html5ever underneath) and walked
//! through the `ego_tree` arena it exposes. Nodes are referred to by
//! [`NodeId`](ego_tree::NodeId), which stays valid for the lifetime of the parsed [`Html`].

pub mod fingerprint;
pub mod sanitize;

use ego_tree::NodeRef;
use scraper::{Html, Node};

use crate::error::ExtractError;

/// Parse an HTML string into a document tree.
///
/// html5ever recovers from malformed markup and builds an html/head/body
/// skeleton even for empty input, so every string yields a document.
pub fn parse_document(html: &str) -> Result<Html, ExtractError> {
    let doc = Html::parse_document(html);
    if !doc.errors.is_empty() {
        tracing::debug!(errors = doc.errors.len(), "recovered from markup errors");
    }
    Ok(doc)
}

/// Parse raw bytes that are expected to hold UTF-8 HTML.
pub fn parse_document_bytes(bytes: &[u8]) -> Result<Html, ExtractError> {
    let html = std::str::from_utf8(bytes).map_err(ExtractError::parse)?;
    parse_document(html)
}

/// Lowercased-by-parser tag name of an element node.
pub fn element_name(node: &Node) -> Option<&str> {
    match node {
        Node::Element(el) => Some(el.name()),
        _ => None,
    }
}

/// True for `<a>` elements, which open hyperlink context.
pub fn is_anchor(node: &Node) -> bool {
    element_name(node) == Some("a")
}

/// Find the `<body>` element reachable from the document root.
pub fn find_body(doc: &Html) -> Option<NodeRef<'_, Node>> {
    doc.tree
        .root()
        .descendants()
        .find(|n| element_name(n.value()).is_some_and(|name| name.eq_ignore_ascii_case("body")))
}
