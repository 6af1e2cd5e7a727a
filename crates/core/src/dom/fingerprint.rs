// ABOUTME: Structural fingerprints used to key elements in the registry.
// ABOUTME: A fingerprint is the lowercased tag name followed by its attributes in source order.

use std::borrow::Borrow;
use std::fmt;

use scraper::Node;
use serde::Serialize;

/// Structural fingerprint of an element: tag name plus attributes.
///
/// This is not a unique node identity. Two elements with the same tag and the
/// same attribute list share a fingerprint wherever they sit in the tree, and
/// the registry keeps a single entry for them. Ranking depends on that
/// collapsing, so do not turn this into a per-node key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Wrap an already-normalized fingerprint string.
    pub fn new(s: impl Into<String>) -> Self {
        Fingerprint(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Empty fingerprints stand for "not an element".
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether this fingerprint names a `<body>` element, which is never a candidate.
    pub fn is_body_rooted(&self) -> bool {
        self.0.starts_with("body")
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Fingerprint {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Compute the fingerprint of a node. Non-element nodes get an empty fingerprint.
pub fn fingerprint(node: &Node) -> Fingerprint {
    let Node::Element(el) = node else {
        return Fingerprint::default();
    };

    let mut key = el.name().to_string();
    for (name, value) in el.attrs() {
        key.push(' ');
        key.push_str(name);
        key.push(' ');
        key.push_str(value);
    }
    Fingerprint(key.to_lowercase())
}
