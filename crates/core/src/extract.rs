// ABOUTME: Threshold-driven text emission from the selected content candidate.
// ABOUTME: Inclusion propagates top-down from parents; included text nodes become Segments.

use std::collections::HashSet;

use ego_tree::NodeRef;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Node};
use serde::{Deserialize, Serialize};

use crate::dom::element_name;
use crate::dom::fingerprint::{fingerprint, Fingerprint};
use crate::index::{Registry, TreeEntry};

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// One piece of extracted text and the tag of the element that holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub tag: String,
    pub text: String,
}

impl Segment {
    pub fn new(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: text.into(),
        }
    }
}

/// Whether an element's text makes it into the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion {
    Included,
    Excluded,
}

/// Inclusion threshold for a candidate: `ratio` of its cumulative score, truncated.
pub fn threshold(candidate_score: i64, ratio: f64) -> i64 {
    (candidate_score as f64 * ratio) as i64
}

/// An element is included when it clears the threshold on its own or its parent was included.
pub fn inclusion(score: i64, threshold: i64, parent_included: bool) -> Inclusion {
    if score > threshold || parent_included {
        Inclusion::Included
    } else {
        Inclusion::Excluded
    }
}

/// Collapse every whitespace run to one space.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").into_owned()
}

struct Walker<'r> {
    registry: &'r Registry,
    threshold: i64,
    included: HashSet<Fingerprint>,
    out: Vec<Segment>,
}

impl Walker<'_> {
    fn element_state(&mut self, node: &Node, inherited: Inclusion) -> Inclusion {
        let key = fingerprint(node);
        let Some(entry) = self.registry.get(key.as_str()) else {
            return inherited;
        };

        let parent_included = entry
            .parent
            .as_ref()
            .is_some_and(|p| self.included.contains(p.as_str()));
        if inclusion(entry.score(), self.threshold, parent_included) == Inclusion::Included {
            self.included.insert(key.clone());
        }
        // A fingerprint included earlier stays included for every element sharing it.
        if self.included.contains(key.as_str()) {
            Inclusion::Included
        } else {
            Inclusion::Excluded
        }
    }

    fn visit(&mut self, node: NodeRef<'_, Node>, inherited: Inclusion, tag: &str) {
        match node.value() {
            Node::Element(el) => {
                let state = self.element_state(node.value(), inherited);
                for child in node.children() {
                    self.visit(child, state, el.name());
                }
            }
            Node::Text(text) => {
                if inherited == Inclusion::Included {
                    let collapsed = collapse_whitespace(text);
                    if !collapsed.is_empty() && collapsed != " " {
                        self.out.push(Segment::new(tag, collapsed));
                    }
                }
            }
            _ => {
                for child in node.children() {
                    self.visit(child, inherited, tag);
                }
            }
        }
    }
}

/// Walk the candidate's subtree once, top-down, and emit the text of included elements.
pub fn extract_segments(
    doc: &Html,
    registry: &Registry,
    candidate: &TreeEntry,
    threshold_ratio: f64,
) -> Vec<Segment> {
    let Some(root) = doc.tree.get(candidate.node) else {
        return Vec::new();
    };

    let mut walker = Walker {
        registry,
        threshold: threshold(candidate.score(), threshold_ratio),
        included: HashSet::new(),
        out: Vec::new(),
    };
    let tag = element_name(root.value()).unwrap_or_default().to_string();
    walker.visit(root, Inclusion::Excluded, &tag);

    tracing::debug!(
        threshold = walker.threshold,
        included = walker.included.len(),
        segments = walker.out.len(),
        "extracted candidate text"
    );
    walker.out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::select_candidate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("a\n\n   b\tc"), "a b c");
        assert_eq!(collapse_whitespace(" \n\t "), " ");
        assert_eq!(collapse_whitespace("plain"), "plain");
    }

    #[test]
    fn test_threshold_truncates() {
        assert_eq!(threshold(99, 0.2), 19);
        assert_eq!(threshold(100, 0.2), 20);
        assert_eq!(threshold(-7, 0.2), -1);
    }

    #[test]
    fn test_inclusion_monotonic_in_score() {
        let t = 50;
        for score in -100..200 {
            if inclusion(score, t, false) == Inclusion::Included {
                assert_eq!(inclusion(score + 1, t, false), Inclusion::Included);
            }
        }
        assert_eq!(inclusion(0, t, true), Inclusion::Included);
        assert_eq!(inclusion(t, t, false), Inclusion::Excluded);
    }

    #[test]
    fn test_segments_pair_text_with_enclosing_tag() {
        let html = "<body><div id='c'><h2>Heading text for the article</h2>\
            <p>First paragraph with <b>bold words</b> and a\n\n   tail\tend.</p></div></body>";
        let doc = Html::parse_document(html);
        let registry = Registry::build(&doc);
        let candidate = registry.get("div id c").unwrap();

        let segments = extract_segments(&doc, &registry, candidate, 0.0);
        assert_eq!(
            segments,
            vec![
                Segment::new("h2", "Heading text for the article"),
                Segment::new("p", "First paragraph with "),
                Segment::new("b", "bold words"),
                Segment::new("p", " and a tail end."),
            ]
        );
    }

    #[test]
    fn test_whitespace_only_text_is_skipped() {
        let html = "<body><div id='c'>\n   <p>kept text</p>\n</div></body>";
        let doc = Html::parse_document(html);
        let registry = Registry::build(&doc);
        let candidate = registry.get("div id c").unwrap();
        let segments = extract_segments(&doc, &registry, candidate, 0.0);
        assert_eq!(segments, vec![Segment::new("p", "kept text")]);
    }

    #[test]
    fn test_low_scoring_children_inherit_inclusion() {
        // the span alone scores far below 20% of the container, but its parent is included
        let long = "word ".repeat(80);
        let html = format!("<body><div id='c'><p>{long}<span>x</span></p></div></body>");
        let doc = Html::parse_document(&html);
        let registry = Registry::build(&doc);
        let candidate = select_candidate(&registry, 10).unwrap();
        let span = registry.get("span").unwrap();
        assert!(span.score() <= threshold(candidate.score(), 0.2));

        let segments = extract_segments(&doc, &registry, candidate, 0.2);
        assert!(segments.iter().any(|s| s.tag == "span" && s.text == "x"));
    }

    #[test]
    fn test_colliding_fingerprints_follow_last_parent() {
        // Both <p> share one entry whose parent is the last one's: div.b.
        let long = "y".repeat(400);
        let html = format!(
            "<body><div id='c'><div class='a'><p>first note</p></div>\
             <div class='b'><p>second note</p></div><article>{long}</article></div></body>"
        );
        let doc = Html::parse_document(&html);
        let registry = Registry::build(&doc);
        let candidate = registry.get("div id c").unwrap();
        let p = registry.get("p").unwrap();
        assert_eq!(p.parent.as_ref().map(|f| f.as_str()), Some("div class b"));
        assert!(p.score() <= threshold(candidate.score(), 0.2));

        // The first <p> is checked before div.b is included, the second after.
        let segments = extract_segments(&doc, &registry, candidate, 0.2);
        assert_eq!(
            segments,
            vec![Segment::new("p", "second note"), Segment::new("article", long)]
        );
    }

    #[test]
    fn test_excluded_sibling_emits_nothing() {
        let long = "Sentence of real prose that goes on. ".repeat(10);
        let html = format!(
            "<body><div id='c'><p class='a'>{long}</p><ul><li><a href='/1'>one</a></li></ul></div></body>"
        );
        let doc = Html::parse_document(&html);
        let registry = Registry::build(&doc);
        let candidate = registry.get("div id c").unwrap();

        // With the candidate itself excluded nothing propagates, so only
        // elements clearing the threshold on their own speak.
        let huge_ratio = 10.0;
        let segments = extract_segments(&doc, &registry, candidate, huge_ratio);
        assert!(segments.is_empty());

        let segments = extract_segments(&doc, &registry, candidate, 0.2);
        assert!(segments.iter().any(|s| s.tag == "a" && s.text == "one"));
        assert!(segments.iter().any(|s| s.tag == "p"));
    }
}
