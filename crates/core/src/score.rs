// ABOUTME: Subtree score aggregation and content candidate selection.
// ABOUTME: Cumulative scores favour large dense containers; the best non-body entry wins.

use scraper::Html;

use crate::dom::fingerprint::fingerprint;
use crate::index::{Registry, TreeEntry};

/// Own text density plus the text density of every registered element in the subtree.
///
/// The walk starts at the entry's node itself, so the node's own density is
/// counted once more through its registry lookup. Descendants are looked up
/// by fingerprint, so a colliding element contributes the shared entry's density.
pub fn cumulative_score(registry: &Registry, doc: &Html, entry: &TreeEntry) -> i64 {
    let mut sum = entry.text_density();
    let Some(node) = doc.tree.get(entry.node) else {
        return sum;
    };
    for descendant in node.descendants() {
        if !descendant.value().is_element() {
            continue;
        }
        let key = fingerprint(descendant.value());
        if let Some(found) = registry.get(key.as_str()) {
            sum += found.text_density();
        }
    }
    sum
}

/// Entries sorted by cumulative score, best first. Ties keep registration order.
pub fn ranked(registry: &Registry) -> Vec<&TreeEntry> {
    let mut entries: Vec<&TreeEntry> = registry.entries().iter().collect();
    entries.sort_by(|a, b| b.score().cmp(&a.score()));
    entries
}

/// Pick the content candidate among the `top_n` best entries, skipping `<body>`.
///
/// Returns `None` when every examined entry is body-rooted or the registry is
/// empty; callers treat that as "no content".
pub fn select_candidate(registry: &Registry, top_n: usize) -> Option<&TreeEntry> {
    let candidate = ranked(registry)
        .into_iter()
        .take(top_n)
        .find(|entry| !entry.fingerprint.is_body_rooted());

    match candidate {
        Some(entry) => tracing::debug!(
            candidate = %entry.fingerprint,
            score = entry.score(),
            "selected content candidate"
        ),
        None => tracing::debug!(top_n, "no candidate outside body"),
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROSE: &str = "The quick brown fox jumps over the lazy dog while the \
        patient reader keeps following the sentence until it finally ends.";

    #[test]
    fn test_cumulative_counts_subtree() {
        let html = format!(
            "<body><div id='outer'><p>{PROSE}</p><p class='b'>{PROSE}</p></div></body>"
        );
        let doc = Html::parse_document(&html);
        let registry = Registry::build(&doc);

        let p = registry.get("p").unwrap();
        let p2 = registry.get("p class b").unwrap();
        let outer = registry.get("div id outer").unwrap();

        // a leaf counts its own density twice: once up front, once as the walk root
        assert_eq!(p.score(), 2 * p.text_density());
        assert_eq!(
            outer.score(),
            2 * outer.text_density() + p.text_density() + p2.text_density()
        );
        assert!(outer.score() > p.score());
    }

    #[test]
    fn test_ranked_ties_keep_registration_order() {
        let doc = Html::parse_document("<body><i></i><b></b><u></u></body>");
        let registry = Registry::build(&doc);
        let order: Vec<&str> = ranked(&registry)
            .iter()
            .map(|e| e.fingerprint.as_str())
            .collect();
        assert_eq!(order, vec!["body", "i", "b", "u"]);
    }

    #[test]
    fn test_candidate_skips_body() {
        let html = format!("<body><div id='main'><p>{PROSE}</p></div></body>");
        let doc = Html::parse_document(&html);
        let registry = Registry::build(&doc);

        let top = ranked(&registry)[0];
        assert!(top.fingerprint.is_body_rooted());
        let candidate = select_candidate(&registry, 10).unwrap();
        assert_eq!(candidate.fingerprint.as_str(), "div id main");
    }

    #[test]
    fn test_candidate_skips_body_with_attributes() {
        let html = format!("<body class='page'><article><p>{PROSE}</p></article></body>");
        let doc = Html::parse_document(&html);
        let registry = Registry::build(&doc);
        let candidate = select_candidate(&registry, 10).unwrap();
        assert_eq!(candidate.fingerprint.as_str(), "article");
    }

    #[test]
    fn test_candidate_none_when_only_body_examined() {
        let html = format!("<body><div><p>{PROSE}</p></div></body>");
        let doc = Html::parse_document(&html);
        let registry = Registry::build(&doc);
        assert!(select_candidate(&registry, 1).is_none());
    }

    #[test]
    fn test_candidate_none_for_empty_body() {
        let doc = Html::parse_document("<body></body>");
        let registry = Registry::build(&doc);
        assert_eq!(registry.len(), 1);
        assert!(select_candidate(&registry, 10).is_none());
    }

    #[test]
    fn test_candidate_none_without_body() {
        // fragments carry no <body>, so nothing is registered
        let doc = Html::parse_fragment("<div><p>text</p></div>");
        let registry = Registry::build(&doc);
        assert!(registry.is_empty());
        assert!(select_candidate(&registry, 10).is_none());
    }
}
