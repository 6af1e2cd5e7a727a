// ABOUTME: Removes boilerplate subtrees and comments from a parsed document before scoring.
// ABOUTME: Runs to a fixed point, restarting the search from the root after every removal.

use ego_tree::{NodeId, Tree};
use scraper::{Html, Node};

/// True when the node must be dropped: a comment, or an element whose tag is in `removal_tags`.
fn is_removable(node: &Node, removal_tags: &[String]) -> bool {
    match node {
        Node::Comment(_) => true,
        Node::Element(el) => {
            let name = el.name().to_lowercase();
            removal_tags.iter().any(|t| *t == name)
        }
        _ => false,
    }
}

/// First removable node in pre-order, searching from the document root.
fn find_removable(tree: &Tree<Node>, removal_tags: &[String]) -> Option<NodeId> {
    tree.root()
        .descendants()
        .find(|n| is_removable(n.value(), removal_tags))
        .map(|n| n.id())
}

/// Detach every comment and every element named in `removal_tags`.
///
/// Each removal invalidates the walk in progress, so the search restarts from
/// the root until a full pass finds nothing. Returns the number of subtrees
/// detached; a document with nothing to remove is left untouched.
pub fn sanitize(doc: &mut Html, removal_tags: &[String]) -> usize {
    let mut removed = 0;
    while let Some(id) = find_removable(&doc.tree, removal_tags) {
        match doc.tree.get_mut(id) {
            Some(mut node) => node.detach(),
            None => break,
        }
        removed += 1;
    }
    tracing::debug!(removed, "sanitized document");
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::DEFAULT_REMOVAL_TAGS;

    fn defaults() -> Vec<String> {
        DEFAULT_REMOVAL_TAGS.iter().map(|t| t.to_string()).collect()
    }

    fn leftovers(doc: &Html, tags: &[String]) -> usize {
        doc.tree
            .root()
            .descendants()
            .filter(|n| is_removable(n.value(), tags))
            .count()
    }

    fn body_text(doc: &Html) -> String {
        doc.tree
            .root()
            .descendants()
            .filter_map(|n| n.value().as_text().map(|t| (&**t).to_string()))
            .collect()
    }

    #[test]
    fn test_removes_listed_tags_and_comments() {
        let mut doc = Html::parse_document(
            r#"<html><head><style>p{}</style><script>var x;</script></head><body>
            <!-- banner -->
            <nav><a href="/">Home</a></nav>
            <div>keep<script>evil()</script><aside>side</aside></div>
            <form><textarea>t</textarea></form>
            <svg><text>chart</text></svg>
            <noscript>js off</noscript>
            </body></html>"#,
        );
        let tags = defaults();
        let removed = sanitize(&mut doc, &tags);

        // style, script, nav, script, aside, form, svg, noscript, comment
        assert_eq!(removed, 9);
        assert_eq!(leftovers(&doc, &tags), 0);
        let text = body_text(&doc);
        assert!(text.contains("keep"));
        assert!(!text.contains("Home"));
        assert!(!text.contains("evil"));
        assert!(!text.contains("chart"));
    }

    #[test]
    fn test_nested_removals_count_once() {
        let mut doc =
            Html::parse_document("<body><nav><script>x</script><aside>y</aside></nav></body>");
        assert_eq!(sanitize(&mut doc, &defaults()), 1);
    }

    #[test]
    fn test_idempotent() {
        let mut doc = Html::parse_document(
            "<body><!-- c --><div><style>a{}</style><p>text</p></div><xmp>raw</xmp></body>",
        );
        let tags = defaults();
        assert!(sanitize(&mut doc, &tags) > 0);
        let first = doc.root_element().html();
        assert_eq!(sanitize(&mut doc, &tags), 0);
        assert_eq!(doc.root_element().html(), first);
    }

    #[test]
    fn test_clean_document_is_noop() {
        let mut doc = Html::parse_document("<body><div><p>only text</p></div></body>");
        let before = doc.root_element().html();
        assert_eq!(sanitize(&mut doc, &defaults()), 0);
        assert_eq!(doc.root_element().html(), before);
    }

    #[test]
    fn test_custom_removal_set() {
        let mut doc = Html::parse_document("<body><footer>f</footer><nav>n</nav></body>");
        let tags = vec!["footer".to_string()];
        assert_eq!(sanitize(&mut doc, &tags), 1);
        assert!(body_text(&doc).contains('n'));
    }
}
