// ABOUTME: Per-subtree text and tag statistics and the density scores derived from them.
// ABOUTME: Text density rewards plain text per tag and discounts text that sits inside links.

use std::f64::consts::E;

use ego_tree::NodeRef;
use scraper::Node;
use serde::Serialize;

use crate::dom::is_anchor;

/// Text length and tag counts for one element's subtree.
///
/// Text lengths are UTF-8 byte lengths. `tag_count` excludes the element
/// itself; link variants count what sits under an `<a>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DensityStats {
    pub char_count: usize,
    pub tag_count: i64,
    pub link_char_count: usize,
    pub link_tag_count: i64,
    /// Plain (non-link) text of the subtree, trimmed pieces joined without separators.
    pub cleaned_text: String,
}

/// Context carried down the subtree walk.
#[derive(Debug, Clone, Copy, Default)]
struct WalkContext {
    /// An element ancestor has been seen.
    in_text: bool,
    /// An `<a>` ancestor has been seen.
    in_link: bool,
}

#[derive(Debug)]
struct Accumulator {
    text: String,
    link_text: String,
    tags: i64,
    link_tags: i64,
}

fn walk(node: NodeRef<'_, Node>, ctx: WalkContext, acc: &mut Accumulator) {
    match node.value() {
        Node::Element(_) => {
            if ctx.in_link {
                acc.link_tags += 1;
            } else {
                acc.tags += 1;
            }
        }
        Node::Text(text) => {
            if ctx.in_link {
                acc.link_text.push_str(text.trim());
            } else if ctx.in_text {
                acc.text.push_str(text.trim());
            }
        }
        _ => {}
    }

    let is_element = node.value().is_element();
    let child_ctx = WalkContext {
        in_text: ctx.in_text || is_element,
        in_link: ctx.in_link || is_anchor(node.value()),
    };
    for child in node.children() {
        walk(child, child_ctx, acc);
    }
}

/// Strip carriage returns and newlines, then surrounding whitespace.
pub fn clean_text(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| *c != '\r' && *c != '\n').collect();
    stripped.trim().to_string()
}

/// Walk `node`'s whole subtree and collect its density statistics.
pub fn compute_density(node: NodeRef<'_, Node>) -> DensityStats {
    let mut acc = Accumulator {
        text: String::new(),
        link_text: String::new(),
        // The root element counts itself once, so start below zero.
        tags: -1,
        link_tags: 0,
    };
    walk(node, WalkContext::default(), &mut acc);

    let cleaned_text = clean_text(&acc.text);
    let link_text = clean_text(&acc.link_text);
    DensityStats {
        char_count: cleaned_text.len(),
        tag_count: acc.tags,
        link_char_count: link_text.len(),
        link_tag_count: acc.link_tags,
        cleaned_text,
    }
}

/// Clamp to at least one so the value is safe as a divisor or log argument.
fn at_least_one(v: i64) -> f64 {
    v.max(1) as f64
}

impl DensityStats {
    /// Characters per tag, or the raw character count for tagless subtrees.
    pub fn plain_density(&self) -> i64 {
        if self.tag_count > 0 {
            (self.char_count as f64 / self.tag_count as f64) as i64
        } else {
            self.char_count as i64
        }
    }

    /// Log-adjusted text density that discounts hyperlinked text.
    ///
    /// ```text
    /// (C / T) * ln(C * T / (LC * LT)) / ln(C * LC / (C - LC) + C + e)
    /// ```
    ///
    /// `T`, `LC`, `LT` and `C - LC` are clamped to at least 1; the result is
    /// truncated. A subtree without text scores 0.
    pub fn text_density(&self) -> i64 {
        if self.char_count == 0 {
            return 0;
        }
        let chars = self.char_count as f64;
        let unlinked = at_least_one(self.char_count as i64 - self.link_char_count as i64);
        let tags = at_least_one(self.tag_count);
        let link_chars = at_least_one(self.link_char_count as i64);
        let link_tags = at_least_one(self.link_tag_count);

        let numerator = (chars / tags) * ((chars * tags) / (link_chars * link_tags)).ln();
        let denominator = (chars * link_chars / unlinked + chars + E).ln();
        (numerator / denominator) as i64
    }

    /// Characters per tag weighted by `log2(C / LC)`; informational only.
    pub fn composite_score(&self) -> i64 {
        let chars = at_least_one(self.char_count as i64);
        let tags = at_least_one(self.tag_count);
        let link_chars = at_least_one(self.link_char_count as i64);
        ((chars / tags) * (chars / link_chars).log2()) as i64
    }
}
