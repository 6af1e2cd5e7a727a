// ABOUTME: Renders the detected content region as a small readable HTML page.
// ABOUTME: Cleans the candidate subtree with an ammonia allow-list and falls back to <body> for short output.

use std::collections::{HashMap, HashSet};

use cetd_core::dom::{find_body, parse_document};
use cetd_core::{collapse_whitespace, Extractor};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use scraper::{ElementRef, Html};
use url::Url;

use crate::error::WebError;

/// Tags kept in rendered content.
pub const ALLOWED_TAGS: &[&str] = &[
    "p", "a", "img", "pre", "b", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "hr",
    "strong", "sup", "ul", "ol", "li", "code", "table", "tr", "td",
];

pub const DEFAULT_MIN_TEXT_LENGTH: usize = 250;

pub const STYLESHEET_URL: &str =
    "https://cdn.jsdelivr.net/gh/kognise/water.css@latest/dist/dark.min.css";

static ROOT_RELATIVE_IMG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(<img\b[^>]*?\bsrc=")/([^/])"#).unwrap());

/// Options for [`render_readable`].
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Below this many characters of text the whole body is rendered instead.
    pub min_text_length: usize,
    pub extractor: Extractor,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            min_text_length: DEFAULT_MIN_TEXT_LENGTH,
            extractor: Extractor::default(),
        }
    }
}

fn clean_fragment(html: &str) -> String {
    let tag_attributes: HashMap<&str, HashSet<&str>> = HashMap::from([
        ("img", HashSet::from(["src", "title"])),
        ("a", HashSet::from(["href"])),
    ]);

    let cleaned = ammonia::Builder::new()
        .tags(ALLOWED_TAGS.iter().copied().collect())
        .tag_attributes(tag_attributes)
        .generic_attributes(HashSet::new())
        .link_rel(None)
        .clean(html)
        .to_string();

    let cleaned = cleaned.replace("src=\"//", "src=\"http://");
    collapse_whitespace(&cleaned).trim().to_string()
}

/// Number of visible characters in an HTML fragment.
fn text_length(html: &str) -> usize {
    let fragment = Html::parse_fragment(html);
    let text: String = fragment.root_element().text().collect();
    collapse_whitespace(&text).trim().chars().count()
}

/// Extract the content region of `html` as cleaned HTML.
///
/// Returns an empty string when neither the candidate nor the body has any
/// renderable content.
pub fn render_readable(
    html: &str,
    page_url: &str,
    opts: &RenderOptions,
) -> Result<String, WebError> {
    let mut doc = parse_document(html)
        .map_err(|e| WebError::extract(page_url, "render_readable", Some(e.into())))?;
    let analysis = opts.extractor.analyze(&mut doc);

    let mut content = analysis
        .candidate_element(&doc)
        .map(|el| clean_fragment(&el.html()))
        .unwrap_or_default();

    let length = text_length(&content);
    if length < opts.min_text_length {
        if let Some(body) = find_body(&doc).and_then(ElementRef::wrap) {
            let whole = clean_fragment(&body.html());
            let whole_length = text_length(&whole);
            if whole_length > length {
                tracing::debug!(
                    url = page_url,
                    candidate = length,
                    body = whole_length,
                    "candidate too short, rendering body"
                );
                content = whole;
            }
        }
    }
    Ok(content)
}

/// `scheme://host[:port]/` of the page, or `None` for unparseable URLs.
fn site_root(page_url: &str) -> Option<String> {
    let url = Url::parse(page_url).ok()?;
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}://{}:{}/", url.scheme(), host, port),
        None => format!("{}://{}/", url.scheme(), host),
    })
}

/// Wrap rendered content in a standalone UTF-8 document with a stylesheet.
///
/// Root-relative image sources are made absolute against the page's site root.
pub fn wrap_document(content: &str, page_url: &str) -> String {
    let body = match site_root(page_url) {
        Some(root) => ROOT_RELATIVE_IMG
            .replace_all(content, |caps: &Captures| {
                format!("<br/>{}{}{}", &caps[1], root, &caps[2])
            })
            .into_owned(),
        None => content.to_string(),
    };
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
         <link rel=\"stylesheet\" href=\"{}\"/></head><body>{}</body></html>",
        STYLESHEET_URL, body
    )
}
