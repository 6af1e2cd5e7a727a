// ABOUTME: Page-level metadata read from the document head (title, description, images, icon).
// ABOUTME: Relative URLs are resolved against the page URL.

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

/// Metadata describing a fetched page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    pub title: String,
    pub description: String,
    pub canonical_url: String,
    pub site_name: String,
    pub image_url: String,
    pub favicon_url: String,
    pub language: String,
}

fn first_attr(doc: &Html, selector: &str, attr: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    doc.select(&sel)
        .filter_map(|el| el.value().attr(attr))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

fn meta(doc: &Html, property: &str, name: &str) -> Option<String> {
    first_attr(doc, &format!("meta[property='{}']", property), "content")
        .or_else(|| first_attr(doc, &format!("meta[name='{}']", name), "content"))
}

fn first_text(doc: &Html, selector: &str) -> Option<String> {
    let sel = Selector::parse(selector).ok()?;
    doc.select(&sel)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .find(|t| !t.is_empty())
}

/// Read page metadata from `html`. `base_url` may be empty, in which case
/// relative URLs are returned unresolved.
pub fn page_info(html: &str, base_url: &str) -> PageInfo {
    let doc = Html::parse_document(html);
    let base = Url::parse(base_url).ok();
    let resolve = |raw: String| -> String {
        base.as_ref()
            .and_then(|b| b.join(&raw).ok())
            .map(|u| u.to_string())
            .unwrap_or(raw)
    };

    let favicon = first_attr(&doc, "link[rel='icon']", "href")
        .or_else(|| first_attr(&doc, "link[rel='shortcut icon']", "href"))
        .or_else(|| first_attr(&doc, "link[rel='apple-touch-icon']", "href"))
        .map(&resolve)
        .or_else(|| {
            base.as_ref()
                .and_then(|b| b.join("/favicon.ico").ok())
                .map(|u| u.to_string())
        });

    PageInfo {
        title: meta(&doc, "og:title", "twitter:title")
            .or_else(|| first_text(&doc, "title"))
            .unwrap_or_default(),
        description: meta(&doc, "og:description", "description").unwrap_or_default(),
        canonical_url: first_attr(&doc, "link[rel='canonical']", "href")
            .or_else(|| meta(&doc, "og:url", "twitter:url"))
            .map(&resolve)
            .unwrap_or_else(|| base_url.to_string()),
        site_name: meta(&doc, "og:site_name", "application-name").unwrap_or_default(),
        image_url: meta(&doc, "og:image", "twitter:image")
            .map(&resolve)
            .unwrap_or_default(),
        favicon_url: favicon.unwrap_or_default(),
        language: first_attr(&doc, "html", "lang")
            .or_else(|| meta(&doc, "og:locale", "language"))
            .unwrap_or_default(),
    }
}
