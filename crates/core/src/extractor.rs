// ABOUTME: The extraction pipeline: sanitize, index, measure, aggregate, select, emit.
// ABOUTME: Each call owns a fresh Registry, so an Extractor can be shared across threads.

use scraper::{ElementRef, Html};
use serde::Serialize;

use crate::dom::{parse_document, parse_document_bytes};
use crate::dom::fingerprint::Fingerprint;
use crate::dom::sanitize::sanitize;
use crate::error::ExtractError;
use crate::extract::{extract_segments, threshold, Segment};
use crate::index::{Registry, TreeEntry};
use crate::options::{ExtractorBuilder, Options};
use crate::score::select_candidate;

/// Summary of the element chosen as the content root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateSummary {
    pub fingerprint: Fingerprint,
    pub tag: String,
    pub cumulative_score: i64,
    pub threshold: i64,
}

/// Result of one extraction run. An empty `segments` list means no content was found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub candidate: Option<CandidateSummary>,
    pub segments: Vec<Segment>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segment texts joined by single spaces, trimmed.
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Scored view of a sanitized document.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub registry: Registry,
    pub candidate: Option<Fingerprint>,
}

impl Analysis {
    pub fn candidate_entry(&self) -> Option<&TreeEntry> {
        self.candidate
            .as_ref()
            .and_then(|key| self.registry.get(key.as_str()))
    }

    /// The candidate element inside the analysed document.
    pub fn candidate_element<'a>(&self, doc: &'a Html) -> Option<ElementRef<'a>> {
        let entry = self.candidate_entry()?;
        doc.tree.get(entry.node).and_then(ElementRef::wrap)
    }
}

/// Density-based content extractor.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    opts: Options,
}

impl Extractor {
    /// Create an extractor. Prefer [`Extractor::builder`], which validates options.
    pub fn new(opts: Options) -> Self {
        Self { opts }
    }

    pub fn builder() -> ExtractorBuilder {
        ExtractorBuilder::new()
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Parse `html` and extract its main content.
    pub fn extract(&self, html: &str) -> Result<Extraction, ExtractError> {
        let mut doc = parse_document(html)?;
        self.extract_document(&mut doc)
    }

    /// Like [`Extractor::extract`] for raw UTF-8 bytes.
    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<Extraction, ExtractError> {
        let mut doc = parse_document_bytes(bytes)?;
        self.extract_document(&mut doc)
    }

    /// Extract from an already parsed document. The document is sanitized in place.
    pub fn extract_document(&self, doc: &mut Html) -> Result<Extraction, ExtractError> {
        self.opts.validate()?;
        let analysis = self.analyze(doc);
        let Some(entry) = analysis.candidate_entry() else {
            return Ok(Extraction::default());
        };

        let segments = extract_segments(doc, &analysis.registry, entry, self.opts.threshold_ratio);
        let tag = doc
            .tree
            .get(entry.node)
            .and_then(ElementRef::wrap)
            .map(|el| el.value().name().to_string())
            .unwrap_or_default();
        Ok(Extraction {
            candidate: Some(CandidateSummary {
                fingerprint: entry.fingerprint.clone(),
                tag,
                cumulative_score: entry.score(),
                threshold: threshold(entry.score(), self.opts.threshold_ratio),
            }),
            segments,
        })
    }

    /// Sanitize `doc`, score it, and pick a candidate without emitting text.
    pub fn analyze(&self, doc: &mut Html) -> Analysis {
        sanitize(doc, &self.opts.removal_tags);
        let registry = Registry::build(doc);
        let candidate = select_candidate(&registry, self.opts.top_candidates)
            .map(|entry| entry.fingerprint.clone());
        Analysis {
            registry,
            candidate,
        }
    }
}
