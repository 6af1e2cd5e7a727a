// ABOUTME: Configuration options for the extraction engine including Options and ExtractorBuilder.
// ABOUTME: ExtractorBuilder provides a fluent API for constructing validated Extractor instances.

use crate::error::ExtractError;
use crate::extractor::Extractor;

/// Tags whose whole subtree is dropped before analysis.
pub const DEFAULT_REMOVAL_TAGS: &[&str] = &[
    "style", "script", "svg", "nav", "aside", "form", "noscript", "xmp", "textarea", "air",
];

/// Number of best-scoring entries examined when picking a candidate.
pub const DEFAULT_TOP_CANDIDATES: usize = 10;

/// Share of the candidate's cumulative score a node must exceed to be included.
pub const DEFAULT_THRESHOLD_RATIO: f64 = 0.2;

/// Configuration options for an [`Extractor`].
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// How many entries, best first, are examined for a non-body candidate.
    pub top_candidates: usize,
    /// Multiplier applied to the candidate's cumulative score to get the inclusion threshold.
    pub threshold_ratio: f64,
    /// Lowercased tag names removed by the sanitizer. Comments are always removed.
    pub removal_tags: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            top_candidates: DEFAULT_TOP_CANDIDATES,
            threshold_ratio: DEFAULT_THRESHOLD_RATIO,
            removal_tags: DEFAULT_REMOVAL_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl Options {
    /// Check that the options describe a usable configuration.
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.top_candidates == 0 {
            return Err(ExtractError::invalid_options(
                "top_candidates must be at least 1",
            ));
        }
        if !self.threshold_ratio.is_finite() || self.threshold_ratio < 0.0 {
            return Err(ExtractError::invalid_options(format!(
                "threshold_ratio must be a finite non-negative number, got {}",
                self.threshold_ratio
            )));
        }
        Ok(())
    }
}

/// Builder for constructing Extractor instances with custom configuration.
#[derive(Debug, Clone)]
pub struct ExtractorBuilder {
    opts: Options,
}

impl ExtractorBuilder {
    /// Create a new ExtractorBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    /// Set how many top-scoring entries are examined for a candidate.
    pub fn top_candidates(mut self, n: usize) -> Self {
        self.opts.top_candidates = n;
        self
    }

    /// Set the inclusion threshold ratio.
    pub fn threshold_ratio(mut self, ratio: f64) -> Self {
        self.opts.threshold_ratio = ratio;
        self
    }

    /// Replace the set of tags removed before analysis.
    pub fn removal_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.opts.removal_tags = tags
            .into_iter()
            .map(|t| t.into().to_lowercase())
            .collect();
        self
    }

    /// Add one tag to the removal set.
    pub fn remove_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into().to_lowercase();
        if !self.opts.removal_tags.contains(&tag) {
            self.opts.removal_tags.push(tag);
        }
        self
    }

    /// Build the Extractor, validating the configured options.
    pub fn build(self) -> Result<Extractor, ExtractError> {
        self.opts.validate()?;
        Ok(Extractor::new(self.opts))
    }
}

impl Default for ExtractorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
