// ABOUTME: Error types for the extraction engine.
// ABOUTME: Provides ExtractError with Parse and InvalidOptions variants.

use std::fmt;
use thiserror::Error;

/// Errors that can occur while extracting content from a document.
///
/// Finding no content is not an error: it yields an empty
/// [`Extraction`](crate::Extraction).
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The input could not be turned into a usable document tree.
    #[error("parse failed: {0}")]
    Parse(String),

    /// The extractor was configured with values it cannot work with.
    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

impl ExtractError {
    /// Creates a Parse error from any displayable cause.
    pub fn parse(err: impl fmt::Display) -> Self {
        ExtractError::Parse(err.to_string())
    }

    /// Creates an InvalidOptions error with a custom message.
    pub fn invalid_options(msg: impl Into<String>) -> Self {
        ExtractError::InvalidOptions(msg.into())
    }

    /// Returns true if this is a Parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, ExtractError::Parse(_))
    }
}
