//! Parser trait definitions and error types.
//!
//! This module defines the `AdvisoryParser` trait for format-specific parsers
//! and the confidence scoring used to pick one.

use crate::model::CvrfDocument;
use crate::tree::TreeError;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during advisory parsing
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("XML parse error: {0}")]
    XmlError(String),

    #[error("Unknown advisory format: {0}")]
    UnknownFormat(String),

    #[error("Invalid advisory structure: {0}")]
    InvalidStructure(String),

    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl From<std::io::Error> for ParseError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

impl From<quick_xml::Error> for ParseError {
    fn from(err: quick_xml::Error) -> Self {
        Self::XmlError(err.to_string())
    }
}

/// Confidence level for format detection
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct FormatConfidence(f32);

impl FormatConfidence {
    /// No confidence - definitely not this format
    pub const NONE: Self = Self(0.0);
    /// Low confidence - might be this format
    pub const LOW: Self = Self(0.25);
    /// Medium confidence - likely this format
    pub const MEDIUM: Self = Self(0.5);
    /// High confidence - almost certainly this format
    pub const HIGH: Self = Self(0.75);
    /// Certain - definitely this format
    pub const CERTAIN: Self = Self(1.0);

    /// Create a new confidence value
    #[must_use]
    pub fn new(value: f32) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    /// Get the confidence value
    #[must_use]
    pub const fn value(&self) -> f32 {
        self.0
    }

    /// Check if this confidence indicates the format can be parsed
    #[must_use]
    pub fn can_parse(&self) -> bool {
        self.0 >= 0.25
    }
}

impl Default for FormatConfidence {
    fn default() -> Self {
        Self::NONE
    }
}

/// Detection result from a parser
#[derive(Debug, Clone, Default)]
pub struct FormatDetection {
    /// Confidence that this parser can handle the content
    pub confidence: FormatConfidence,
    /// Detected schema version if applicable
    pub version: Option<String>,
    /// Any issues detected that might affect parsing
    pub warnings: Vec<String>,
}

impl FormatDetection {
    /// Create a detection result indicating no match
    #[must_use]
    pub const fn no_match() -> Self {
        Self {
            confidence: FormatConfidence::NONE,
            version: None,
            warnings: Vec::new(),
        }
    }

    /// Create a detection result with confidence
    #[must_use]
    pub const fn with_confidence(confidence: FormatConfidence) -> Self {
        Self {
            confidence,
            version: None,
            warnings: Vec::new(),
        }
    }

    /// Set the detected version
    #[must_use]
    pub fn version(mut self, version: &str) -> Self {
        self.version = Some(version.to_string());
        self
    }

    /// Add a warning
    #[must_use]
    pub fn warning(mut self, warning: &str) -> Self {
        self.warnings.push(warning.to_string());
        self
    }
}

/// Trait for advisory format parsers
///
/// Implementors provide format detection via `detect()` and parsing via `parse_str()`.
pub trait AdvisoryParser {
    /// Parse an advisory from a file path
    fn parse(&self, path: &Path) -> Result<CvrfDocument, ParseError> {
        let content = std::fs::read_to_string(path)?;
        self.parse_str(&content)
    }

    /// Parse an advisory from string content
    fn parse_str(&self, content: &str) -> Result<CvrfDocument, ParseError>;

    /// Get supported format versions
    fn supported_versions(&self) -> Vec<&str>;

    /// Get format name
    fn format_name(&self) -> &str;

    /// Detect if this parser can handle the given content
    ///
    /// This performs a lightweight textual check without full parsing.
    fn detect(&self, content: &str) -> FormatDetection;

    /// Quick check if this parser can likely handle the content
    fn can_parse(&self, content: &str) -> bool {
        self.detect(content).confidence.can_parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_is_clamped() {
        assert_eq!(FormatConfidence::new(1.5).value(), 1.0);
        assert_eq!(FormatConfidence::new(-0.5).value(), 0.0);
        assert!(FormatConfidence::LOW.can_parse());
        assert!(!FormatConfidence::NONE.can_parse());
    }

    #[test]
    fn test_tree_error_is_transparent() {
        let err = ParseError::from(TreeError::MissingProductTree);
        assert_eq!(err.to_string(), TreeError::MissingProductTree.to_string());
    }
}
