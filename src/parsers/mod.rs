//! Advisory parsers.
//!
//! Reads CVRF XML advisories into [`CvrfDocument`]s. Parsing happens in two
//! stages: [`XmlTreeBuilder`] turns the XML text into a generic
//! [`XmlValue`](crate::model::XmlValue) tree, then [`CvrfParser`] maps the
//! document fields and resolves the product tree.
//!
//! ## Usage
//!
//! ```no_run
//! use cvrf_tools::parsers::{detect_format, parse_document};
//! use std::path::Path;
//!
//! let doc = parse_document(Path::new("advisory.xml")).unwrap();
//! println!("{} products", doc.product_tree.products().unwrap().len());
//!
//! let content = std::fs::read_to_string("advisory.xml").unwrap();
//! if let Some(detection) = detect_format(&content) {
//!     println!("Detected: {} ({})", detection.format_name, detection.confidence);
//! }
//! ```

mod cvrf;
mod traits;
pub mod xml_tree;

pub use cvrf::CvrfParser;
pub use traits::{AdvisoryParser, FormatConfidence, FormatDetection, ParseError};
pub use xml_tree::{XmlTree, XmlTreeBuilder, DEFAULT_MAX_XML_DEPTH};

use crate::model::CvrfDocument;
use std::path::Path;

/// Result of format detection
#[derive(Debug, Clone)]
pub struct DetectedFormat {
    /// Name of the detected format
    pub format_name: String,
    /// Confidence score (0.0-1.0)
    pub confidence: f32,
    /// Detected schema version if available
    pub version: Option<String>,
    /// Any warnings about the detection
    pub warnings: Vec<String>,
}

/// Detect the advisory format from content without parsing
///
/// Returns None if the content does not look like a supported advisory.
pub fn detect_format(content: &str) -> Option<DetectedFormat> {
    let parser = CvrfParser::new();
    let detection = parser.detect(content);

    detection.confidence.can_parse().then(|| DetectedFormat {
        format_name: parser.format_name().to_string(),
        confidence: detection.confidence.value(),
        version: detection.version,
        warnings: detection.warnings,
    })
}

/// Maximum advisory file size (256 MB) accepted by [`parse_document`].
pub const MAX_DOCUMENT_FILE_SIZE: u64 = 256 * 1024 * 1024;

/// Read and parse an advisory file with default settings.
///
/// Returns an error if the file exceeds [`MAX_DOCUMENT_FILE_SIZE`].
pub fn parse_document(path: &Path) -> Result<CvrfDocument, ParseError> {
    parse_document_with(path, &CvrfParser::new(), MAX_DOCUMENT_FILE_SIZE)
}

/// Read and parse an advisory file with an explicit parser and size limit.
pub fn parse_document_with(
    path: &Path,
    parser: &CvrfParser,
    max_file_size: u64,
) -> Result<CvrfDocument, ParseError> {
    let metadata = std::fs::metadata(path)?;
    if metadata.len() > max_file_size {
        return Err(ParseError::IoError(format!(
            "advisory file is {} MB, exceeding the {} MB limit",
            metadata.len() / (1024 * 1024),
            max_file_size / (1024 * 1024),
        )));
    }
    parser.parse(path)
}

/// Parse an advisory from string content with default settings.
pub fn parse_document_str(content: &str) -> Result<CvrfDocument, ParseError> {
    CvrfParser::new().parse_str(content)
}
