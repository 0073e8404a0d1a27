//! Document-level CVRF structures.

use super::Vulnerability;
use crate::tree::ProductTree;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// A parsed CVRF advisory.
#[derive(Debug)]
pub struct CvrfDocument {
    pub title: Option<String>,
    /// Document type, e.g. `Security Advisory`
    pub document_type: Option<String>,
    pub publisher: Option<Publisher>,
    pub tracking: DocumentTracking,
    pub notes: Vec<Note>,
    /// Product hierarchy; resolved when the document is built
    pub product_tree: ProductTree,
    pub vulnerabilities: Vec<Vulnerability>,
}

impl CvrfDocument {
    /// Tracking identifier, if present
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.tracking.id.as_deref()
    }

    #[must_use]
    pub fn vulnerability_count(&self) -> usize {
        self.vulnerabilities.len()
    }
}

impl fmt::Display for CvrfDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {}",
            self.document_type.as_deref().unwrap_or("Document"),
            self.id().unwrap_or("(no id)"),
            self.title.as_deref().unwrap_or("Untitled")
        )
    }
}

/// `DocumentPublisher` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Publisher {
    /// Publisher type, e.g. `Vendor` or `Coordinator`
    pub publisher_type: Option<String>,
    pub contact_details: Option<String>,
    pub issuing_authority: Option<String>,
}

/// `DocumentTracking` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentTracking {
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// `Draft`, `Interim` or `Final`
    pub status: Option<String>,
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub revisions: Vec<Revision>,
    pub initial_release_date: Option<DateTime<Utc>>,
    pub current_release_date: Option<DateTime<Utc>>,
}

/// An entry of `RevisionHistory`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Revision {
    pub number: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

/// A `Note` of `DocumentNotes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub title: Option<String>,
    /// Note type, e.g. `General`, `Summary` or `Legal Disclaimer`
    pub note_type: Option<String>,
    pub ordinal: Option<String>,
    pub text: String,
}
