//! Report generation for resolved advisories.
//!
//! Three output formats are supported:
//! - Summary: document header, counts and the indented branch tree
//! - Table: aligned columns for terminal output
//! - JSON: structured data for programmatic use

mod json;
mod summary;
mod types;

pub use json::JsonReporter;
pub use summary::{SummaryReporter, TableReporter};
pub use types::{Finding, ReportConfig, ReportFormat, Severity};

use crate::model::{BranchNode, CvrfDocument, Product};
use crate::tree::TreeError;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// Trait for report generators
///
/// The product and branch reports take pre-filtered slices so that the
/// same generator serves both the full listing and filtered views.
pub trait ReportGenerator {
    /// Document overview: header, counts and the product hierarchy
    fn generate_view_report(
        &self,
        doc: &CvrfDocument,
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Flat product listing
    fn generate_products_report(
        &self,
        doc: &CvrfDocument,
        products: &[Arc<Product>],
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Flat branch listing, descendants first
    fn generate_branches_report(
        &self,
        doc: &CvrfDocument,
        branches: &[Arc<BranchNode>],
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Findings of the `validate` command
    fn generate_validation_report(
        &self,
        doc: &CvrfDocument,
        findings: &[Finding],
        config: &ReportConfig,
    ) -> Result<String, ReportError>;

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Create a report generator for the given format
#[must_use]
pub fn create_reporter(format: ReportFormat, colored: bool) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Summary => {
            let reporter = SummaryReporter::new();
            Box::new(if colored { reporter } else { reporter.no_color() })
        }
        ReportFormat::Table => {
            let reporter = TableReporter::new();
            Box::new(if colored { reporter } else { reporter.no_color() })
        }
        ReportFormat::Json => Box::new(JsonReporter::new()),
    }
}
