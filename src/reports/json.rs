//! JSON report generator.

use super::{Finding, ReportConfig, ReportError, ReportFormat, ReportGenerator, Severity};
use crate::model::{
    BranchKind, BranchNode, CvrfDocument, DocumentTracking, Note, Product, Publisher,
    Vulnerability,
};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// JSON report generator; output is pretty-printed
pub struct JsonReporter;

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn render<T: Serialize>(&self, body: &T) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(body)?)
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn is_empty<T>(items: &&[T]) -> bool {
    items.is_empty()
}

#[derive(Serialize)]
struct ToolInfo {
    name: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct ReportMetadata<'a> {
    tool: ToolInfo,
    generated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    #[serde(skip_serializing_if = "is_empty")]
    filters: &'a [String],
}

impl<'a> ReportMetadata<'a> {
    fn new(config: &'a ReportConfig) -> Self {
        Self {
            tool: ToolInfo {
                name: env!("CARGO_PKG_NAME"),
                version: env!("CARGO_PKG_VERSION"),
            },
            generated_at: Utc::now().to_rfc3339(),
            source: config.source.as_deref(),
            filters: &config.filters,
        }
    }
}

#[derive(Serialize)]
struct DocumentInfo<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    document_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    publisher: Option<&'a Publisher>,
    tracking: &'a DocumentTracking,
    #[serde(skip_serializing_if = "is_empty")]
    notes: &'a [Note],
}

impl<'a> DocumentInfo<'a> {
    fn new(doc: &'a CvrfDocument) -> Self {
        Self {
            title: doc.title.as_deref(),
            document_type: doc.document_type.as_deref(),
            publisher: doc.publisher.as_ref(),
            tracking: &doc.tracking,
            notes: &doc.notes,
        }
    }
}

#[derive(Serialize)]
struct ViewReport<'a> {
    metadata: ReportMetadata<'a>,
    document: DocumentInfo<'a>,
    product_count: usize,
    branch_count: usize,
    /// Hierarchy in post-order; the root is the last entry
    branches: Vec<TreeEntry<'a>>,
    products: &'a [Arc<Product>],
    vulnerabilities: &'a [Vulnerability],
}

/// Flat branch entry; children are counted rather than nested.
#[derive(Serialize)]
struct BranchEntry<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    branch_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    product_id: Option<&'a str>,
    child_count: usize,
}

impl<'a> BranchEntry<'a> {
    fn new(branch: &'a BranchNode) -> Self {
        let (product_id, child_count) = match branch.kind() {
            BranchKind::Terminal(product) => (Some(product.product_id.as_str()), 0),
            BranchKind::Internal(children) => (None, children.len()),
        };
        Self {
            name: branch.name(),
            branch_type: branch.branch_type(),
            product_id,
            child_count,
        }
    }
}

/// Branch entry of the view report; `children` are indices into the same list.
#[derive(Serialize)]
struct TreeEntry<'a> {
    #[serde(flatten)]
    branch: BranchEntry<'a>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<usize>,
}

/// Flatten the hierarchy without recursing, linking children by index.
fn tree_entries(branches: &[Arc<BranchNode>]) -> Vec<TreeEntry<'_>> {
    let positions: HashMap<*const BranchNode, usize> = branches
        .iter()
        .enumerate()
        .map(|(index, branch)| (Arc::as_ptr(branch), index))
        .collect();

    branches
        .iter()
        .map(|branch| TreeEntry {
            branch: BranchEntry::new(branch),
            children: branch
                .children()
                .iter()
                .filter_map(|child| positions.get(&Arc::as_ptr(child)).copied())
                .collect(),
        })
        .collect()
}

#[derive(Serialize)]
struct ListReport<'a, T: Serialize> {
    metadata: ReportMetadata<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    document_id: Option<&'a str>,
    count: usize,
    items: T,
}

#[derive(Serialize)]
struct ValidationReport<'a> {
    metadata: ReportMetadata<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    document_id: Option<&'a str>,
    valid: bool,
    errors: usize,
    warnings: usize,
    findings: &'a [Finding],
}

impl ReportGenerator for JsonReporter {
    fn generate_view_report(
        &self,
        doc: &CvrfDocument,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let products = doc.product_tree.products()?;
        let branches = doc.product_tree.branches()?;
        let report = ViewReport {
            metadata: ReportMetadata::new(config),
            document: DocumentInfo::new(doc),
            product_count: products.len(),
            branch_count: branches.len(),
            branches: tree_entries(branches),
            products,
            vulnerabilities: &doc.vulnerabilities,
        };
        self.render(&report)
    }

    fn generate_products_report(
        &self,
        doc: &CvrfDocument,
        products: &[Arc<Product>],
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        self.render(&ListReport {
            metadata: ReportMetadata::new(config),
            document_id: doc.id(),
            count: products.len(),
            items: products,
        })
    }

    fn generate_branches_report(
        &self,
        doc: &CvrfDocument,
        branches: &[Arc<BranchNode>],
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let items: Vec<BranchEntry<'_>> = branches.iter().map(|b| BranchEntry::new(b)).collect();
        self.render(&ListReport {
            metadata: ReportMetadata::new(config),
            document_id: doc.id(),
            count: items.len(),
            items,
        })
    }

    fn generate_validation_report(
        &self,
        doc: &CvrfDocument,
        findings: &[Finding],
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let errors = findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count();
        self.render(&ValidationReport {
            metadata: ReportMetadata::new(config),
            document_id: doc.id(),
            valid: errors == 0,
            errors,
            warnings: findings.len() - errors,
            findings,
        })
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}
