//! Validate command handler.
//!
//! Runs local consistency checks on a resolved advisory. This is not schema
//! validation: documents are only checked for problems that the product tree
//! makes visible.

use crate::config::AppConfig;
use crate::model::CvrfDocument;
use crate::pipeline::{exit_codes, parse_document_with_context};
use crate::reports::{Finding, ReportConfig, Severity};
use crate::tree::TreeError;
use anyhow::Result;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

/// CPE 2.2 URI (`cpe:/a:vendor:product:...`) or CPE 2.3 formatted string
/// (`cpe:2.3:a:vendor:product:version:...`, eleven components after `2.3`).
fn cpe_pattern() -> &'static Regex {
    static CPE: OnceLock<Regex> = OnceLock::new();
    CPE.get_or_init(|| {
        Regex::new(
            r"^cpe:(?:/[aho]?(?::[^:\s]*){0,6}|2\.3:[aho*\-](?::(?:[^:\s\\]|\\.)*){10})$",
        )
        .expect("static regex")
    })
}

/// Check whether `cpe` is a well-formed CPE 2.2 or 2.3 name.
#[must_use]
pub fn is_valid_cpe(cpe: &str) -> bool {
    cpe_pattern().is_match(cpe)
}

/// Run every check against a parsed document.
///
/// Findings come out grouped by check, in document order within a check.
pub fn collect_findings(doc: &CvrfDocument) -> Result<Vec<Finding>, TreeError> {
    let products = doc.product_tree.products()?;
    let mut findings = Vec::new();

    for id in doc.product_tree.duplicate_product_ids()? {
        findings.push(Finding::error(format!("Duplicate ProductID '{id}'")));
    }

    for product in products {
        if let Some(cpe) = &product.cpe {
            if !is_valid_cpe(cpe) {
                findings.push(Finding::warning(format!(
                    "Product '{}' has a malformed CPE: '{cpe}'",
                    product.product_id
                )));
            }
        }
    }

    // relationship products are valid reference targets too
    let relationships = doc.product_tree.relationship_products()?;
    let known: HashSet<&str> = products
        .iter()
        .map(|p| p.product_id.as_str())
        .chain(relationships.iter().map(|p| p.product_id.as_str()))
        .collect();
    for (index, vuln) in doc.vulnerabilities.iter().enumerate() {
        let label = vuln
            .cve
            .clone()
            .or_else(|| vuln.ordinal.as_ref().map(|o| format!("#{o}")))
            .unwrap_or_else(|| format!("#{}", index + 1));

        if vuln.cve.is_none() {
            findings.push(Finding::warning(format!("Vulnerability {label} has no CVE")));
        }

        let mut reported = HashSet::new();
        for id in vuln.referenced_product_ids() {
            if !known.contains(id) && reported.insert(id) {
                findings.push(Finding::error(format!(
                    "Vulnerability {label} references unknown ProductID '{id}'"
                )));
            }
        }
    }

    Ok(findings)
}

/// Run the validate command, returning the process exit code.
pub fn run_validate(path: &Path, config: &AppConfig, fail_on_warning: bool) -> Result<i32> {
    let doc = parse_document_with_context(path, &config.parsing, config.behavior.quiet)?;
    let findings = collect_findings(&doc)?;
    let report_config = ReportConfig::with_source(path.display().to_string());

    super::emit(config, |reporter| {
        reporter.generate_validation_report(&doc, &findings, &report_config)
    })?;

    let errors = findings
        .iter()
        .filter(|f| f.severity == Severity::Error)
        .count();
    let warnings = findings.len() - errors;
    tracing::debug!(errors, warnings, "Validation finished");

    if errors > 0 || (fail_on_warning && warnings > 0) {
        Ok(exit_codes::VALIDATION_FAILED)
    } else {
        Ok(exit_codes::SUCCESS)
    }
}
