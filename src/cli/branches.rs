//! Branches command handler.

use crate::config::AppConfig;
use crate::pipeline::parse_document_with_context;
use crate::reports::ReportConfig;
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

/// Run the branches command, optionally keeping only one branch type.
pub fn run_branches(path: &Path, config: &AppConfig, branch_type: Option<&str>) -> Result<()> {
    let doc = parse_document_with_context(path, &config.parsing, config.behavior.quiet)?;
    let all = doc.product_tree.branches()?;

    let mut report_config = ReportConfig::with_source(path.display().to_string());
    let branches: Vec<_> = match branch_type {
        Some(wanted) => {
            report_config = report_config.filter(format!("type={wanted}"));
            all.iter()
                .filter(|b| b.branch_type().is_some_and(|t| t.eq_ignore_ascii_case(wanted)))
                .map(Arc::clone)
                .collect()
        }
        None => all.to_vec(),
    };

    tracing::debug!("Listing {} of {} branches", branches.len(), all.len());
    super::emit(config, |reporter| {
        reporter.generate_branches_report(&doc, &branches, &report_config)
    })
}
