//! View command handler.

use crate::config::AppConfig;
use crate::pipeline::parse_document_with_context;
use crate::reports::ReportConfig;
use anyhow::Result;
use std::path::Path;

/// Run the view command
pub fn run_view(path: &Path, config: &AppConfig) -> Result<()> {
    let doc = parse_document_with_context(path, &config.parsing, config.behavior.quiet)?;
    let report_config = ReportConfig::with_source(path.display().to_string());
    super::emit(config, |reporter| {
        reporter.generate_view_report(&doc, &report_config)
    })
}
