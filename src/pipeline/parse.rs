//! Advisory loading with user-facing error context.

use crate::config::ParsingConfig;
use crate::error::{ErrorContext, Result};
use crate::model::CvrfDocument;
use crate::parsers::parse_document_with;
use crate::tree::TreeError;
use std::path::Path;

/// Read, parse and resolve an advisory, honoring the configured limits.
///
/// Product tree errors surface here, so a returned document always has a
/// resolved tree. Errors name the file; [`CvrfError::tree_error`] gives
/// access to the product tree failure behind them.
///
/// [`CvrfError::tree_error`]: crate::error::CvrfError::tree_error
pub fn parse_document_with_context(
    path: &Path,
    config: &ParsingConfig,
    quiet: bool,
) -> Result<CvrfDocument> {
    if !quiet {
        tracing::info!("Parsing advisory: {}", path.display());
    }

    let doc = match parse_document_with(path, &config.parser(), config.max_file_size_bytes())
        .with_context(|| path.display().to_string())
    {
        Ok(doc) => doc,
        Err(err) => {
            if let Some(node) = err.tree_error().and_then(TreeError::path) {
                tracing::debug!(node, "Product tree rejected");
            }
            return Err(err);
        }
    };

    if !quiet {
        tracing::info!(
            "Resolved {} products in {} branches",
            doc.product_tree.products()?.len(),
            doc.product_tree.branches()?.len()
        );
    }
    Ok(doc)
}
