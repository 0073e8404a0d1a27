//! Products command handler.

use crate::config::AppConfig;
use crate::model::{CvrfDocument, Product};
use crate::pipeline::parse_document_with_context;
use crate::reports::ReportConfig;
use crate::tree::TreeError;
use anyhow::Result;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Filters for the products command
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Keep products below a branch with this name (case-insensitive)
    pub vendor: Option<String>,
    /// Keep only products that carry a CPE
    pub cpe_only: bool,
}

impl ProductFilter {
    /// Apply the filter, keeping document order.
    pub fn apply(&self, doc: &CvrfDocument) -> Result<Vec<Arc<Product>>, TreeError> {
        let products = doc.product_tree.products()?;

        let under_vendor: Option<HashSet<*const Product>> = match &self.vendor {
            Some(vendor) => Some(
                doc.product_tree
                    .branches()?
                    .iter()
                    .filter(|b| b.name().is_some_and(|n| n.eq_ignore_ascii_case(vendor)))
                    .flat_map(|b| b.subtree_products())
                    .map(Arc::as_ptr)
                    .collect(),
            ),
            None => None,
        };

        Ok(products
            .iter()
            .filter(|p| !self.cpe_only || p.cpe.is_some())
            .filter(|&product| {
                under_vendor
                    .as_ref()
                    .map_or(true, |keep| keep.contains(&Arc::as_ptr(product)))
            })
            .map(Arc::clone)
            .collect())
    }

    fn describe(&self, mut config: ReportConfig) -> ReportConfig {
        if let Some(vendor) = &self.vendor {
            config = config.filter(format!("vendor={vendor}"));
        }
        if self.cpe_only {
            config = config.filter("cpe");
        }
        config
    }
}

/// Run the products command
pub fn run_products(path: &Path, config: &AppConfig, filter: &ProductFilter) -> Result<()> {
    let doc = parse_document_with_context(path, &config.parsing, config.behavior.quiet)?;
    let products = filter.apply(&doc)?;
    let report_config = filter.describe(ReportConfig::with_source(path.display().to_string()));

    super::emit(config, |reporter| {
        reporter.generate_products_report(&doc, &products, &report_config)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::parse_document_str;

    const DOC: &str = r#"<cvrfdoc><ProductTree>
  <Branch Type="Vendor" Name="Acme">
    <Branch Type="Product Name" Name="Widget">
      <FullProductName ProductID="P1" CPE="cpe:/a:acme:widget">Widget</FullProductName>
    </Branch>
    <Branch Type="Product Name" Name="Gadget">
      <FullProductName ProductID="P2">Gadget</FullProductName>
    </Branch>
  </Branch>
  <Branch Type="Vendor" Name="Initech">
    <FullProductName ProductID="P3" CPE="cpe:/a:initech:tps">TPS</FullProductName>
  </Branch>
</ProductTree></cvrfdoc>"#;

    fn ids(products: &[Arc<Product>]) -> Vec<&str> {
        products.iter().map(|p| p.product_id.as_str()).collect()
    }

    #[test]
    fn test_no_filter_keeps_everything() {
        let doc = parse_document_str(DOC).unwrap();
        let products = ProductFilter::default().apply(&doc).unwrap();
        assert_eq!(ids(&products), vec!["P1", "P2", "P3"]);
    }

    #[test]
    fn test_vendor_filter() {
        let doc = parse_document_str(DOC).unwrap();
        let filter = ProductFilter {
            vendor: Some("acme".to_string()),
            ..ProductFilter::default()
        };
        assert_eq!(ids(&filter.apply(&doc).unwrap()), vec!["P1", "P2"]);

        let filter = ProductFilter {
            vendor: Some("Nobody".to_string()),
            ..ProductFilter::default()
        };
        assert!(filter.apply(&doc).unwrap().is_empty());
    }

    #[test]
    fn test_nested_branch_name_matches() {
        let doc = parse_document_str(DOC).unwrap();
        let filter = ProductFilter {
            vendor: Some("Gadget".to_string()),
            ..ProductFilter::default()
        };
        assert_eq!(ids(&filter.apply(&doc).unwrap()), vec!["P2"]);
    }

    #[test]
    fn test_cpe_filter_combines_with_vendor() {
        let doc = parse_document_str(DOC).unwrap();
        let filter = ProductFilter {
            vendor: None,
            cpe_only: true,
        };
        assert_eq!(ids(&filter.apply(&doc).unwrap()), vec!["P1", "P3"]);

        let filter = ProductFilter {
            vendor: Some("Acme".to_string()),
            cpe_only: true,
        };
        assert_eq!(ids(&filter.apply(&doc).unwrap()), vec!["P1"]);
    }
}
