//! **Tools for reading CVRF security advisories and resolving their product trees.**
//!
//! A CVRF (Common Vulnerability Reporting Framework) advisory describes the
//! products it covers in a `ProductTree`: a hierarchy of `Branch` elements of
//! arbitrary depth (vendor, product family, version, ...) whose terminal
//! branches each name one concrete product. `cvrf-tools` reads such advisories
//! and flattens the hierarchy into two ordered collections that are easy to
//! query.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: The typed model. [`CvrfDocument`] holds the document
//!   metadata, the [`ProductTree`] and the vulnerabilities.
//! - **[`tree`]**: The product tree resolver. [`ProductTree`] resolves lazily,
//!   once, and serves both [`branches`](ProductTree::branches) (post-order) and
//!   [`products`](ProductTree::products) (document order) from that pass.
//! - **[`parsers`]**: XML reading and conversion into the model.
//! - **[`reports`]**: Summary, table and JSON renderings of documents.
//! - **[`config`]**: YAML configuration with discovery, validation and CLI merging.
//! - **[`pipeline`]** and **[`cli`]**: the building blocks of the `cvrf-tools` binary.
//!
//! ## Getting Started
//!
//! ```no_run
//! use std::path::Path;
//! use cvrf_tools::parse_document;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let doc = parse_document(Path::new("advisory.xml"))?;
//!
//!     for product in doc.product_tree.products()? {
//!         println!("{} {}", product.product_id, product.display_text);
//!     }
//!     for branch in doc.product_tree.branches()? {
//!         println!("{:?} {:?}", branch.branch_type(), branch.name());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! Working from an in-memory string:
//!
//! ```
//! use cvrf_tools::parse_document_str;
//!
//! let doc = parse_document_str(
//!     r#"<cvrfdoc>
//!          <ProductTree>
//!            <Branch Type="Vendor" Name="Acme">
//!              <FullProductName ProductID="P1">Acme Widget 1.0</FullProductName>
//!            </Branch>
//!          </ProductTree>
//!        </cvrfdoc>"#,
//! )?;
//!
//! let products = doc.product_tree.products()?;
//! assert_eq!(products[0].product_id, "P1");
//! // the vendor branch and the tree root
//! assert_eq!(doc.product_tree.branches()?.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod parsers;
pub mod pipeline;
pub mod reports;
pub mod tree;

// Re-export main types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError, Validatable};
pub use error::{CvrfError, ErrorContext, Result};
pub use model::{BranchNode, CvrfDocument, Product, Vulnerability, XmlValue};
pub use parsers::{parse_document, parse_document_str, AdvisoryParser, CvrfParser, ParseError};
pub use reports::{ReportFormat, ReportGenerator};
pub use tree::{ProductTree, TreeError};
