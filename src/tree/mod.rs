//! Product tree resolution.
//!
//! A CVRF `ProductTree` is a `Branch` hierarchy of arbitrary depth whose
//! terminal branches each name one product (`FullProductName`). This module
//! turns the raw [`XmlValue`] subtree into two flat, ordered collections:
//!
//! - every [`BranchNode`], in depth-first post-order (descendants first),
//! - every [`Product`], in document order.
//!
//! The work is split into small pure steps:
//!
//! - [`normalize`]: the only code that deals with "one element or many",
//! - [`materialize`]: builds a [`Product`] from a terminal node,
//! - [`resolve`]: depth-first walk combining the two, with a depth ceiling,
//! - [`ProductTree`]: owns the raw root and memoizes a single resolution.
//!
//! ```
//! use cvrf_tools::model::XmlValue;
//! use cvrf_tools::tree::ProductTree;
//!
//! let root = XmlValue::map([(
//!     "Branch",
//!     XmlValue::map([
//!         ("@Type", "Vendor".into()),
//!         ("@Name", "Acme".into()),
//!         (
//!             "FullProductName",
//!             XmlValue::map([("@ProductID", "P1".into()), ("#text", "Widget".into())]),
//!         ),
//!     ]),
//! )]);
//!
//! let tree = ProductTree::new(root);
//! assert_eq!(tree.products()?.len(), 1);
//! assert_eq!(tree.branches()?.len(), 2);
//! # Ok::<(), cvrf_tools::tree::TreeError>(())
//! ```

mod error;
mod materialize;
mod normalize;
mod path;
mod resolver;

pub use error::TreeError;
pub use materialize::materialize;
pub use normalize::{normalize, normalize_values};
pub use path::NodePath;
pub use resolver::{resolve, Resolution, ResolverConfig, DEFAULT_MAX_DEPTH, MAX_SUPPORTED_DEPTH};

use crate::model::{BranchNode, Product, XmlMap, XmlValue};
use materialize::FULL_PRODUCT_NAME;
use resolver::{BRANCH, PRODUCT_TREE};

const RELATIONSHIP: &str = "Relationship";
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Owner of a raw product tree and its memoized resolution.
///
/// The tree is resolved on the first call to [`branches`](Self::branches) or
/// [`products`](Self::products); both accessors are served from that single
/// pass. A failed resolution is cached as well. `ProductTree` is `Sync`: the
/// first resolution is synchronized by [`OnceLock`] and the cached sequences
/// are read-only afterwards.
#[derive(Debug)]
pub struct ProductTree {
    root: XmlValue,
    config: ResolverConfig,
    resolved: OnceLock<Result<Resolution, TreeError>>,
}

impl ProductTree {
    /// Wrap a raw `ProductTree` value using the default resolver settings.
    #[must_use]
    pub fn new(root: XmlValue) -> Self {
        Self::with_config(root, ResolverConfig::default())
    }

    /// Wrap a raw `ProductTree` value.
    #[must_use]
    pub const fn with_config(root: XmlValue, config: ResolverConfig) -> Self {
        Self {
            root,
            config,
            resolved: OnceLock::new(),
        }
    }

    /// Take the `ProductTree` field out of a document mapping.
    ///
    /// Fails with [`TreeError::MissingProductTree`] when the field is absent.
    /// A present but empty product tree is valid.
    pub fn from_document(document: &mut XmlMap, config: ResolverConfig) -> Result<Self, TreeError> {
        document
            .shift_remove(PRODUCT_TREE)
            .map(|root| Self::with_config(root, config))
            .ok_or(TreeError::MissingProductTree)
    }

    /// The raw tree this facade was built from.
    #[must_use]
    pub const fn raw(&self) -> &XmlValue {
        &self.root
    }

    #[must_use]
    pub const fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Whether the tree has already been resolved.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    /// All branch nodes, descendants before ancestors.
    ///
    /// For a non-empty tree the last entry is the `ProductTree` root itself.
    pub fn branches(&self) -> Result<&[Arc<BranchNode>], TreeError> {
        self.resolution().map(|r| r.branches.as_slice())
    }

    /// All products, in document order. Duplicate identifiers are kept.
    pub fn products(&self) -> Result<&[Arc<Product>], TreeError> {
        self.resolution().map(|r| r.products.as_slice())
    }

    /// The root branch node, or `None` for an empty tree.
    pub fn root(&self) -> Result<Option<&Arc<BranchNode>>, TreeError> {
        self.branches().map(<[_]>::last)
    }

    /// First product with the given identifier.
    pub fn product(&self, product_id: &str) -> Result<Option<&Arc<Product>>, TreeError> {
        self.products()
            .map(|products| products.iter().find(|p| p.product_id == product_id))
    }

    /// Identifiers that occur more than once, in order of first occurrence.
    pub fn duplicate_product_ids(&self) -> Result<Vec<&str>, TreeError> {
        let products = self.products()?;
        let mut counts: HashMap<&str, usize> = HashMap::with_capacity(products.len());
        for product in products {
            *counts.entry(product.product_id.as_str()).or_default() += 1;
        }

        let mut duplicates = Vec::new();
        for product in products {
            let id = product.product_id.as_str();
            if let Some(count) = counts.get_mut(id) {
                if *count > 1 {
                    duplicates.push(id);
                    // report each id once
                    *count = 0;
                }
            }
        }
        Ok(duplicates)
    }

    /// Products declared by `Relationship` entries, in document order.
    ///
    /// A relationship names a product built from branch products (a package
    /// on a platform, say). Its identifier may be referenced like any other,
    /// but it is not part of the branch hierarchy, so it never shows up in
    /// [`products`](Self::products).
    pub fn relationship_products(&self) -> Result<Vec<Product>, TreeError> {
        let Some(map) = self.root.as_map() else {
            return Ok(Vec::new());
        };
        let path = NodePath::root(PRODUCT_TREE);
        normalize(map.get(RELATIONSHIP), &path, RELATIONSHIP)?
            .into_iter()
            .enumerate()
            .map(|(index, relationship)| {
                materialize(relationship, &path.child(RELATIONSHIP, index))
            })
            .collect()
    }

    fn resolution(&self) -> Result<&Resolution, TreeError> {
        self.resolved
            .get_or_init(|| self.resolve_root())
            .as_ref()
            .map_err(Clone::clone)
    }

    fn resolve_root(&self) -> Result<Resolution, TreeError> {
        match &self.root {
            XmlValue::Null => Ok(Resolution::default()),
            XmlValue::Map(map)
                if !map.contains_key(BRANCH) && !map.contains_key(FULL_PRODUCT_NAME) =>
            {
                tracing::debug!("Product tree is empty");
                Ok(Resolution::default())
            }
            XmlValue::Map(map) => resolve(map, &self.config),
            other => Err(TreeError::malformed_tree(
                PRODUCT_TREE,
                format!("expected a mapping, found {}", other.kind_name()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: &str, text: &str, cpe: Option<&str>) -> XmlValue {
        let mut entries = vec![("@ProductID", id.into()), ("#text", text.into())];
        if let Some(cpe) = cpe {
            entries.push(("CPE", cpe.into()));
        }
        XmlValue::map(entries)
    }

    fn scenario_a() -> XmlValue {
        XmlValue::map([(
            "Branch",
            XmlValue::map([
                ("@Type", "Vendor".into()),
                ("@Name", "Acme".into()),
                (
                    "Branch",
                    XmlValue::map([
                        ("@Type", "ProductName".into()),
                        ("@Name", "Widget".into()),
                        (
                            "FullProductName",
                            leaf("CPE1", "Widget 1.0", Some("cpe:/a:acme:widget:1.0")),
                        ),
                    ]),
                ),
            ]),
        )])
    }

    #[test]
    fn test_scenario_vendor_with_single_product() {
        let tree = ProductTree::new(scenario_a());

        let products = tree.products().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(
            *products[0],
            Product::new("CPE1", "Widget 1.0", Some("cpe:/a:acme:widget:1.0".into()))
        );

        let branches = tree.branches().unwrap();
        assert_eq!(branches.len(), 3);
        assert_eq!(branches[0].name(), Some("Widget"));
        assert_eq!(branches[0].branch_type(), Some("ProductName"));
        assert!(branches[0].is_terminal());
        assert_eq!(branches[1].name(), Some("Acme"));
        assert_eq!(branches[1].branch_type(), Some("Vendor"));
        assert_eq!(branches[2].name(), None);
        assert!(Arc::ptr_eq(tree.root().unwrap().unwrap(), &branches[2]));
    }

    #[test]
    fn test_sibling_order_is_preserved() {
        let root = XmlValue::map([(
            "Branch",
            XmlValue::Seq(vec![
                XmlValue::map([("FullProductName", leaf("P1", "One", None))]),
                XmlValue::map([("FullProductName", leaf("P2", "Two", None))]),
            ]),
        )]);
        let tree = ProductTree::new(root);
        let ids: Vec<_> = tree
            .products()
            .unwrap()
            .iter()
            .map(|p| p.product_id.clone())
            .collect();
        assert_eq!(ids, vec!["P1", "P2"]);
    }

    #[test]
    fn test_missing_product_tree() {
        let mut document = XmlMap::from_iter([("DocumentTitle".to_string(), "t".into())]);
        let err = ProductTree::from_document(&mut document, ResolverConfig::default()).unwrap_err();
        assert_eq!(err, TreeError::MissingProductTree);
    }

    #[test]
    fn test_from_document_takes_field() {
        let mut document = XmlMap::from_iter([("ProductTree".to_string(), scenario_a())]);
        let tree = ProductTree::from_document(&mut document, ResolverConfig::default()).unwrap();
        assert!(!document.contains_key("ProductTree"));
        assert_eq!(tree.products().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_but_present_tree() {
        for root in [XmlValue::Null, XmlValue::map([("@xmlns", "urn:x".into())])] {
            let tree = ProductTree::new(root);
            assert!(tree.branches().unwrap().is_empty());
            assert!(tree.products().unwrap().is_empty());
            assert!(tree.root().unwrap().is_none());
        }
    }

    #[test]
    fn test_text_root_is_malformed() {
        let tree = ProductTree::new(XmlValue::text("nothing here"));
        assert!(matches!(
            tree.products().unwrap_err(),
            TreeError::MalformedTree { .. }
        ));
    }

    #[test]
    fn test_empty_branch_field_is_malformed() {
        let root = XmlValue::map([(
            "Branch",
            XmlValue::map([("@Name", "Acme".into()), ("Branch", XmlValue::Null)]),
        )]);
        let tree = ProductTree::new(root);
        assert!(matches!(
            tree.branches().unwrap_err(),
            TreeError::MalformedTree { .. }
        ));
    }

    #[test]
    fn test_resolution_is_memoized() {
        let tree = ProductTree::new(scenario_a());
        assert!(!tree.is_resolved());

        let first_branches = tree.branches().unwrap();
        assert!(tree.is_resolved());
        let first_products = tree.products().unwrap();
        let second_branches = tree.branches().unwrap();
        let second_products = tree.products().unwrap();

        assert!(std::ptr::eq(first_branches.as_ptr(), second_branches.as_ptr()));
        assert!(std::ptr::eq(first_products.as_ptr(), second_products.as_ptr()));
        assert_eq!(first_branches, second_branches);
    }

    #[test]
    fn test_errors_are_memoized() {
        let tree = ProductTree::new(XmlValue::map([("Branch", XmlValue::text("x"))]));
        let first = tree.branches().unwrap_err();
        let second = tree.products().unwrap_err();
        assert_eq!(first, second);
        assert!(matches!(first, TreeError::AmbiguousCardinality { .. }));
    }

    #[test]
    fn test_products_are_shared_with_terminal_branches() {
        let tree = ProductTree::new(scenario_a());
        let products = tree.products().unwrap();
        let branches = tree.branches().unwrap();
        assert!(Arc::ptr_eq(branches[0].product().unwrap(), &products[0]));
    }

    #[test]
    fn test_duplicate_product_ids() {
        let root = XmlValue::map([(
            "Branch",
            XmlValue::Seq(vec![
                XmlValue::map([("FullProductName", leaf("P1", "One", None))]),
                XmlValue::map([("FullProductName", leaf("P2", "Two", None))]),
                XmlValue::map([("FullProductName", leaf("P1", "One again", None))]),
                XmlValue::map([("FullProductName", leaf("P1", "One more", None))]),
            ]),
        )]);
        let tree = ProductTree::new(root);
        assert_eq!(tree.products().unwrap().len(), 4);
        assert_eq!(tree.duplicate_product_ids().unwrap(), vec!["P1"]);
        assert_eq!(
            tree.product("P1").unwrap().unwrap().display_text,
            "One"
        );
        assert!(tree.product("P9").unwrap().is_none());
    }

    #[test]
    fn test_relationship_products() {
        let relationship = |id: &str| {
            XmlValue::map([
                ("@ProductReference", "P1".into()),
                ("@RelationType", "Default Component Of".into()),
                ("@RelatesToProductReference", "PLATFORM".into()),
                ("FullProductName", leaf(id, id, None)),
            ])
        };
        let mut root = scenario_a();
        if let XmlValue::Map(map) = &mut root {
            map.insert(
                "Relationship".to_string(),
                XmlValue::Seq(vec![relationship("7Server:widget"), relationship("8Server:widget")]),
            );
        }

        let tree = ProductTree::new(root);
        let ids: Vec<_> = tree
            .relationship_products()
            .unwrap()
            .into_iter()
            .map(|p| p.product_id)
            .collect();
        assert_eq!(ids, vec!["7Server:widget", "8Server:widget"]);
        assert!(tree.product("7Server:widget").unwrap().is_none());

        assert!(ProductTree::new(XmlValue::Null)
            .relationship_products()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_relationship_without_product_is_malformed() {
        let root = XmlValue::map([(
            "Relationship",
            XmlValue::map([("@ProductReference", "P1".into())]),
        )]);
        let err = ProductTree::new(root).relationship_products().unwrap_err();
        assert!(matches!(err, TreeError::MalformedLeaf { .. }));
        assert_eq!(err.path(), Some("ProductTree/Relationship[0]"));
    }

    #[test]
    fn test_shared_across_threads() {
        let tree = Arc::new(ProductTree::new(scenario_a()));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let tree = Arc::clone(&tree);
                std::thread::spawn(move || tree.branches().map(<[_]>::len))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Ok(3));
        }
    }
}
