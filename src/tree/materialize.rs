//! Product materialization for terminal branch nodes.

use super::error::TreeError;
use super::path::NodePath;
use crate::model::{Product, XmlMap, XmlValue, TEXT_KEY};

pub(crate) const FULL_PRODUCT_NAME: &str = "FullProductName";
const PRODUCT_ID_ATTR: &str = "@ProductID";
const CPE_ELEMENT: &str = "CPE";
const CPE_ATTR: &str = "@CPE";

/// Build the [`Product`] owned by a terminal node.
///
/// The node must hold a single `FullProductName` mapping with a non-empty
/// `@ProductID` and display text. The CPE is taken from a `CPE` child element
/// or a `CPE` attribute, whichever is present.
pub fn materialize(node: &XmlMap, path: &NodePath<'_>) -> Result<Product, TreeError> {
    let leaf = match node.get(FULL_PRODUCT_NAME) {
        Some(XmlValue::Map(leaf)) => leaf,
        Some(XmlValue::Text(_)) => {
            return Err(TreeError::malformed_leaf(
                path.field(FULL_PRODUCT_NAME),
                "missing required attribute ProductID",
            ))
        }
        Some(other) => {
            return Err(TreeError::malformed_leaf(
                path.field(FULL_PRODUCT_NAME),
                format!("expected a single product, found {}", other.kind_name()),
            ))
        }
        None => {
            return Err(TreeError::malformed_leaf(
                path,
                "terminal branch has no FullProductName",
            ))
        }
    };

    let product_id = required_text(leaf, PRODUCT_ID_ATTR)
        .ok_or_else(|| {
            TreeError::malformed_leaf(
                path.field(FULL_PRODUCT_NAME),
                "missing required attribute ProductID",
            )
        })?;
    let display_text = required_text(leaf, TEXT_KEY).ok_or_else(|| {
        TreeError::malformed_leaf(
            path.field(FULL_PRODUCT_NAME),
            format!("product {product_id} has no display text"),
        )
    })?;
    let cpe = required_text(leaf, CPE_ELEMENT).or_else(|| required_text(leaf, CPE_ATTR));

    Ok(Product::new(product_id, display_text, cpe))
}

/// Trimmed, non-empty text stored under `key`.
fn required_text(map: &XmlMap, key: &str) -> Option<String> {
    map.get(key)
        .and_then(XmlValue::text_content)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terminal(leaf: XmlValue) -> XmlMap {
        XmlMap::from_iter([(FULL_PRODUCT_NAME.to_string(), leaf)])
    }

    #[test]
    fn test_materialize_with_cpe_element() {
        let node = terminal(XmlValue::map([
            ("@ProductID", "CPE1".into()),
            ("#text", "Widget 1.0".into()),
            ("CPE", "cpe:/a:acme:widget:1.0".into()),
        ]));
        let product = materialize(&node, &NodePath::root("ProductTree")).unwrap();
        assert_eq!(
            product,
            Product::new("CPE1", "Widget 1.0", Some("cpe:/a:acme:widget:1.0".into()))
        );
    }

    #[test]
    fn test_materialize_with_cpe_attribute() {
        let node = terminal(XmlValue::map([
            ("@ProductID", "P1".into()),
            ("@CPE", "cpe:2.3:a:acme:widget:2.0:*:*:*:*:*:*:*".into()),
            ("#text", "Widget 2.0".into()),
        ]));
        let product = materialize(&node, &NodePath::root("ProductTree")).unwrap();
        assert_eq!(
            product.cpe.as_deref(),
            Some("cpe:2.3:a:acme:widget:2.0:*:*:*:*:*:*:*")
        );
    }

    #[test]
    fn test_materialize_without_cpe() {
        let node = terminal(XmlValue::map([
            ("@ProductID", " P1 ".into()),
            ("#text", "Widget".into()),
        ]));
        let product = materialize(&node, &NodePath::root("ProductTree")).unwrap();
        assert_eq!(product.product_id, "P1");
        assert_eq!(product.cpe, None);
    }

    #[test]
    fn test_missing_product_id() {
        let node = terminal(XmlValue::map([("#text", "Widget".into())]));
        let err = materialize(&node, &NodePath::root("ProductTree")).unwrap_err();
        assert!(matches!(err, TreeError::MalformedLeaf { .. }));
        assert_eq!(err.path(), Some("ProductTree/FullProductName"));
    }

    #[test]
    fn test_empty_display_text() {
        let node = terminal(XmlValue::map([
            ("@ProductID", "P1".into()),
            ("#text", "   ".into()),
        ]));
        let err = materialize(&node, &NodePath::root("ProductTree")).unwrap_err();
        assert!(matches!(err, TreeError::MalformedLeaf { .. }));
        assert!(err.to_string().contains("P1"));
    }

    #[test]
    fn test_text_only_full_product_name() {
        let node = terminal(XmlValue::text("Widget"));
        let err = materialize(&node, &NodePath::root("ProductTree")).unwrap_err();
        assert!(matches!(err, TreeError::MalformedLeaf { .. }));
    }

    #[test]
    fn test_missing_full_product_name() {
        let node = XmlMap::from_iter([("@Name".to_string(), XmlValue::text("Acme"))]);
        let root = NodePath::root("ProductTree");
        let path = root.child("Branch", 3);
        let err = materialize(&node, &path).unwrap_err();
        assert_eq!(err.path(), Some("ProductTree/Branch[3]"));
    }
}
