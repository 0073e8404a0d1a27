//! Cardinality normalization for repeatable fields.
//!
//! The XML-to-tree conversion collapses a repeated element into a sequence
//! only when it occurs more than once, so a repeatable field may be absent,
//! a lone mapping, or a sequence of mappings. [`normalize`] is the single
//! place that looks at that shape; everything downstream iterates the
//! returned slice of mappings.

use super::error::TreeError;
use super::path::NodePath;
use crate::model::{XmlMap, XmlValue};

/// Turn the raw value of the repeatable field `field` into an ordered
/// sequence of node mappings.
///
/// - absent or empty element: `[]`
/// - a lone mapping: `[mapping]`
/// - a sequence of mappings: the same mappings, in the same order
///
/// `parent` is the path of the node holding the field and is only used for
/// error reporting.
pub fn normalize<'v>(
    raw: Option<&'v XmlValue>,
    parent: &NodePath<'_>,
    field: &str,
) -> Result<Vec<&'v XmlMap>, TreeError> {
    match raw {
        None | Some(XmlValue::Null) => Ok(Vec::new()),
        Some(XmlValue::Map(map)) => Ok(vec![map]),
        Some(XmlValue::Seq(items)) => items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                XmlValue::Map(map) => Ok(map),
                other => Err(TreeError::AmbiguousCardinality {
                    path: format!("{}[{index}]", parent.field(field)),
                    found: other.kind_name(),
                }),
            })
            .collect(),
        Some(other) => Err(TreeError::AmbiguousCardinality {
            path: parent.field(field),
            found: other.kind_name(),
        }),
    }
}

/// Like [`normalize`], for repeatable fields whose items may be plain text
/// (notes, product id references, aliases). Never fails.
pub fn normalize_values(raw: Option<&XmlValue>) -> Vec<&XmlValue> {
    match raw {
        None | Some(XmlValue::Null) => Vec::new(),
        Some(XmlValue::Seq(items)) => items.iter().collect(),
        Some(single) => vec![single],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str) -> XmlValue {
        XmlValue::map([("@Name", name.into())])
    }

    fn names(items: &[&XmlMap]) -> Vec<String> {
        items
            .iter()
            .map(|m| m["@Name"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_absent_is_empty() {
        let root = NodePath::root("ProductTree");
        assert!(normalize(None, &root, "Branch").unwrap().is_empty());
        assert!(normalize(Some(&XmlValue::Null), &root, "Branch")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_single_mapping_is_wrapped() {
        let root = NodePath::root("ProductTree");
        let single = node("Acme");
        let result = normalize(Some(&single), &root, "Branch").unwrap();
        assert_eq!(result.len(), 1);
        assert!(std::ptr::eq(result[0], single.as_map().unwrap()));
    }

    #[test]
    fn test_sequence_keeps_order() {
        let root = NodePath::root("ProductTree");
        let seq = XmlValue::Seq(vec![node("a"), node("b"), node("c")]);
        let result = normalize(Some(&seq), &root, "Branch").unwrap();
        assert_eq!(names(&result), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_sequence_is_empty() {
        let root = NodePath::root("ProductTree");
        let seq = XmlValue::Seq(Vec::new());
        assert!(normalize(Some(&seq), &root, "Branch").unwrap().is_empty());
    }

    #[test]
    fn test_text_is_ambiguous() {
        let root = NodePath::root("ProductTree");
        let text = XmlValue::text("oops");
        let err = normalize(Some(&text), &root, "Branch").unwrap_err();
        assert_eq!(
            err,
            TreeError::AmbiguousCardinality {
                path: "ProductTree/Branch".to_string(),
                found: "text",
            }
        );
    }

    #[test]
    fn test_normalize_values_accepts_text() {
        let seq = XmlValue::Seq(vec!["P1".into(), "P2".into()]);
        let items = normalize_values(Some(&seq));
        let ids: Vec<_> = items.iter().filter_map(|v| v.as_str()).collect();
        assert_eq!(ids, vec!["P1", "P2"]);

        assert_eq!(normalize_values(Some(&XmlValue::text("P1"))).len(), 1);
        assert!(normalize_values(Some(&XmlValue::Null)).is_empty());
        assert!(normalize_values(None).is_empty());
    }

    #[test]
    fn test_sequence_with_text_item_is_ambiguous() {
        let root = NodePath::root("ProductTree");
        let seq = XmlValue::Seq(vec![node("a"), XmlValue::text("b")]);
        let err = normalize(Some(&seq), &root, "Branch").unwrap_err();
        assert_eq!(err.path(), Some("ProductTree/Branch[1]"));
    }
}
