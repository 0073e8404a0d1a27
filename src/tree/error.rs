//! Product tree resolution errors.

use thiserror::Error;

/// Errors raised while resolving a product tree.
///
/// Every variant except [`TreeError::MissingProductTree`] carries the path of
/// the offending node, e.g. `ProductTree/Branch[0]/Branch[2]`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// A repeatable field is neither a mapping nor a sequence of mappings
    #[error("Ambiguous cardinality at {path}: expected a mapping or a sequence of mappings, found {found}")]
    AmbiguousCardinality { path: String, found: &'static str },

    /// Structural contradiction in a branch node
    #[error("Malformed product tree at {path}: {reason}")]
    MalformedTree { path: String, reason: String },

    /// A terminal node's product data lacks a required field
    #[error("Malformed FullProductName at {path}: {reason}")]
    MalformedLeaf { path: String, reason: String },

    /// Nesting exceeds the configured ceiling
    #[error("Product tree nesting exceeds the maximum depth of {max_depth} at {path}")]
    UnboundedRecursion { path: String, max_depth: usize },

    /// The document has no product tree at all
    #[error("Document has no ProductTree element")]
    MissingProductTree,
}

impl TreeError {
    pub(crate) fn malformed_tree(path: impl ToString, reason: impl Into<String>) -> Self {
        Self::MalformedTree {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed_leaf(path: impl ToString, reason: impl Into<String>) -> Self {
        Self::MalformedLeaf {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    /// Path of the offending node, if the error has one.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::AmbiguousCardinality { path, .. }
            | Self::MalformedTree { path, .. }
            | Self::MalformedLeaf { path, .. }
            | Self::UnboundedRecursion { path, .. } => Some(path),
            Self::MissingProductTree => None,
        }
    }
}
