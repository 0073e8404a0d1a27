//! Product tree node types.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A concrete, identified product (`FullProductName`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Product {
    /// Document-unique product identifier (`ProductID`)
    pub product_id: String,
    /// Human-readable product name
    pub display_text: String,
    /// Common Platform Enumeration identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpe: Option<String>,
}

impl Product {
    /// Create a new product
    pub fn new(
        product_id: impl Into<String>,
        display_text: impl Into<String>,
        cpe: Option<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            display_text: display_text.into(),
            cpe,
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {}", self.product_id, self.display_text)
    }
}

/// Payload of a [`BranchNode`]: either child branches or exactly one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchKind {
    /// Grouping node with at least one child
    Internal(Vec<Arc<BranchNode>>),
    /// Leaf node owning one product
    Terminal(Arc<Product>),
}

/// A node in the product hierarchy.
///
/// Nodes are immutable once built. Child nodes and products are shared via
/// [`Arc`] with the flattened sequences held by
/// [`ProductTree`](crate::tree::ProductTree). Dropping a node releases its
/// subtree level by level, so deep hierarchies do not exhaust the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchNode {
    name: Option<String>,
    branch_type: Option<String>,
    kind: BranchKind,
}

impl BranchNode {
    /// Create a terminal node owning `product`.
    #[must_use]
    pub const fn terminal(
        name: Option<String>,
        branch_type: Option<String>,
        product: Arc<Product>,
    ) -> Self {
        Self {
            name,
            branch_type,
            kind: BranchKind::Terminal(product),
        }
    }

    /// Create an internal node.
    ///
    /// Returns `None` when `children` is empty: an internal node without
    /// children would be neither internal nor terminal.
    #[must_use]
    pub fn internal(
        name: Option<String>,
        branch_type: Option<String>,
        children: Vec<Arc<BranchNode>>,
    ) -> Option<Self> {
        if children.is_empty() {
            return None;
        }
        Some(Self {
            name,
            branch_type,
            kind: BranchKind::Internal(children),
        })
    }

    /// Grouping label, e.g. a vendor name
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Grouping category, e.g. `Vendor` or `Product Name`
    #[must_use]
    pub fn branch_type(&self) -> Option<&str> {
        self.branch_type.as_deref()
    }

    #[must_use]
    pub const fn kind(&self) -> &BranchKind {
        &self.kind
    }

    /// Direct children; empty for terminal nodes.
    #[must_use]
    pub fn children(&self) -> &[Arc<BranchNode>] {
        match &self.kind {
            BranchKind::Internal(children) => children,
            BranchKind::Terminal(_) => &[],
        }
    }

    /// The owned product of a terminal node.
    #[must_use]
    pub const fn product(&self) -> Option<&Arc<Product>> {
        match &self.kind {
            BranchKind::Terminal(product) => Some(product),
            BranchKind::Internal(_) => None,
        }
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self.kind, BranchKind::Terminal(_))
    }

    /// Products in this node's subtree, in document order.
    #[must_use]
    pub fn subtree_products(&self) -> Vec<&Arc<Product>> {
        let mut products = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match &node.kind {
                BranchKind::Terminal(product) => products.push(product),
                // reversed so the first child is visited first
                BranchKind::Internal(children) => {
                    stack.extend(children.iter().rev().map(|child| &**child));
                }
            }
        }
        products
    }
}

impl Drop for BranchNode {
    fn drop(&mut self) {
        let BranchKind::Internal(children) = &mut self.kind else {
            return;
        };
        let mut orphans = std::mem::take(children);
        while let Some(child) = orphans.pop() {
            // shared nodes are released by their last owner
            if let Ok(mut node) = Arc::try_unwrap(child) {
                if let BranchKind::Internal(grandchildren) = &mut node.kind {
                    orphans.append(grandchildren);
                }
            }
        }
    }
}

impl fmt::Display for BranchNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Branch ({}) {}",
            self.branch_type().unwrap_or("-"),
            self.name().unwrap_or("-")
        )?;
        if let Some(product) = self.product() {
            write!(f, ": {product}")?;
        }
        Ok(())
    }
}
