//! Branch resolution.
//!
//! [`resolve`] walks a raw `Branch` hierarchy and flattens it into the ordered
//! branch and product sequences of a [`Resolution`]. The walk keeps its own
//! stack of open branches instead of recursing, so nesting is bounded only by
//! [`ResolverConfig::max_depth`].
//!
//! Branches come out in depth-first post-order: every node follows all of its
//! descendants, so the last entry of a resolution is the node it was started
//! from. Products come out in document order.

use super::error::TreeError;
use super::materialize::{materialize, FULL_PRODUCT_NAME};
use super::normalize::normalize;
use super::path::NodePath;
use crate::model::{BranchNode, Product, XmlMap, XmlValue};
use std::iter::Enumerate;
use std::sync::Arc;
use std::vec::IntoIter;

pub(crate) const PRODUCT_TREE: &str = "ProductTree";
pub(crate) const BRANCH: &str = "Branch";
const NAME_ATTR: &str = "@Name";
const TYPE_ATTR: &str = "@Type";

/// Default nesting ceiling for branch hierarchies.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Highest nesting ceiling the crate accepts.
///
/// Resolution itself is iterative; the raw [`XmlValue`] tree is still
/// dropped recursively, which is what bounds this value.
pub const MAX_SUPPORTED_DEPTH: usize = 1024;

/// Resolver settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Maximum nesting depth; the root node is at depth 1
    pub max_depth: usize,
}

impl ResolverConfig {
    #[must_use]
    pub const fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

/// Flattened branches and products of a (sub)tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// All branch nodes, in post-order
    pub branches: Vec<Arc<BranchNode>>,
    /// All products, in document order
    pub products: Vec<Arc<Product>>,
}

/// An internal branch whose children are still being resolved.
struct OpenBranch<'v> {
    name: Option<String>,
    branch_type: Option<String>,
    pending: Enumerate<IntoIter<&'v XmlMap>>,
    children: Vec<Arc<BranchNode>>,
}

/// What entering a node produced.
enum Entered<'v> {
    Internal(OpenBranch<'v>),
    Terminal(Arc<BranchNode>, Arc<Product>),
}

/// Resolve the branch hierarchy rooted at `node`.
///
/// `node` is treated as the `ProductTree` root for path reporting and counts
/// as depth 1.
pub fn resolve(node: &XmlMap, config: &ResolverConfig) -> Result<Resolution, TreeError> {
    let resolution = walk(node, config)?;

    tracing::debug!(
        branches = resolution.branches.len(),
        products = resolution.products.len(),
        "Resolved product tree"
    );
    Ok(resolution)
}

fn walk(root: &XmlMap, config: &ResolverConfig) -> Result<Resolution, TreeError> {
    let mut resolution = Resolution::default();
    let mut path = NodePath::root(PRODUCT_TREE);
    let mut open: Vec<OpenBranch<'_>> = Vec::new();
    let mut next = Some(root);

    loop {
        // a finished node, to be attached to its parent
        let finished = match next.take() {
            Some(node) => {
                if path.depth() > config.max_depth {
                    return Err(TreeError::UnboundedRecursion {
                        path: path.to_string(),
                        max_depth: config.max_depth,
                    });
                }
                match enter(node, &path)? {
                    Entered::Internal(branch) => {
                        open.push(branch);
                        None
                    }
                    Entered::Terminal(this, product) => {
                        resolution.branches.push(Arc::clone(&this));
                        resolution.products.push(product);
                        Some(this)
                    }
                }
            }
            None => {
                let Some(top) = open.last_mut() else {
                    return Ok(resolution);
                };
                if let Some((index, child)) = top.pending.next() {
                    path.push(BRANCH, index);
                    next = Some(child);
                    continue;
                }

                let Some(done) = open.pop() else {
                    return Ok(resolution);
                };
                let this = BranchNode::internal(done.name, done.branch_type, done.children)
                    .map(Arc::new)
                    .ok_or_else(|| TreeError::malformed_tree(&path, "branch has no children"))?;
                resolution.branches.push(Arc::clone(&this));
                tracing::trace!(path = %path, depth = path.depth(), "Resolved internal branch");
                Some(this)
            }
        };

        if let Some(this) = finished {
            match open.last_mut() {
                Some(parent) => {
                    parent.children.push(this);
                    path.pop();
                }
                None => return Ok(resolution),
            }
        }
    }
}

/// Classify one node. Internal nodes come back with their children queued;
/// terminal nodes are finished on the spot.
fn enter<'v>(node: &'v XmlMap, path: &NodePath<'_>) -> Result<Entered<'v>, TreeError> {
    let name = attribute(node, NAME_ATTR, path)?;
    let branch_type = attribute(node, TYPE_ATTR, path)?;

    match (node.get(BRANCH), node.contains_key(FULL_PRODUCT_NAME)) {
        (Some(_), true) => Err(TreeError::malformed_tree(
            path,
            "branch holds both Branch and FullProductName",
        )),
        (Some(raw), false) => {
            let children = normalize(Some(raw), path, BRANCH)?;
            if children.is_empty() {
                return Err(TreeError::malformed_tree(
                    path,
                    "Branch element is present but empty",
                ));
            }
            Ok(Entered::Internal(OpenBranch {
                name,
                branch_type,
                children: Vec::with_capacity(children.len()),
                pending: children.into_iter().enumerate(),
            }))
        }
        (None, _) => {
            let product = Arc::new(materialize(node, path)?);
            let this = Arc::new(BranchNode::terminal(
                name,
                branch_type,
                Arc::clone(&product),
            ));
            Ok(Entered::Terminal(this, product))
        }
    }
}

/// Optional string attribute of a branch node.
fn attribute(node: &XmlMap, key: &str, path: &NodePath<'_>) -> Result<Option<String>, TreeError> {
    match node.get(key) {
        None | Some(XmlValue::Null) => Ok(None),
        Some(XmlValue::Text(value)) => Ok(Some(value.clone())),
        Some(other) => Err(TreeError::malformed_tree(
            path,
            format!("attribute {key} must be a string, found {}", other.kind_name()),
        )),
    }
}
