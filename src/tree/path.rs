//! Node paths for error reporting.

use std::fmt;

/// Location of a node inside the raw tree, e.g. `ProductTree/Branch[0]/Branch[2]`.
///
/// A path is a stack of segments. The resolver keeps a single path and
/// pushes and pops segments as it walks; the string form is only built when
/// an error is raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePath<'a> {
    segments: Vec<Segment<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment<'a> {
    name: &'a str,
    index: Option<usize>,
}

impl<'a> NodePath<'a> {
    /// Path of a root element.
    #[must_use]
    pub fn root(name: &'a str) -> Self {
        Self {
            segments: vec![Segment { name, index: None }],
        }
    }

    /// Path of the `index`-th `name` element below `self`.
    #[must_use]
    pub fn child(&self, name: &'a str, index: usize) -> Self {
        let mut path = self.clone();
        path.push(name, index);
        path
    }

    /// Descend into the `index`-th `name` element.
    pub fn push(&mut self, name: &'a str, index: usize) {
        self.segments.push(Segment {
            name,
            index: Some(index),
        });
    }

    /// Return to the parent element. The root segment is never removed.
    pub fn pop(&mut self) {
        if self.segments.len() > 1 {
            self.segments.pop();
        }
    }

    /// Number of segments, counting the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Render the path of the field `name` below `self`.
    pub(crate) fn field(&self, name: &str) -> String {
        format!("{self}/{name}")
    }
}

impl fmt::Display for NodePath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            f.write_str(segment.name)?;
            if let Some(index) = segment.index {
                write!(f, "[{index}]")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_display() {
        assert_eq!(NodePath::root("ProductTree").to_string(), "ProductTree");
    }

    #[test]
    fn test_nested_display() {
        let root = NodePath::root("ProductTree");
        let first = root.child("Branch", 0);
        let second = first.child("Branch", 2);
        assert_eq!(second.to_string(), "ProductTree/Branch[0]/Branch[2]");
        assert_eq!(second.field("FullProductName"), "ProductTree/Branch[0]/Branch[2]/FullProductName");
        assert_eq!(root.to_string(), "ProductTree");
    }

    #[test]
    fn test_push_and_pop() {
        let mut path = NodePath::root("ProductTree");
        path.push("Branch", 1);
        path.push("Branch", 0);
        assert_eq!(path.depth(), 3);
        assert_eq!(path.to_string(), "ProductTree/Branch[1]/Branch[0]");

        path.pop();
        path.pop();
        path.pop();
        assert_eq!(path.depth(), 1);
        assert_eq!(path.to_string(), "ProductTree");
    }
}
