//! XML to generic tree conversion.
//!
//! Converts an XML document into an [`XmlValue`] tree with the usual
//! dictionary conventions:
//!
//! - attributes are stored as `@Name`, namespace declarations are dropped,
//! - element and attribute names lose their namespace prefix,
//! - an element with only text becomes [`XmlValue::Text`], an element with
//!   attributes or children becomes [`XmlValue::Map`] with its text under
//!   `#text`, an element with nothing becomes [`XmlValue::Null`],
//! - repeated sibling elements become a [`XmlValue::Seq`] in document order.
//!
//! The reader is iterative and keeps its own element stack, bounded by
//! [`XmlTreeBuilder::max_depth`].

use super::traits::ParseError;
use crate::model::{XmlMap, XmlValue, TEXT_KEY};
use indexmap::map::Entry;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Default element nesting ceiling for XML input.
pub const DEFAULT_MAX_XML_DEPTH: usize = 1024;

/// Root element of a converted document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlTree {
    /// Local name of the root element
    pub root_name: String,
    pub root: XmlValue,
}

/// Converts XML text into an [`XmlTree`].
#[derive(Debug, Clone, Copy)]
pub struct XmlTreeBuilder {
    max_depth: usize,
}

/// An element whose end tag has not been read yet.
struct Frame {
    name: String,
    map: XmlMap,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self, ParseError> {
        let mut map = XmlMap::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| ParseError::XmlError(e.to_string()))?;
            let key = attr.key.as_ref();
            if key == b"xmlns" || key.starts_with(b"xmlns:") {
                continue;
            }
            let value = attr.unescape_value()?;
            map.insert(
                format!("@{}", local_name(attr.key.local_name().as_ref())),
                XmlValue::Text(value.trim().to_string()),
            );
        }

        Ok(Self {
            name: local_name(start.local_name().as_ref()),
            map,
            text: String::new(),
        })
    }

    fn push_text(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(text);
    }

    fn finish(self) -> (String, XmlValue) {
        let Self {
            name,
            mut map,
            text,
        } = self;

        let value = match (map.is_empty(), text.is_empty()) {
            (true, true) => XmlValue::Null,
            (true, false) => XmlValue::Text(text),
            (false, true) => XmlValue::Map(map),
            (false, false) => {
                map.insert(TEXT_KEY.to_string(), XmlValue::Text(text));
                XmlValue::Map(map)
            }
        };
        (name, value)
    }
}

impl XmlTreeBuilder {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_XML_DEPTH,
        }
    }

    /// Set the maximum element nesting depth.
    #[must_use]
    pub const fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Convert `content` into a tree.
    pub fn build(&self, content: &str) -> Result<XmlTree, ParseError> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Frame> = Vec::new();
        let mut root: Option<XmlTree> = None;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    self.check_open(&stack, root.is_some(), reader.buffer_position())?;
                    stack.push(Frame::open(e)?);
                }
                Ok(Event::Empty(ref e)) => {
                    self.check_open(&stack, root.is_some(), reader.buffer_position())?;
                    let (name, value) = Frame::open(e)?.finish();
                    close_element(&mut stack, &mut root, name, value);
                }
                Ok(Event::Text(ref e)) => {
                    if let Some(frame) = stack.last_mut() {
                        frame.push_text(&e.unescape()?);
                    }
                }
                Ok(Event::CData(ref e)) => {
                    if let Some(frame) = stack.last_mut() {
                        frame.push_text(&String::from_utf8_lossy(e));
                    }
                }
                Ok(Event::End(_)) => {
                    let frame = stack.pop().ok_or_else(|| {
                        ParseError::XmlError(format!(
                            "unexpected end tag at position {}",
                            reader.buffer_position()
                        ))
                    })?;
                    let (name, value) = frame.finish();
                    close_element(&mut stack, &mut root, name, value);
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(ParseError::XmlError(format!(
                        "error at position {}: {e}",
                        reader.buffer_position()
                    )))
                }
                _ => {}
            }
            buf.clear();
        }

        if let Some(open) = stack.last() {
            return Err(ParseError::XmlError(format!(
                "unexpected end of document inside <{}>",
                open.name
            )));
        }
        root.ok_or_else(|| ParseError::XmlError("document has no root element".to_string()))
    }

    fn check_open(
        &self,
        stack: &[Frame],
        has_root: bool,
        position: impl std::fmt::Display,
    ) -> Result<(), ParseError> {
        if stack.is_empty() && has_root {
            return Err(ParseError::XmlError(format!(
                "multiple root elements (second one at position {position})"
            )));
        }
        if stack.len() >= self.max_depth {
            return Err(ParseError::XmlError(format!(
                "element nesting exceeds the maximum depth of {} at position {position}",
                self.max_depth
            )));
        }
        Ok(())
    }
}

impl Default for XmlTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Attach a finished element to its parent, or make it the root.
fn close_element(stack: &mut [Frame], root: &mut Option<XmlTree>, name: String, value: XmlValue) {
    match stack.last_mut() {
        Some(parent) => insert_child(&mut parent.map, name, value),
        None => {
            *root = Some(XmlTree {
                root_name: name,
                root: value,
            });
        }
    }
}

/// Insert a child element, collecting repeated names into a sequence.
fn insert_child(map: &mut XmlMap, name: String, value: XmlValue) {
    match map.entry(name) {
        Entry::Vacant(entry) => {
            entry.insert(value);
        }
        Entry::Occupied(mut entry) => match entry.get_mut() {
            XmlValue::Seq(items) => items.push(value),
            existing => {
                let first = std::mem::take(existing);
                *existing = XmlValue::Seq(vec![first, value]);
            }
        },
    }
}

fn local_name(name: &[u8]) -> String {
    String::from_utf8_lossy(name).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(xml: &str) -> XmlTree {
        XmlTreeBuilder::new().build(xml).unwrap()
    }

    #[test]
    fn test_attributes_and_text() {
        let tree = build(r#"<FullProductName ProductID="P1">Widget 1.0</FullProductName>"#);
        assert_eq!(tree.root_name, "FullProductName");
        assert_eq!(
            tree.root,
            XmlValue::map([("@ProductID", "P1".into()), ("#text", "Widget 1.0".into())])
        );
    }

    #[test]
    fn test_text_only_and_empty_elements() {
        let tree = build("<a><b>text</b><c/><d></d></a>");
        assert_eq!(
            tree.root,
            XmlValue::map([
                ("b", "text".into()),
                ("c", XmlValue::Null),
                ("d", XmlValue::Null)
            ])
        );
    }

    #[test]
    fn test_single_versus_repeated_children() {
        let single = build(r#"<Tree><Branch Name="a"/></Tree>"#);
        assert!(matches!(single.root.get("Branch"), Some(XmlValue::Map(_))));

        let repeated = build(r#"<Tree><Branch Name="a"/><Branch Name="b"/><Branch Name="c"/></Tree>"#);
        match repeated.root.get("Branch") {
            Some(XmlValue::Seq(items)) => {
                let names: Vec<_> = items
                    .iter()
                    .map(|i| i.get("@Name").and_then(XmlValue::as_str).unwrap())
                    .collect();
                assert_eq!(names, vec!["a", "b", "c"]);
            }
            other => panic!("expected sequence, got {other:?}"),
        }
    }

    #[test]
    fn test_namespaces_are_stripped() {
        let tree = build(
            r#"<cvrf:cvrfdoc xmlns:cvrf="http://www.icasi.org/CVRF/schema/cvrf/1.1" xmlns="urn:x">
                 <prod:ProductTree xmlns:prod="urn:prod" prod:Lang="en"/>
               </cvrf:cvrfdoc>"#,
        );
        assert_eq!(tree.root_name, "cvrfdoc");
        assert_eq!(
            tree.root,
            XmlValue::map([("ProductTree", XmlValue::map([("@Lang", "en".into())]))])
        );
    }

    #[test]
    fn test_entities_and_cdata() {
        let tree = build("<a><b>Tom &amp; Jerry</b><c><![CDATA[<raw>]]></c></a>");
        assert_eq!(tree.root.get("b").and_then(XmlValue::as_str), Some("Tom & Jerry"));
        assert_eq!(tree.root.get("c").and_then(XmlValue::as_str), Some("<raw>"));
    }

    #[test]
    fn test_declaration_and_comments_ignored() {
        let tree = build(r#"<?xml version="1.0" encoding="UTF-8"?><!-- hi --><a>x</a>"#);
        assert_eq!(tree.root, XmlValue::text("x"));
    }

    #[test]
    fn test_mismatched_end_tag() {
        assert!(XmlTreeBuilder::new().build("<a><b></a>").is_err());
    }

    #[test]
    fn test_unclosed_element() {
        assert!(XmlTreeBuilder::new().build("<a><b>").is_err());
    }

    #[test]
    fn test_empty_input() {
        assert!(XmlTreeBuilder::new().build("").is_err());
    }

    #[test]
    fn test_multiple_roots() {
        assert!(XmlTreeBuilder::new().build("<a/><b/>").is_err());
    }

    #[test]
    fn test_depth_limit() {
        let builder = XmlTreeBuilder::new().max_depth(3);
        assert!(builder.build("<a><b><c/></b></a>").is_ok());
        let err = builder.build("<a><b><c><d/></c></b></a>").unwrap_err();
        assert!(err.to_string().contains("maximum depth"), "{err}");
    }
}
