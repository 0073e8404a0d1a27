//! Generic XML tree representation.
//!
//! [`XmlValue`] is the dynamically-shaped tree produced by
//! [`XmlTreeBuilder`](crate::parsers::XmlTreeBuilder). It mirrors the usual
//! XML-to-dictionary conventions: attributes become `@Name` keys, mixed text
//! becomes `#text`, and repeated sibling elements collapse into a sequence.
//! The last point is what makes the tree ambiguous: an element that may repeat
//! shows up as a lone value when it occurs once and as a [`XmlValue::Seq`]
//! otherwise.

use indexmap::IndexMap;
use serde::Serialize;

/// Mapping from element or attribute name to value, in document order.
pub type XmlMap = IndexMap<String, XmlValue>;

/// Key under which mixed text content is stored in an [`XmlMap`].
pub const TEXT_KEY: &str = "#text";

/// A node of the generic XML tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum XmlValue {
    /// Element without attributes, children or text
    #[default]
    Null,
    /// Element with text content only
    Text(String),
    /// Element with attributes and/or child elements
    Map(XmlMap),
    /// Repeated sibling elements, in document order
    Seq(Vec<XmlValue>),
}

impl XmlValue {
    /// Build a mapping value from key/value pairs.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, XmlValue)>,
    {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build a text value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Short name of the value's shape, used in error messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "empty element",
            Self::Text(_) => "text",
            Self::Map(_) => "mapping",
            Self::Seq(_) => "sequence",
        }
    }

    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The value as a mapping, if it is one.
    #[must_use]
    pub const fn as_map(&self) -> Option<&XmlMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// The value as a plain string, if it is text.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Text content of the element.
    ///
    /// Works for both text-only elements and elements that carry attributes
    /// alongside their text (`#text`).
    #[must_use]
    pub fn text_content(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Map(map) => map.get(TEXT_KEY).and_then(Self::as_str),
            _ => None,
        }
    }

    /// Look up a key, if the value is a mapping.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&XmlValue> {
        self.as_map().and_then(|map| map.get(key))
    }
}

impl From<&str> for XmlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for XmlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<XmlMap> for XmlValue {
    fn from(value: XmlMap) -> Self {
        Self::Map(value)
    }
}

impl From<Vec<XmlValue>> for XmlValue {
    fn from(value: Vec<XmlValue>) -> Self {
        Self::Seq(value)
    }
}
