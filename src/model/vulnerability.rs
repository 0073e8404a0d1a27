//! Vulnerability entries of a CVRF document.

use serde::Serialize;
use std::fmt;

/// A `Vulnerability` element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Vulnerability {
    /// Position of the vulnerability within the document
    pub ordinal: Option<String>,
    pub title: Option<String>,
    /// CVE identifier, e.g. `CVE-2017-3881`
    pub cve: Option<String>,
    /// CWE identifiers
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cwe: Vec<String>,
    /// Per-status lists of affected product ids
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub product_statuses: Vec<ProductStatus>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub threats: Vec<Threat>,
}

impl Vulnerability {
    /// Threats attached to this vulnerability, in document order.
    #[must_use]
    pub fn threats(&self) -> &[Threat] {
        &self.threats
    }

    /// Every product id this vulnerability refers to, in document order.
    pub fn referenced_product_ids(&self) -> impl Iterator<Item = &str> {
        self.product_statuses
            .iter()
            .flat_map(|s| s.product_ids.iter())
            .chain(self.threats.iter().flat_map(|t| t.product_ids.iter()))
            .map(String::as_str)
    }
}

impl fmt::Display for Vulnerability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: ({}) {}",
            self.ordinal.as_deref().unwrap_or("?"),
            self.cve.as_deref().unwrap_or("No CVE"),
            self.title.as_deref().unwrap_or("Untitled")
        )
    }
}

/// A `Status` entry of `ProductStatuses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductStatus {
    /// Status type, e.g. `Known Affected` or `Fixed`
    pub status_type: Option<String>,
    pub product_ids: Vec<String>,
}

/// A `Threat` entry of `Threats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Threat {
    /// Threat type, e.g. `Impact` or `Exploit Status`
    pub threat_type: Option<String>,
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub product_ids: Vec<String>,
}

impl fmt::Display for Threat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}) {}",
            self.threat_type.as_deref().unwrap_or("-"),
            self.description.as_deref().unwrap_or("")
        )
    }
}
