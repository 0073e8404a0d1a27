//! CVRF advisory parser.
//!
//! Supports CVRF 1.1 and 1.2 XML documents. The XML is first converted into a
//! generic [`XmlValue`] tree; this module then maps the document-level fields
//! and hands the `ProductTree` subtree to [`ProductTree`].

use super::traits::{AdvisoryParser, FormatConfidence, FormatDetection, ParseError};
use super::xml_tree::XmlTreeBuilder;
use crate::model::{
    CvrfDocument, DocumentTracking, Note, ProductStatus, Publisher, Revision, Threat,
    Vulnerability, XmlMap, XmlValue,
};
use crate::tree::{normalize, normalize_values, NodePath, ProductTree, ResolverConfig};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const ROOT_ELEMENT: &str = "cvrfdoc";

/// Parser for CVRF XML advisories
#[derive(Debug, Clone, Default)]
pub struct CvrfParser {
    resolver: ResolverConfig,
    xml: XmlTreeBuilder,
}

impl CvrfParser {
    /// Create a new CVRF parser
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum nesting depth for both the XML reader and the
    /// product tree resolver.
    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.resolver = ResolverConfig::new(max_depth);
        // branches start below cvrfdoc and leaves add FullProductName and CPE
        self.xml = XmlTreeBuilder::new().max_depth(max_depth.saturating_add(8));
        self
    }

    /// Build a document from the converted root element.
    ///
    /// The product tree is resolved here, so a malformed tree fails the whole
    /// document.
    pub fn convert_document(&self, root: XmlValue) -> Result<CvrfDocument, ParseError> {
        let mut root = match root {
            XmlValue::Map(map) => map,
            XmlValue::Null => XmlMap::new(),
            other => {
                return Err(ParseError::InvalidStructure(format!(
                    "{ROOT_ELEMENT} must contain elements, found {}",
                    other.kind_name()
                )))
            }
        };

        let product_tree = ProductTree::from_document(&mut root, self.resolver)?;
        product_tree.branches()?;

        let doc_path = NodePath::root(ROOT_ELEMENT);
        let vulnerabilities = normalize(root.get("Vulnerability"), &doc_path, "Vulnerability")?
            .into_iter()
            .enumerate()
            .map(|(index, v)| convert_vulnerability(v, &doc_path.child("Vulnerability", index)))
            .collect::<Result<Vec<_>, _>>()?;

        let document = CvrfDocument {
            title: text_of(&root, "DocumentTitle"),
            document_type: text_of(&root, "DocumentType"),
            publisher: root.get("DocumentPublisher").map(convert_publisher),
            tracking: root
                .get("DocumentTracking")
                .and_then(XmlValue::as_map)
                .map(|t| convert_tracking(t, &doc_path))
                .transpose()?
                .unwrap_or_default(),
            notes: convert_notes(root.get("DocumentNotes")),
            product_tree,
            vulnerabilities,
        };

        tracing::debug!(
            id = document.id().unwrap_or("-"),
            vulnerabilities = document.vulnerabilities.len(),
            "Converted CVRF document"
        );
        Ok(document)
    }

    fn extract_version(content: &str) -> Option<String> {
        // namespace URIs look like http://www.icasi.org/CVRF/schema/cvrf/1.1
        let marker = "/schema/cvrf/";
        let start = content.find(marker)? + marker.len();
        let version: String = content[start..]
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        (!version.is_empty()).then_some(version)
    }
}

impl AdvisoryParser for CvrfParser {
    fn parse_str(&self, content: &str) -> Result<CvrfDocument, ParseError> {
        let tree = self.xml.build(content)?;
        if tree.root_name != ROOT_ELEMENT {
            return Err(ParseError::UnknownFormat(format!(
                "expected <{ROOT_ELEMENT}> root element, found <{}>",
                tree.root_name
            )));
        }
        self.convert_document(tree.root)
    }

    fn supported_versions(&self) -> Vec<&str> {
        vec!["1.1", "1.2"]
    }

    fn format_name(&self) -> &str {
        "CVRF"
    }

    fn detect(&self, content: &str) -> FormatDetection {
        let head: String = content.chars().take(4096).collect();
        if !head.contains("<cvrfdoc") && !head.contains(":cvrfdoc") {
            return FormatDetection::no_match();
        }

        let mut detection = FormatDetection::with_confidence(FormatConfidence::MEDIUM);
        if let Some(version) = Self::extract_version(&head) {
            detection = if self.supported_versions().contains(&version.as_str()) {
                FormatDetection::with_confidence(FormatConfidence::CERTAIN).version(&version)
            } else {
                FormatDetection::with_confidence(FormatConfidence::HIGH)
                    .version(&version)
                    .warning("unsupported CVRF schema version")
            };
        }
        detection
    }
}

fn convert_publisher(value: &XmlValue) -> Publisher {
    Publisher {
        publisher_type: attr_of(value, "@Type"),
        contact_details: value.get("ContactDetails").and_then(clean_text),
        issuing_authority: value.get("IssuingAuthority").and_then(clean_text),
    }
}

fn convert_tracking(
    tracking: &XmlMap,
    doc_path: &NodePath<'_>,
) -> Result<DocumentTracking, ParseError> {
    let path = doc_path.child("DocumentTracking", 0);
    let identification = tracking.get("Identification");

    let revisions = match tracking.get("RevisionHistory") {
        Some(history) => normalize(history.get("Revision"), &path, "Revision")?
            .into_iter()
            .map(|revision| Revision {
                number: text_of(revision, "Number"),
                date: text_of(revision, "Date").and_then(|d| parse_date("Revision/Date", &d)),
                description: text_of(revision, "Description"),
            })
            .collect(),
        None => Vec::new(),
    };

    Ok(DocumentTracking {
        id: identification.and_then(|i| i.get("ID")).and_then(clean_text),
        aliases: identification
            .and_then(|i| i.get("Alias"))
            .map(texts_of)
            .unwrap_or_default(),
        status: text_of(tracking, "Status"),
        version: text_of(tracking, "Version"),
        revisions,
        initial_release_date: text_of(tracking, "InitialReleaseDate")
            .and_then(|d| parse_date("InitialReleaseDate", &d)),
        current_release_date: text_of(tracking, "CurrentReleaseDate")
            .and_then(|d| parse_date("CurrentReleaseDate", &d)),
    })
}

fn convert_notes(value: Option<&XmlValue>) -> Vec<Note> {
    normalize_values(value.and_then(|notes| notes.get("Note")))
        .into_iter()
        .map(|note| Note {
            title: attr_of(note, "@Title"),
            note_type: attr_of(note, "@Type"),
            ordinal: attr_of(note, "@Ordinal"),
            text: clean_text(note).unwrap_or_default(),
        })
        .collect()
}

fn convert_vulnerability(
    vuln: &XmlMap,
    path: &NodePath<'_>,
) -> Result<Vulnerability, ParseError> {
    let cwe = normalize_values(vuln.get("CWE"))
        .into_iter()
        .filter_map(cwe_id)
        .collect();

    let product_statuses = match vuln.get("ProductStatuses") {
        Some(statuses) => normalize(statuses.get("Status"), path, "Status")?
            .into_iter()
            .map(|status| ProductStatus {
                status_type: text_of(status, "@Type"),
                product_ids: status.get("ProductID").map(texts_of).unwrap_or_default(),
            })
            .collect(),
        None => Vec::new(),
    };

    let threats = match vuln.get("Threats") {
        Some(threats) => normalize(threats.get("Threat"), path, "Threat")?
            .into_iter()
            .map(|threat| Threat {
                threat_type: text_of(threat, "@Type"),
                description: text_of(threat, "Description"),
                product_ids: threat.get("ProductID").map(texts_of).unwrap_or_default(),
            })
            .collect(),
        None => Vec::new(),
    };

    Ok(Vulnerability {
        ordinal: text_of(vuln, "@Ordinal"),
        title: text_of(vuln, "Title"),
        cve: text_of(vuln, "CVE"),
        cwe,
        product_statuses,
        threats,
    })
}

fn cwe_id(value: &XmlValue) -> Option<String> {
    attr_of(value, "@ID").or_else(|| clean_text(value))
}

/// Text of a repeatable text element: one entry per occurrence.
fn texts_of(value: &XmlValue) -> Vec<String> {
    normalize_values(Some(value))
        .into_iter()
        .filter_map(clean_text)
        .collect()
}

fn text_of(map: &XmlMap, key: &str) -> Option<String> {
    map.get(key).and_then(clean_text)
}

fn attr_of(value: &XmlValue, key: &str) -> Option<String> {
    value.get(key).and_then(clean_text)
}

fn clean_text(value: &XmlValue) -> Option<String> {
    value
        .text_content()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse a CVRF date; CVRF uses `xs:dateTime`, often without a timezone.
fn parse_date(field: &str, value: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(date) = NaiveDateTime::parse_from_str(value, format) {
            return Some(date.and_utc());
        }
    }
    if let Some(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Some(date.and_utc());
    }

    tracing::warn!("Ignoring unparseable {} '{}'", field, value);
    None
}
