//! Summary and table report generators for shell output.

use super::{Finding, ReportConfig, ReportError, ReportFormat, ReportGenerator, Severity};
use crate::model::{BranchNode, CvrfDocument, Product};
use std::fmt::Write as _;
use std::sync::Arc;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "red",
        Severity::Warning => "yellow",
    }
}

/// Summary reporter for shell output
pub struct SummaryReporter {
    colored: bool,
}

impl SummaryReporter {
    /// Create a new summary reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    fn header(&self, lines: &mut Vec<String>, title: &str, config: &ReportConfig) {
        lines.push(self.color(title, "bold"));
        lines.push(self.color(&"─".repeat(40), "dim"));
        if let Some(source) = &config.source {
            lines.push(format!("{}  {source}", self.color("File:", "cyan")));
        }
        if !config.filters.is_empty() {
            lines.push(format!(
                "{}  {}",
                self.color("Filter:", "cyan"),
                config.filters.join(", ")
            ));
        }
    }

    fn field(&self, lines: &mut Vec<String>, label: &str, value: Option<&str>) {
        if let Some(value) = value {
            lines.push(format!("{}  {value}", self.color(&format!("{label:<10}"), "cyan")));
        }
    }

    /// Indented rendering of the hierarchy below `root`, in document order.
    fn push_tree(&self, lines: &mut Vec<String>, root: &BranchNode) {
        let mut stack: Vec<(&BranchNode, usize)> =
            root.children().iter().rev().map(|child| (&**child, 1)).collect();
        while let Some((node, depth)) = stack.pop() {
            let indent = "  ".repeat(depth);
            let label = match (node.branch_type(), node.name()) {
                (Some(kind), Some(name)) => format!("{} {name}", self.color(kind, "dim")),
                (None, Some(name)) => name.to_string(),
                (Some(kind), None) => self.color(kind, "dim"),
                (None, None) => self.color("(unnamed)", "dim"),
            };
            lines.push(format!("{indent}{label}"));
            if let Some(product) = node.product() {
                lines.push(format!("{indent}  {}", self.product_line(product)));
            }
            stack.extend(
                node.children()
                    .iter()
                    .rev()
                    .map(|child| (&**child, depth + 1)),
            );
        }
    }

    fn product_line(&self, product: &Product) -> String {
        let mut line = format!(
            "{} {}",
            self.color(&format!("[{}]", product.product_id), "green"),
            product.display_text
        );
        if let Some(cpe) = &product.cpe {
            let _ = write!(line, " {}", self.color(cpe, "dim"));
        }
        line
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for SummaryReporter {
    fn generate_view_report(
        &self,
        doc: &CvrfDocument,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let branches = doc.product_tree.branches()?;
        let products = doc.product_tree.products()?;
        let mut lines = Vec::new();

        self.header(&mut lines, "CVRF Advisory", config);
        self.field(&mut lines, "Title:", doc.title.as_deref());
        self.field(&mut lines, "Type:", doc.document_type.as_deref());
        self.field(&mut lines, "ID:", doc.id());
        self.field(&mut lines, "Version:", doc.tracking.version.as_deref());
        self.field(&mut lines, "Status:", doc.tracking.status.as_deref());
        if let Some(publisher) = &doc.publisher {
            self.field(&mut lines, "Publisher:", publisher.publisher_type.as_deref());
        }
        if let Some(date) = doc.tracking.current_release_date {
            self.field(&mut lines, "Released:", Some(&date.to_rfc3339()));
        }

        lines.push(String::new());
        lines.push(format!(
            "{}  {} in {}, {}",
            self.color("Size:", "cyan"),
            plural(products.len(), "product", "products"),
            plural(branches.len(), "branch", "branches"),
            plural(doc.vulnerability_count(), "vulnerability", "vulnerabilities"),
        ));

        if let Some(root) = doc.product_tree.root()? {
            lines.push(String::new());
            lines.push(self.color("Product tree:", "bold"));
            if let Some(product) = root.product() {
                lines.push(format!("  {}", self.product_line(product)));
            }
            self.push_tree(&mut lines, root);
        }

        if !doc.vulnerabilities.is_empty() {
            lines.push(String::new());
            lines.push(self.color("Vulnerabilities:", "bold"));
            for vuln in &doc.vulnerabilities {
                let cve = vuln.cve.as_deref().unwrap_or("No CVE");
                lines.push(format!(
                    "  {} {}",
                    self.color(cve, "red"),
                    vuln.title.as_deref().unwrap_or("Untitled")
                ));
            }
        }

        Ok(lines.join("\n"))
    }

    fn generate_products_report(
        &self,
        _doc: &CvrfDocument,
        products: &[Arc<Product>],
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();
        self.header(&mut lines, "Products", config);
        for product in products {
            lines.push(format!("  {}", self.product_line(product)));
        }
        lines.push(String::new());
        lines.push(format!("Total: {}", plural(products.len(), "product", "products")));
        Ok(lines.join("\n"))
    }

    fn generate_branches_report(
        &self,
        _doc: &CvrfDocument,
        branches: &[Arc<BranchNode>],
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();
        self.header(&mut lines, "Branches", config);
        for branch in branches {
            let mut line = format!(
                "  {} {}",
                self.color(branch.branch_type().unwrap_or("-"), "dim"),
                branch.name().unwrap_or("(root)")
            );
            if let Some(product) = branch.product() {
                let _ = write!(line, " → {}", self.product_line(product));
            } else {
                let _ = write!(
                    line,
                    " {}",
                    self.color(
                        &format!("({})", plural(branch.children().len(), "child", "children")),
                        "dim"
                    )
                );
            }
            lines.push(line);
        }
        lines.push(String::new());
        lines.push(format!("Total: {}", plural(branches.len(), "branch", "branches")));
        Ok(lines.join("\n"))
    }

    fn generate_validation_report(
        &self,
        doc: &CvrfDocument,
        findings: &[Finding],
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();
        self.header(&mut lines, "Validation", config);
        self.field(&mut lines, "ID:", doc.id());
        lines.push(String::new());

        if findings.is_empty() {
            lines.push(self.color("✓ No problems found", "green"));
            return Ok(lines.join("\n"));
        }

        for finding in findings {
            lines.push(format!(
                "  {} {}",
                self.color(
                    &format!("{}:", finding.severity),
                    severity_color(finding.severity)
                ),
                finding.message
            ));
        }
        let errors = findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count();
        lines.push(String::new());
        lines.push(format!(
            "{}, {}",
            plural(errors, "error", "errors"),
            plural(findings.len() - errors, "warning", "warnings")
        ));
        Ok(lines.join("\n"))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Summary
    }
}

/// Table reporter for aligned terminal output
pub struct TableReporter {
    colored: bool,
}

impl TableReporter {
    /// Create a new table reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    /// Render rows under a bold header, each column as wide as its widest
    /// cell but no wider than its limit.
    fn table(&self, headers: &[(&str, usize)], rows: &[Vec<String>]) -> Vec<String> {
        let widths: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(i, (title, limit))| {
                rows.iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.width())
                    .chain(std::iter::once(title.width()))
                    .max()
                    .unwrap_or(0)
                    .min(*limit)
            })
            .collect();

        let mut lines = Vec::with_capacity(rows.len() + 2);
        lines.push(self.color(&render_row(headers.iter().map(|(t, _)| *t), &widths), "bold"));
        lines.push("─".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
        for row in rows {
            lines.push(render_row(row.iter().map(String::as_str), &widths));
        }
        lines
    }

    fn product_rows(products: &[Arc<Product>]) -> Vec<Vec<String>> {
        products
            .iter()
            .map(|p| {
                vec![
                    p.product_id.clone(),
                    p.display_text.clone(),
                    p.cpe.clone().unwrap_or_else(|| "-".to_string()),
                ]
            })
            .collect()
    }
}

const PRODUCT_COLUMNS: [(&str, usize); 3] = [("PRODUCT ID", 24), ("NAME", 48), ("CPE", 60)];

impl Default for TableReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for TableReporter {
    fn generate_view_report(
        &self,
        doc: &CvrfDocument,
        _config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let products = doc.product_tree.products()?;
        let branches = doc.product_tree.branches()?;

        let mut lines = vec![self.color(&doc.to_string(), "bold"), String::new()];
        lines.extend(self.table(&PRODUCT_COLUMNS, &Self::product_rows(products)));
        lines.push(String::new());
        lines.push(format!(
            "Total: {}, {}, {}",
            plural(products.len(), "product", "products"),
            plural(branches.len(), "branch", "branches"),
            plural(doc.vulnerability_count(), "vulnerability", "vulnerabilities"),
        ));
        Ok(lines.join("\n"))
    }

    fn generate_products_report(
        &self,
        _doc: &CvrfDocument,
        products: &[Arc<Product>],
        _config: &ReportConfig,
    ) -> Result<String, ReportError> {
        Ok(self
            .table(&PRODUCT_COLUMNS, &Self::product_rows(products))
            .join("\n"))
    }

    fn generate_branches_report(
        &self,
        _doc: &CvrfDocument,
        branches: &[Arc<BranchNode>],
        _config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let rows: Vec<Vec<String>> = branches
            .iter()
            .map(|b| {
                vec![
                    b.branch_type().unwrap_or("-").to_string(),
                    b.name().unwrap_or("(root)").to_string(),
                    b.product()
                        .map_or_else(|| b.children().len().to_string(), |p| p.product_id.clone()),
                ]
            })
            .collect();
        Ok(self
            .table(&[("TYPE", 24), ("NAME", 48), ("PRODUCT/CHILDREN", 24)], &rows)
            .join("\n"))
    }

    fn generate_validation_report(
        &self,
        _doc: &CvrfDocument,
        findings: &[Finding],
        _config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let rows: Vec<Vec<String>> = findings
            .iter()
            .map(|f| vec![f.severity.to_string(), f.message.clone()])
            .collect();
        Ok(self
            .table(&[("SEVERITY", 8), ("MESSAGE", 100)], &rows)
            .join("\n"))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Table
    }
}

fn render_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| pad(&truncate(cell, *width), *width))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Truncate to at most `max_width` display columns, marking the cut with `…`.
fn truncate(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let budget = max_width.saturating_sub(1);
    let mut used = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    if max_width > 0 {
        out.push('…');
    }
    out
}

/// Pad with spaces to `width` display columns.
fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    format!("{s}{}", " ".repeat(fill))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::parse_document_str;

    const DOC: &str = r#"<cvrfdoc>
  <DocumentTitle>Widget advisory</DocumentTitle>
  <DocumentType>Security Advisory</DocumentType>
  <DocumentTracking><Identification><ID>ACME-1</ID></Identification></DocumentTracking>
  <ProductTree>
    <Branch Type="Vendor" Name="Acme">
      <Branch Type="Product Name" Name="Widget">
        <FullProductName ProductID="P1" CPE="cpe:/a:acme:widget:1.0">Widget 1.0</FullProductName>
      </Branch>
      <Branch Type="Product Name" Name="Gadget">
        <FullProductName ProductID="P2">Gadget</FullProductName>
      </Branch>
    </Branch>
  </ProductTree>
  <Vulnerability><Title>Overflow</Title><CVE>CVE-2024-0001</CVE></Vulnerability>
</cvrfdoc>"#;

    #[test]
    fn test_summary_view_shows_tree() {
        let doc = parse_document_str(DOC).unwrap();
        let report = SummaryReporter::new()
            .no_color()
            .generate_view_report(&doc, &ReportConfig::default())
            .unwrap();

        assert!(report.contains("Widget advisory"));
        assert!(report.contains("2 products in 4 branches, 1 vulnerability"));
        assert!(report.contains("  Vendor Acme\n    Product Name Widget\n      [P1] Widget 1.0"));
        assert!(report.contains("CVE-2024-0001 Overflow"));
        assert!(!report.contains('\x1b'));
    }

    #[test]
    fn test_colored_output_has_escapes() {
        let doc = parse_document_str(DOC).unwrap();
        let report = SummaryReporter::new()
            .generate_view_report(&doc, &ReportConfig::default())
            .unwrap();
        assert!(report.contains("\x1b[1m"));
    }

    #[test]
    fn test_summary_branches_post_order() {
        let doc = parse_document_str(DOC).unwrap();
        let branches = doc.product_tree.branches().unwrap();
        let report = SummaryReporter::new()
            .no_color()
            .generate_branches_report(&doc, branches, &ReportConfig::default())
            .unwrap();

        let widget = report.find("Widget").unwrap();
        let acme = report.find("Acme").unwrap();
        let root = report.find("(root)").unwrap();
        assert!(widget < acme && acme < root);
        assert!(report.contains("Total: 4 branches"));
    }

    #[test]
    fn test_validation_report() {
        let doc = parse_document_str(DOC).unwrap();
        let reporter = SummaryReporter::new().no_color();

        let clean = reporter
            .generate_validation_report(&doc, &[], &ReportConfig::default())
            .unwrap();
        assert!(clean.contains("No problems found"));

        let findings = vec![
            Finding::error("duplicate product id P1"),
            Finding::warning("vulnerability 1 has no CVE"),
        ];
        let report = reporter
            .generate_validation_report(&doc, &findings, &ReportConfig::with_source("a.xml"))
            .unwrap();
        assert!(report.contains("File:  a.xml"));
        assert!(report.contains("error: duplicate product id P1"));
        assert!(report.contains("1 error, 1 warning"));
    }

    #[test]
    fn test_table_products_aligned() {
        let doc = parse_document_str(DOC).unwrap();
        let products = doc.product_tree.products().unwrap();
        let report = TableReporter::new()
            .no_color()
            .generate_products_report(&doc, products, &ReportConfig::default())
            .unwrap();

        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("PRODUCT ID  NAME"));
        let cpe_column = lines[0].find("CPE").unwrap();
        assert_eq!(lines[2].find("cpe:/a:acme"), Some(cpe_column));
        assert!(lines[3].ends_with('-'));
    }

    #[test]
    fn test_truncate_and_pad_use_display_width() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefgh", 5), "abcd…");
        // wide characters take two columns each
        assert_eq!(truncate("日本語テキスト", 5), "日本…");
        assert_eq!(pad("日本", 6), "日本  ");
    }
}
