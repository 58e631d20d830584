//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every document leads with its positional index and title. The file path
//! and metadata follow as indented lines, then one `!` line per problem.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Documents
//! 001 Spies
//!     Source: _drafts/spies.md
//!     Layout: draft | Categories: testing
//!     ! unknown layout `draft`
//! 002 Test doubles: an overview
//!     Source: _posts/2021-03-14-test-doubles.md
//!     Layout: post | Date: 2021-03-14 | Categories: testing, doubles
//! 003 (_posts/2021-05-01-broken.md)
//!     ! malformed front matter: opening `---` has no matching closing `---`
//!
//! Checked 3 documents: 1 failed, 1 with findings (1 finding)
//! ```
//!
//! ## Show
//!
//! ```text
//! Front matter
//!     layout: post
//!     categories: [testing, doubles]
//! Identity
//!     Date: 2021-03-14
//!     Slug: test-doubles
//! Outline
//!     # Test doubles
//!     code: python (2 lines)
//! Findings
//!     none
//! ```
//!
//! # Architecture
//!
//! Each view is a pure `format_*` function returning `Vec<String>`, wrapped by
//! a `print_*` function that writes the lines to stdout.

use crate::scan::{CheckedDocument, Manifest, Outcome, Summary};
use crate::types::{Document, FieldValue};
use crate::validate::ValidationReport;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Titled documents show their title; untitled ones show the path in parens.
fn document_header(index: usize, title: Option<&str>, path: &str) -> String {
    match title.map(str::trim) {
        Some(t) if !t.is_empty() => format!("{} {}", format_index(index), t),
        _ => format!("{} ({})", format_index(index), path),
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// One-line metadata summary: layout, date, categories. Empty parts omitted.
fn metadata_line(doc: &Document) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(layout) = doc.layout() {
        parts.push(format!("Layout: {layout}"));
    }
    if let Some(date) = doc.identity.as_ref().and_then(|id| id.date) {
        parts.push(format!("Date: {date}"));
    }
    let categories = doc.categories();
    if !categories.is_empty() {
        parts.push(format!("Categories: {}", categories.join(", ")));
    }
    if let Some(permalink) = doc.permalink() {
        parts.push(format!("Permalink: {permalink}"));
    }
    (!parts.is_empty()).then(|| parts.join(" | "))
}

fn finding_lines(report: &ValidationReport, depth: usize) -> Vec<String> {
    report
        .findings
        .iter()
        .map(|f| format!("{}! {}", indent(depth), f))
        .collect()
}

fn render_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Scalar(s) => s.clone(),
        FieldValue::List(items) => format!("[{}]", items.join(", ")),
    }
}

// ============================================================================
// Check report
// ============================================================================

/// Format the batch report for every entry in a manifest.
///
/// With `problems_only`, clean documents are left out of the listing but
/// still counted in the summary.
pub fn format_check_report(manifest: &Manifest, problems_only: bool) -> Vec<String> {
    let mut lines = vec!["Documents".to_string()];

    for (i, entry) in manifest.entries.iter().enumerate() {
        match &entry.outcome {
            Outcome::Checked(checked) => {
                if problems_only && checked.report.is_clean() {
                    continue;
                }
                let doc = &checked.document;
                lines.push(document_header(i + 1, doc.title(), &entry.path));
                if doc.title().is_some_and(|t| !t.trim().is_empty()) {
                    lines.push(format!("{}Source: {}", indent(1), entry.path));
                }
                if let Some(meta) = metadata_line(doc) {
                    lines.push(format!("{}{}", indent(1), meta));
                }
                lines.extend(finding_lines(&checked.report, 1));
            }
            Outcome::Failed { error } => {
                lines.push(document_header(i + 1, None, &entry.path));
                lines.push(format!("{}! {}", indent(1), error));
            }
        }
    }

    lines.push(String::new());
    lines.push(format_summary(&manifest.summary()));
    lines
}

/// `Checked N documents: F failed, W with findings (K findings)`
pub fn format_summary(summary: &Summary) -> String {
    if summary.failed == 0 && summary.findings == 0 {
        return format!("Checked {}: all clean", plural(summary.documents, "document"));
    }
    format!(
        "Checked {}: {} failed, {} with findings ({})",
        plural(summary.documents, "document"),
        summary.failed,
        summary.with_findings,
        plural(summary.findings, "finding"),
    )
}

/// Print the check report to stdout.
pub fn print_check_report(manifest: &Manifest, problems_only: bool) {
    for line in format_check_report(manifest, problems_only) {
        println!("{}", line);
    }
}

// ============================================================================
// Single document view
// ============================================================================

/// Format the detailed view of one checked document.
pub fn format_document(checked: &CheckedDocument) -> Vec<String> {
    let doc = &checked.document;
    let mut lines = Vec::new();

    lines.push("Front matter".to_string());
    if doc.front_matter.is_empty() {
        lines.push(format!("{}none", indent(1)));
    }
    for (key, value) in doc.front_matter.iter() {
        lines.push(format!("{}{}: {}", indent(1), key, render_value(value)));
    }

    if let Some(identity) = &doc.identity {
        lines.push("Identity".to_string());
        if let Some(date) = identity.date {
            lines.push(format!("{}Date: {}", indent(1), date));
        }
        lines.push(format!("{}Slug: {}", indent(1), identity.slug));
    }

    lines.push("Outline".to_string());
    let outline = &checked.outline;
    if outline.headings.is_empty() && outline.code_blocks.is_empty() {
        lines.push(format!("{}empty", indent(1)));
    }
    for heading in &outline.headings {
        lines.push(format!(
            "{}{} {}",
            indent(1),
            "#".repeat(heading.level as usize),
            heading.text
        ));
    }
    for block in &outline.code_blocks {
        lines.push(format!(
            "{}code: {} ({})",
            indent(1),
            block.language.as_deref().unwrap_or("untagged"),
            plural(block.lines, "line")
        ));
    }

    lines.push("Findings".to_string());
    if checked.report.is_clean() {
        lines.push(format!("{}none", indent(1)));
    }
    lines.extend(finding_lines(&checked.report, 1));
    lines
}

/// Print the single document view to stdout.
pub fn print_document(checked: &CheckedDocument) {
    for line in format_document(checked) {
        println!("{}", line);
    }
}
