//! @ai:module:intent Format documents and project reports for different outputs (JSON, text)
//! @ai:module:layer infrastructure
//! @ai:module:public_api OutputFormat, DocumentView, format_document, format_project, to_json
//! @ai:module:depends_on document, project, annotation
//! @ai:module:stateless true

use crate::annotation::Severity;
use crate::document::AnnotatedDocument;
use crate::project::{NodeKind, ProjectNode, ProjectReport};
use colored::{ColoredString, Colorize};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// @ai:intent Output format options
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
}

/// @ai:intent Serializable snapshot of a document for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct DocumentView<'a> {
    pub path: PathBuf,
    pub encoding: &'static str,
    pub line_terminator: &'static str,
    pub lines: Vec<LineView<'a>>,
    pub comments: Option<&'a str>,
    pub severities: BTreeSet<Severity>,
}

/// @ai:intent One buffer line with its marking
#[derive(Debug, Clone, Serialize)]
pub struct LineView<'a> {
    pub number: usize,
    pub file_line: Option<usize>,
    pub severity: Option<Severity>,
    pub text: &'a str,
}

impl<'a> DocumentView<'a> {
    pub fn new(doc: &'a AnnotatedDocument) -> Self {
        let lines = doc
            .lines()
            .into_iter()
            .enumerate()
            .map(|(index, text)| LineView {
                number: index + 1,
                file_line: doc
                    .translate_line(crate::mapping::Direction::BufferToFile, index)
                    .map(|l| l + 1),
                severity: doc.severity(index),
                text,
            })
            .collect();

        Self {
            path: doc.path().to_path_buf(),
            encoding: doc.encoding().name(),
            line_terminator: doc.line_terminator().name(),
            lines,
            comments: doc.comments(),
            severities: doc.distinct_severities(),
        }
    }
}

/// @ai:intent Colour a severity label for terminal output
/// @ai:effects pure
fn paint(severity: Severity, label: &str) -> ColoredString {
    match severity {
        Severity::Green => label.green().bold(),
        Severity::Yellow => label.yellow().bold(),
        Severity::Red => label.red().bold(),
    }
}

fn severity_badges(severities: &BTreeSet<Severity>) -> String {
    severities
        .iter()
        .map(|s| paint(*s, "\u{25cf}").to_string())
        .collect::<Vec<_>>()
        .join("")
}

/// @ai:intent Format a document as a string
/// @ai:effects pure
pub fn format_document(doc: &AnnotatedDocument, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(&DocumentView::new(doc), false),
        OutputFormat::JsonPretty => to_json(&DocumentView::new(doc), true),
        OutputFormat::Text => format_document_text(doc),
    }
}

/// @ai:intent Render the clean buffer with a severity gutter
/// @ai:effects pure
fn format_document_text(doc: &AnnotatedDocument) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} ({}, {}) {}\n",
        doc.path().display().to_string().bold(),
        doc.encoding().name(),
        doc.line_terminator().name(),
        severity_badges(&doc.distinct_severities())
    ));

    let lines = doc.lines();
    let width = lines.len().to_string().len();

    for (index, text) in lines.iter().enumerate() {
        let gutter = match doc.severity(index) {
            Some(severity) => paint(severity, &format!("{:<6}", severity.name())).to_string(),
            None => " ".repeat(6),
        };
        output.push_str(&format!(
            "{} {} {}\n",
            format!("{:>width$}", index + 1).dimmed(),
            gutter,
            text
        ));
    }

    if let Some(comments) = doc.comments() {
        output.push_str(&format!("\n{}\n", "Comments:".cyan()));
        for line in comments.lines() {
            output.push_str(&format!("  {}\n", line));
        }
    }

    output
}

/// @ai:intent Format a project report as a string
/// @ai:effects pure
pub fn format_project(report: &ProjectReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(report, false),
        OutputFormat::JsonPretty => to_json(report, true),
        OutputFormat::Text => format_project_text(report),
    }
}

fn format_project_text(report: &ProjectReport) -> String {
    let mut output = String::new();
    push_node(&mut output, &report.root, 0);

    for path in &report.skipped {
        output.push_str(&format!("{} {}\n", "skipped".dimmed(), path.display()));
    }

    for failure in &report.failures {
        output.push_str(&format!(
            "{} {} - {}\n",
            "ERROR".red().bold(),
            failure.path.display(),
            failure.message
        ));
    }

    output.push('\n');
    output.push_str(&format!(
        "Loaded {} files, {} skipped, {} failed\n",
        report.files_loaded,
        report.skipped.len(),
        report.failures.len()
    ));

    output
}

fn push_node(output: &mut String, node: &ProjectNode, depth: usize) {
    let indent = "  ".repeat(depth);

    match &node.kind {
        NodeKind::Folder { children } => {
            output.push_str(&format!(
                "{}{}/ {}\n",
                indent,
                node.name.bold(),
                severity_badges(&node.severities)
            ));
            for child in children {
                push_node(output, child, depth + 1);
            }
        }
        NodeKind::File { summary } => {
            output.push_str(&format!(
                "{}{} {} {}\n",
                indent,
                node.name,
                severity_badges(&node.severities),
                format!(
                    "({} green, {} yellow, {} red{})",
                    summary.green,
                    summary.yellow,
                    summary.red,
                    if summary.has_comments { ", comments" } else { "" }
                )
                .dimmed()
            ));
        }
    }
}

/// @ai:intent Format any serializable value as JSON
/// @ai:effects pure
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> String {
    if pretty {
        serde_json::to_string_pretty(value).unwrap_or_default()
    } else {
        serde_json::to_string(value).unwrap_or_default()
    }
}
