//! @ai:module:intent Parse annotated file text into a clean buffer, severities and comments
//! @ai:module:layer application
//! @ai:module:public_api parse_text, ParsedText
//! @ai:module:depends_on annotation, lines, mapping, error
//! @ai:module:stateless true

use crate::annotation::{Severity, COMMENTS_TAG, MARKER_PREFIX};
use crate::error::{Error, Result};
use crate::lines::split_lines;
use crate::mapping::{OffsetTables, TableBuilder, BUFFER_NEWLINE};
use std::path::Path;

/// @ai:intent Result of parsing annotated text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedText {
    pub text: String,
    pub severities: Vec<Option<Severity>>,
    pub comments: Option<String>,
    pub tables: OffsetTables,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    InComments,
}

/// @ai:intent Run the marker state machine over decoded file text
/// @ai:pre text has been decoded and stripped of its byte-order mark
/// @ai:post severities.len() equals the number of buffer lines
/// @ai:post blank buffer lines have no severity
/// @ai:edge_cases a marker followed by a blank line loses its severity
/// @ai:edge_cases a second marker before any content overwrites the first
/// @ai:effects pure
pub fn parse_text(path: &Path, text: &str) -> Result<ParsedText> {
    let mut state = State::Normal;
    let mut pending: Option<Severity> = None;
    let mut buffer_lines: Vec<&str> = Vec::new();
    let mut comment_lines: Vec<&str> = Vec::new();
    let mut severities = Vec::new();
    let mut tables = TableBuilder::new();

    for (index, line) in split_lines(text).into_iter().enumerate() {
        if state == State::InComments {
            comment_lines.push(line.text);
            tables.trailer();
            continue;
        }

        if let Some(tag) = line.text.strip_prefix(MARKER_PREFIX) {
            if tag == COMMENTS_TAG {
                state = State::InComments;
                tables.trailer();
            } else {
                let severity = Severity::from_marker(tag).ok_or_else(|| Error::CorruptAnnotation {
                    path: path.to_path_buf(),
                    line: index + 1,
                    marker: line.text.to_string(),
                })?;
                pending = Some(severity);
                tables.marker();
            }
            continue;
        }

        let severity = if line.text.trim().is_empty() {
            None
        } else {
            Some(pending.unwrap_or(Severity::Red))
        };
        pending = None;

        severities.push(severity);
        buffer_lines.push(line.text);
        tables.content(line.start, line.text.chars().count());
    }

    let comments = if comment_lines.is_empty() {
        None
    } else {
        Some(comment_lines.join(BUFFER_NEWLINE))
    };

    Ok(ParsedText {
        text: buffer_lines.join(BUFFER_NEWLINE),
        severities,
        comments,
        tables: tables.finish(),
    })
}
