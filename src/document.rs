//! @ai:module:intent Load, mutate and save an annotated document
//! @ai:module:layer application
//! @ai:module:public_api AnnotatedDocument
//! @ai:module:depends_on encoding, terminator, binary, parser, writer, mapping, error
//! @ai:module:stateless false

use crate::annotation::Severity;
use crate::binary::is_binary;
use crate::encoding::{detect_encoding, Encoding};
use crate::error::{Error, Result};
use crate::lines::split_lines;
use crate::mapping::{Direction, OffsetTables, BUFFER_NEWLINE};
use crate::parser::parse_text;
use crate::terminator::{detect_line_terminator, LineTerminator};
use crate::writer::{buffer_lines, serialize, write_atomic};
use std::collections::BTreeSet;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// @ai:intent A source file with its review markings, seen through a marker-free buffer
/// @ai:invariant severities.len() equals the number of buffer lines
/// @ai:invariant blank buffer lines never carry a severity
#[derive(Debug, Clone)]
pub struct AnnotatedDocument {
    path: PathBuf,
    encoding: Encoding,
    terminator: LineTerminator,
    text: String,
    severities: Vec<Option<Severity>>,
    comments: Option<String>,
    tables: OffsetTables,
    dirty: bool,
}

impl AnnotatedDocument {
    /// @ai:intent Load an annotated file from disk
    /// @ai:post Ok(None) when the file is binary
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let bytes = std::fs::read(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::from_bytes(path, &bytes)
    }

    /// @ai:intent Build a document from raw file bytes
    /// @ai:post Ok(None) when the content is binary
    /// @ai:effects pure
    pub fn from_bytes(path: &Path, bytes: &[u8]) -> Result<Option<Self>> {
        let (encoding, bom_len) = detect_encoding(bytes);
        let content = &bytes[bom_len..];

        if is_binary(content) {
            tracing::debug!("Skipping binary file {}", path.display());
            return Ok(None);
        }

        let terminator = detect_line_terminator(content);
        let (decoded, lossy) = encoding.decode(content);
        if lossy {
            tracing::warn!(
                "{} contains invalid {} sequences; they were replaced",
                path.display(),
                encoding.name()
            );
        }

        let parsed = parse_text(path, &decoded)?;

        tracing::debug!(
            "Loaded {} ({}, {}): {} buffer lines, {} file lines",
            path.display(),
            encoding.name(),
            terminator.name(),
            parsed.severities.len(),
            parsed.tables.file_lines.len()
        );

        Ok(Some(Self {
            path: path.to_path_buf(),
            encoding,
            terminator,
            text: parsed.text,
            severities: parsed.severities,
            comments: parsed.comments,
            tables: parsed.tables,
            dirty: false,
        }))
    }

    /// @ai:intent Persist the document atomically and refresh its offset tables
    /// @ai:post the tables describe the file just written; the dirty flag is cleared
    /// @ai:effects fs:write
    pub fn save(&mut self) -> Result<()> {
        let serialized = serialize(
            &self.text,
            &self.severities,
            self.comments.as_deref(),
            self.terminator,
        )?;

        write_atomic(&self.path, &serialized.text, self.encoding)?;

        self.tables = serialized.tables;
        self.dirty = false;
        Ok(())
    }

    /// @ai:intent Set the severity of a range of buffer lines
    /// @ai:post lines without a severity (blank lines) are left alone
    /// @ai:post returns the number of lines whose severity changed
    /// @ai:edge_cases the range is clamped to the document
    pub fn set_severity(&mut self, lines: Range<usize>, severity: Severity) -> usize {
        let end = lines.end.min(self.severities.len());
        let start = lines.start.min(end);
        let mut changed = 0;

        for slot in &mut self.severities[start..end] {
            if let Some(current) = slot {
                if *current != severity {
                    *current = severity;
                    changed += 1;
                }
            }
        }

        if changed > 0 {
            self.dirty = true;
        }
        changed
    }

    /// @ai:intent Replace the trailing comment block
    /// @ai:post comment lines are joined with the buffer newline, whatever terminators came in
    pub fn set_comments(&mut self, comments: Option<String>) {
        let comments = comments.filter(|c| !c.is_empty()).map(|c| {
            split_lines(&c)
                .iter()
                .map(|line| line.text)
                .collect::<Vec<_>>()
                .join(BUFFER_NEWLINE)
        });
        if comments != self.comments {
            self.comments = comments;
            self.dirty = true;
        }
    }

    /// @ai:intent Distinct severities present, for overview icons
    /// @ai:post never empty; {Green} when no line carries a severity
    /// @ai:effects pure
    pub fn distinct_severities(&self) -> BTreeSet<Severity> {
        let found: BTreeSet<Severity> = self.severities.iter().flatten().copied().collect();
        if found.is_empty() {
            BTreeSet::from([Severity::Green])
        } else {
            found
        }
    }

    /// @ai:intent Count lines per severity
    /// @ai:effects pure
    pub fn severity_counts(&self) -> [(Severity, usize); 3] {
        Severity::ALL.map(|severity| {
            let count = self
                .severities
                .iter()
                .filter(|s| **s == Some(severity))
                .count();
            (severity, count)
        })
    }

    pub fn translate_line(&self, direction: Direction, line: usize) -> Option<usize> {
        self.tables.translate_line(direction, line)
    }

    pub fn translate_position(&self, direction: Direction, position: usize) -> usize {
        self.tables.translate_position(direction, position)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn line_terminator(&self) -> LineTerminator {
        self.terminator
    }

    /// Clean buffer text, lines joined with `\n`.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn lines(&self) -> Vec<&str> {
        buffer_lines(&self.text, &self.severities)
    }

    pub fn severities(&self) -> &[Option<Severity>] {
        &self.severities
    }

    pub fn severity(&self, line: usize) -> Option<Severity> {
        self.severities.get(line).copied().flatten()
    }

    pub fn comments(&self) -> Option<&str> {
        self.comments.as_deref()
    }

    pub fn line_count(&self) -> usize {
        self.severities.len()
    }

    pub fn file_line_count(&self) -> usize {
        self.tables.file_lines.len()
    }

    pub fn tables(&self) -> &OffsetTables {
        &self.tables
    }

    /// Whether markings changed since the last load or save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}
