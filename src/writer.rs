//! @ai:module:intent Serialize a clean buffer and its markings back into annotated file text
//! @ai:module:layer application
//! @ai:module:public_api serialize, write_atomic, Serialized
//! @ai:module:depends_on annotation, mapping, encoding, error
//! @ai:module:stateless true

use crate::annotation::{Severity, COMMENTS_TAG, MARKER_PREFIX};
use crate::encoding::Encoding;
use crate::error::{Error, Result};
use crate::mapping::{OffsetTables, TableBuilder, BUFFER_NEWLINE};
use crate::terminator::LineTerminator;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// @ai:intent Annotated file text together with the tables describing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Serialized {
    pub text: String,
    pub tables: OffsetTables,
}

/// @ai:intent Split buffer text into the lines aligned with its severities
/// @ai:post an empty buffer with no severities has zero lines
/// @ai:effects pure
pub fn buffer_lines<'a>(text: &'a str, severities: &[Option<Severity>]) -> Vec<&'a str> {
    if text.is_empty() && severities.is_empty() {
        return Vec::new();
    }
    text.split(BUFFER_NEWLINE).collect()
}

/// @ai:intent Produce annotated file text from buffer text, severities and comments
/// @ai:pre the buffer has exactly one line per severity entry
/// @ai:post parsing the result yields the same text, severities and comments
/// @ai:post tables equal the tables a parse of the result would build
/// @ai:effects pure
pub fn serialize(
    text: &str,
    severities: &[Option<Severity>],
    comments: Option<&str>,
    terminator: LineTerminator,
) -> Result<Serialized> {
    let lines = buffer_lines(text, severities);
    if lines.len() != severities.len() {
        return Err(Error::LineCountMismatch {
            lines: lines.len(),
            severities: severities.len(),
        });
    }

    let eol = terminator.as_str();
    let mut out = Output {
        text: String::with_capacity(text.len() + lines.len() * eol.len()),
        chars: 0,
    };
    let mut tables = TableBuilder::new();

    for (line, &severity) in lines.iter().zip(severities) {
        if let Some(severity) = severity.filter(Severity::is_written) {
            out.push_marker(severity.name(), eol);
            tables.marker();
        }

        let len = line.chars().count();
        tables.content(out.chars, len);
        out.push_line(line, len, eol);
    }

    if let Some(comments) = comments.filter(|c| !c.is_empty()) {
        out.push_marker(COMMENTS_TAG, eol);
        tables.trailer();

        for line in comments.split(BUFFER_NEWLINE) {
            out.push_line(line, line.chars().count(), eol);
            tables.trailer();
        }
    }

    Ok(Serialized {
        text: out.text,
        tables: tables.finish(),
    })
}

/// File text under construction, with its length in characters.
struct Output {
    text: String,
    chars: usize,
}

impl Output {
    fn push_line(&mut self, line: &str, len: usize, eol: &str) {
        self.text.push_str(line);
        self.text.push_str(eol);
        self.chars += len + eol.len();
    }

    fn push_marker(&mut self, tag: &str, eol: &str) {
        self.text.push_str(MARKER_PREFIX);
        self.text.push_str(tag);
        self.text.push_str(eol);
        self.chars += MARKER_PREFIX.len() + tag.len() + eol.len();
    }
}

/// @ai:intent Replace a file's contents all-or-nothing
/// @ai:post on error the previous file content is untouched
/// @ai:effects fs:write
pub fn write_atomic(path: &Path, text: &str, encoding: Encoding) -> Result<()> {
    let write_err = |source| Error::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(write_err)?;
    temp.write_all(&encoding.encode(text)).map_err(write_err)?;
    temp.as_file().sync_all().map_err(write_err)?;

    // The temp file is created 0600; keep the mode of the file being replaced
    if let Ok(meta) = std::fs::metadata(path) {
        temp.as_file()
            .set_permissions(meta.permissions())
            .map_err(write_err)?;
    }
    temp.persist(path).map_err(|e| write_err(e.error))?;

    tracing::debug!("Wrote {} ({})", path.display(), encoding.name());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::Direction;
    use crate::parser::parse_text;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_serialize_markers_and_comments() {
        let out = serialize(
            "foo()\n\nbar()",
            &[Some(Severity::Yellow), None, Some(Severity::Red)],
            Some("review me"),
            LineTerminator::CrLf,
        )
        .unwrap();

        assert_eq!(
            out.text,
            ">>>>>CM:YELLOW\r\nfoo()\r\n\r\nbar()\r\n>>>>>CM:COMMENTS\r\nreview me\r\n"
        );
    }

    #[test]
    fn test_red_is_never_written() {
        let out = serialize("a\nb", &[Some(Severity::Red), Some(Severity::Green)], None, LineTerminator::Lf)
            .unwrap();
        assert_eq!(out.text, "a\n>>>>>CM:GREEN\nb\n");
    }

    #[test]
    fn test_empty_comments_are_skipped() {
        let out = serialize("a", &[Some(Severity::Red)], Some(""), LineTerminator::Cr).unwrap();
        assert_eq!(out.text, "a\r");
    }

    #[test]
    fn test_tables_match_reparse() {
        let severities = [Some(Severity::Green), None, Some(Severity::Red), Some(Severity::Yellow)];
        let out = serialize(
            "first\n\n\u{e9}t\u{e9}\nlast",
            &severities,
            Some("one\ntwo"),
            LineTerminator::CrLf,
        )
        .unwrap();

        let reparsed = parse_text(Path::new("t"), &out.text).unwrap();
        assert_eq!(reparsed.tables, out.tables);
        assert_eq!(reparsed.severities, severities.to_vec());
        assert_eq!(reparsed.text, "first\n\n\u{e9}t\u{e9}\nlast");
        assert_eq!(reparsed.comments, Some("one\ntwo".to_string()));
    }

    #[test]
    fn test_tables_count_characters() {
        let out = serialize(
            "\u{e9}\u{e9}\nx",
            &[Some(Severity::Red), Some(Severity::Green)],
            None,
            LineTerminator::Lf,
        )
        .unwrap();

        assert_eq!(out.text, "\u{e9}\u{e9}\n>>>>>CM:GREEN\nx\n");
        assert_eq!(out.tables.translate_position(Direction::BufferToFile, 3), 17);
        assert_eq!(out.tables.translate_position(Direction::FileToBuffer, 17), 3);
        assert_eq!(out.tables.translate_position(Direction::BufferToFile, 1), 1);
    }

    #[test]
    fn test_single_blank_line_survives() {
        let out = serialize("", &[None], None, LineTerminator::Lf).unwrap();
        assert_eq!(out.text, "\n");

        let empty = serialize("", &[], None, LineTerminator::Lf).unwrap();
        assert_eq!(empty.text, "");
    }

    #[test]
    fn test_line_count_mismatch() {
        let err = serialize("a\nb", &[Some(Severity::Red)], None, LineTerminator::Lf).unwrap_err();
        assert!(matches!(err, Error::LineCountMismatch { lines: 2, severities: 1 }));
    }

    #[test]
    fn test_write_atomic_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.rs");
        std::fs::write(&path, "old").unwrap();

        write_atomic(&path, "new\n", Encoding::Utf8Bom).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"\xEF\xBB\xBFnew\n".to_vec());
    }

    #[test]
    fn test_write_atomic_failure_keeps_original() {
        let dir = tempfile::tempdir().unwrap();
        // Renaming over a non-empty directory fails after the temp file was written
        let target = dir.path().join("sub");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("x"), "keep").unwrap();

        assert!(write_atomic(&target, "new", Encoding::Utf8).is_err());
        assert_eq!(std::fs::read_to_string(target.join("x")).unwrap(), "keep");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
