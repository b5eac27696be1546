//! @ai:module:intent Map line numbers and offsets between file and buffer coordinates
//! @ai:module:layer domain
//! @ai:module:public_api Direction, OffsetEntry, OffsetTables, TableBuilder, BUFFER_NEWLINE
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};

/// Terminator joining lines of the clean buffer text.
pub const BUFFER_NEWLINE: &str = "\n";

/// @ai:intent Direction of a coordinate translation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    FileToBuffer,
    BufferToFile,
}

/// @ai:intent Counterpart coordinates of a single line
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OffsetEntry {
    /// Line index in the other coordinate space.
    pub line: usize,
    /// Character offset in the other coordinate space.
    pub offset: usize,
}

impl OffsetEntry {
    pub fn new(line: usize, offset: usize) -> Self {
        Self { line, offset }
    }
}

/// @ai:intent Both line tables of an annotated document
/// @ai:invariant file_lines has one entry per file line, buffer_lines one per buffer line
/// @ai:invariant offsets in each table are non-decreasing
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OffsetTables {
    /// Indexed by file line, records buffer coordinates.
    pub file_lines: Vec<OffsetEntry>,
    /// Indexed by buffer line, records file coordinates.
    pub buffer_lines: Vec<OffsetEntry>,
}

impl OffsetTables {
    /// @ai:intent Translate a line index into the other coordinate space
    /// @ai:post None when the line is outside the source table
    /// @ai:effects pure
    pub fn translate_line(&self, direction: Direction, line: usize) -> Option<usize> {
        let table = match direction {
            Direction::FileToBuffer => &self.file_lines,
            Direction::BufferToFile => &self.buffer_lines,
        };
        table.get(line).map(|entry| entry.line)
    }

    /// @ai:intent Translate a character offset into the other coordinate space
    /// @ai:post identity before the first tracked line
    /// @ai:example BufferToFile(0) on ">>>>>CM:GREEN\nfoo" -> 14
    /// @ai:effects pure
    /// @ai:complexity O(log n)
    pub fn translate_position(&self, direction: Direction, position: usize) -> usize {
        // The source table records offsets in the space we translate *from*
        let (source, target) = match direction {
            Direction::BufferToFile => (&self.file_lines, &self.buffer_lines),
            Direction::FileToBuffer => (&self.buffer_lines, &self.file_lines),
        };

        let found = source.partition_point(|entry| entry.offset <= position);
        if found == 0 {
            return position;
        }

        let entry = source[found - 1];
        match target.get(entry.line) {
            Some(counterpart) => counterpart.offset + (position - entry.offset),
            None => position,
        }
    }
}

/// @ai:intent Accumulate offset tables while lines are read or written in file order
#[derive(Debug, Default)]
pub struct TableBuilder {
    tables: OffsetTables,
    buffer_offset: usize,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// @ai:intent Record a severity marker line annotating the next buffer line
    pub fn marker(&mut self) {
        let next_line = self.tables.buffer_lines.len();
        self.tables
            .file_lines
            .push(OffsetEntry::new(next_line, self.buffer_offset));
    }

    /// @ai:intent Record a content line that lands in the buffer
    /// @ai:pre file_offset and len are counted in characters of the decoded file text
    pub fn content(&mut self, file_offset: usize, len: usize) {
        let file_line = self.tables.file_lines.len();
        let buffer_line = self.tables.buffer_lines.len();

        self.tables
            .buffer_lines
            .push(OffsetEntry::new(file_line, file_offset));
        self.tables
            .file_lines
            .push(OffsetEntry::new(buffer_line, self.buffer_offset));

        self.buffer_offset += len + BUFFER_NEWLINE.chars().count();
    }

    /// @ai:intent Record the comments marker or a comment line
    pub fn trailer(&mut self) {
        let last_line = self.tables.buffer_lines.len().saturating_sub(1);
        self.tables
            .file_lines
            .push(OffsetEntry::new(last_line, self.buffer_offset));
    }

    pub fn finish(self) -> OffsetTables {
        self.tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tables for:
    /// ```text
    /// >>>>>CM:GREEN     file line 0, offset 0
    /// foo               file line 1, offset 14 -> buffer line 0, offset 0
    /// barbaz            file line 2, offset 18 -> buffer line 1, offset 4
    /// >>>>>CM:COMMENTS  file line 3, offset 25
    /// note              file line 4, offset 42
    /// ```
    fn sample() -> OffsetTables {
        let mut builder = TableBuilder::new();
        builder.marker();
        builder.content(14, 3);
        builder.content(18, 6);
        builder.trailer();
        builder.trailer();
        builder.finish()
    }

    #[test]
    fn test_builder_tables() {
        let tables = sample();
        assert_eq!(
            tables.file_lines,
            vec![
                OffsetEntry::new(0, 0),
                OffsetEntry::new(0, 0),
                OffsetEntry::new(1, 4),
                OffsetEntry::new(1, 11),
                OffsetEntry::new(1, 11),
            ]
        );
        assert_eq!(
            tables.buffer_lines,
            vec![OffsetEntry::new(1, 14), OffsetEntry::new(2, 18)]
        );
    }

    #[test]
    fn test_translate_line() {
        let tables = sample();
        assert_eq!(tables.translate_line(Direction::BufferToFile, 0), Some(1));
        assert_eq!(tables.translate_line(Direction::BufferToFile, 1), Some(2));
        assert_eq!(tables.translate_line(Direction::FileToBuffer, 0), Some(0));
        assert_eq!(tables.translate_line(Direction::FileToBuffer, 4), Some(1));
        assert_eq!(tables.translate_line(Direction::FileToBuffer, 5), None);
    }

    #[test]
    fn test_translate_position() {
        let tables = sample();
        assert_eq!(tables.translate_position(Direction::BufferToFile, 0), 14);
        assert_eq!(tables.translate_position(Direction::BufferToFile, 2), 16);
        assert_eq!(tables.translate_position(Direction::BufferToFile, 5), 19);
        assert_eq!(tables.translate_position(Direction::FileToBuffer, 14), 0);
        assert_eq!(tables.translate_position(Direction::FileToBuffer, 20), 6);
    }

    #[test]
    fn test_identity_before_first_line() {
        let tables = sample();
        // The marker line precedes the first buffer line's file offset
        assert_eq!(tables.translate_position(Direction::FileToBuffer, 3), 3);
        assert_eq!(
            OffsetTables::default().translate_position(Direction::BufferToFile, 7),
            7
        );
    }

    #[test]
    fn test_position_round_trip() {
        let tables = sample();
        for position in 0..=10 {
            let file = tables.translate_position(Direction::BufferToFile, position);
            assert_eq!(
                tables.translate_position(Direction::FileToBuffer, file),
                position,
                "buffer position {position}"
            );
        }
    }
}
