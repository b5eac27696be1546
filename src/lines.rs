//! @ai:module:intent Split decoded text into logical lines with source offsets
//! @ai:module:layer application
//! @ai:module:public_api LogicalLine, split_lines
//! @ai:module:stateless true

/// @ai:intent One line of decoded text, without its terminator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine<'a> {
    pub text: &'a str,
    /// Character offset of the first character from the start of the text.
    pub start: usize,
}

/// @ai:intent Split text on CR, LF or CRLF, resolved per occurrence
/// @ai:post a trailing unterminated fragment is emitted as the last line
/// @ai:post empty text yields no lines
/// @ai:example ("a\r\nb\rc\n") -> [("a", 0), ("b", 3), ("c", 5)]
/// @ai:effects pure
pub fn split_lines(text: &str) -> Vec<LogicalLine<'_>> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut start_char = 0;
    let mut chars = 0;
    let mut i = 0;

    while i < bytes.len() {
        let terminator_len = match bytes[i] {
            b'\r' if bytes.get(i + 1) == Some(&b'\n') => 2,
            b'\r' | b'\n' => 1,
            b => {
                // UTF-8 continuation bytes do not start a character
                if b & 0xC0 != 0x80 {
                    chars += 1;
                }
                i += 1;
                continue;
            }
        };

        lines.push(LogicalLine {
            text: &text[start..i],
            start: start_char,
        });

        i += terminator_len;
        chars += terminator_len;
        start = i;
        start_char = chars;
    }

    if start < bytes.len() {
        lines.push(LogicalLine {
            text: &text[start..],
            start: start_char,
        });
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(text: &str) -> Vec<(&str, usize)> {
        split_lines(text).into_iter().map(|l| (l.text, l.start)).collect()
    }

    #[test]
    fn test_mixed_terminators() {
        assert_eq!(pairs("a\r\nb\rc\n"), vec![("a", 0), ("b", 3), ("c", 5)]);
    }

    #[test]
    fn test_trailing_fragment() {
        assert_eq!(pairs("a\nb"), vec![("a", 0), ("b", 2)]);
    }

    #[test]
    fn test_empty_lines_preserved() {
        assert_eq!(pairs("\n\r\n\r"), vec![("", 0), ("", 1), ("", 3)]);
    }

    #[test]
    fn test_lf_cr_is_two_terminators() {
        assert_eq!(pairs("a\n\rb"), vec![("a", 0), ("", 2), ("b", 3)]);
    }

    #[test]
    fn test_empty_text() {
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_multibyte_offsets() {
        assert_eq!(pairs("\u{e9}t\u{e9}\nx"), vec![("\u{e9}t\u{e9}", 0), ("x", 4)]);
        assert_eq!(pairs("\u{1f600}\r\n\u{e9}\rz"), vec![("\u{1f600}", 0), ("\u{e9}", 3), ("z", 5)]);
    }
}
