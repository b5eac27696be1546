//! @ai:module:intent Detect the line-terminator style used by a file
//! @ai:module:layer infrastructure
//! @ai:module:public_api LineTerminator, detect_line_terminator
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};

/// @ai:intent Line terminator written between lines of an annotated file
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineTerminator {
    Cr,
    Lf,
    #[default]
    CrLf,
}

impl LineTerminator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineTerminator::Cr => "\r",
            LineTerminator::Lf => "\n",
            LineTerminator::CrLf => "\r\n",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LineTerminator::Cr => "CR",
            LineTerminator::Lf => "LF",
            LineTerminator::CrLf => "CRLF",
        }
    }
}

/// @ai:intent Find the first terminator in raw bytes, ignoring NUL padding
/// @ai:pre bytes start after any byte-order mark
/// @ai:post CrLf when no terminator is present
/// @ai:example (b"a\r\nb") -> CrLf
/// @ai:example (b"a\rb") -> Cr
/// @ai:example (b"a\nb") -> Lf
/// @ai:effects pure
pub fn detect_line_terminator(bytes: &[u8]) -> LineTerminator {
    // NUL bytes are the high halves of UTF-16/32 code units
    let mut significant = bytes.iter().copied().filter(|&b| b != 0);

    while let Some(b) = significant.next() {
        match b {
            b'\r' => {
                return match significant.next() {
                    Some(b'\n') => LineTerminator::CrLf,
                    _ => LineTerminator::Cr,
                };
            }
            b'\n' => return LineTerminator::Lf,
            _ => {}
        }
    }

    LineTerminator::CrLf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_crlf() {
        assert_eq!(detect_line_terminator(b"a\r\nb"), LineTerminator::CrLf);
    }

    #[test]
    fn test_detect_cr() {
        assert_eq!(detect_line_terminator(b"a\rb"), LineTerminator::Cr);
        assert_eq!(detect_line_terminator(b"a\r"), LineTerminator::Cr);
    }

    #[test]
    fn test_detect_lf() {
        assert_eq!(detect_line_terminator(b"a\nb\r\n"), LineTerminator::Lf);
    }

    #[test]
    fn test_default_without_terminator() {
        assert_eq!(detect_line_terminator(b"abc"), LineTerminator::CrLf);
        assert_eq!(detect_line_terminator(b""), LineTerminator::CrLf);
    }

    #[test]
    fn test_utf16_content() {
        // "a\r\n" in UTF-16LE and UTF-16BE
        assert_eq!(
            detect_line_terminator(&[b'a', 0, b'\r', 0, b'\n', 0]),
            LineTerminator::CrLf
        );
        assert_eq!(
            detect_line_terminator(&[0, b'a', 0, b'\r', 0, b'\n']),
            LineTerminator::CrLf
        );
        assert_eq!(detect_line_terminator(&[0, b'a', 0, b'\r', 0, b'b']), LineTerminator::Cr);
    }
}
