//! @ai:module:intent Classify raw file content as binary or text
//! @ai:module:layer infrastructure
//! @ai:module:public_api is_binary, SAMPLE_SIZE
//! @ai:module:stateless true

/// Number of leading bytes inspected.
pub const SAMPLE_SIZE: usize = 1024;

/// @ai:intent Check whether a byte can appear in a text file
/// @ai:effects pure
fn is_text_byte(b: u8) -> bool {
    // NUL is allowed so UTF-16 content passes
    matches!(b, 0 | 7 | 8 | 9 | 10 | 12 | 13 | 27 | 0x20..=0xFF)
}

/// @ai:intent Heuristically decide whether content is binary
/// @ai:pre bytes start after any byte-order mark
/// @ai:post empty input is never binary
/// @ai:example ([0x00, 0x01, 0x02]) -> true
/// @ai:example ([0x00, 0x09, 0x0A]) -> false
/// @ai:effects pure
pub fn is_binary(bytes: &[u8]) -> bool {
    let sample = &bytes[..bytes.len().min(SAMPLE_SIZE)];
    sample.iter().any(|&b| !is_text_byte(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_bytes_are_binary() {
        assert!(is_binary(&[0x00, 0x01, 0x02]));
        assert!(is_binary(b"text\x1f"));
    }

    #[test]
    fn test_whitelisted_bytes_are_text() {
        assert!(!is_binary(&[0x00, 0x09, 0x0A]));
        assert!(!is_binary(&[7, 8, 12, 13, 27, 0x20, 0x7F, 0xFF]));
    }

    #[test]
    fn test_empty_is_text() {
        assert!(!is_binary(&[]));
    }

    #[test]
    fn test_only_sample_is_inspected() {
        let mut bytes = vec![b'a'; SAMPLE_SIZE];
        bytes.push(0x01);
        assert!(!is_binary(&bytes));

        bytes[SAMPLE_SIZE - 1] = 0x01;
        assert!(is_binary(&bytes));
    }
}
