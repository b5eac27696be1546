//! @ai:module:intent Detect byte-order marks and convert between raw bytes and text
//! @ai:module:layer infrastructure
//! @ai:module:public_api Encoding, detect_encoding
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};

/// @ai:intent Text encoding of an annotated file, including whether it carries a BOM
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    #[default]
    Utf8,
    Utf8Bom,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
}

impl Encoding {
    /// @ai:intent Byte-order mark written ahead of the content
    /// @ai:effects pure
    pub fn bom(&self) -> &'static [u8] {
        match self {
            Encoding::Utf8 => &[],
            Encoding::Utf8Bom => &[0xEF, 0xBB, 0xBF],
            Encoding::Utf16Le => &[0xFF, 0xFE],
            Encoding::Utf16Be => &[0xFE, 0xFF],
            Encoding::Utf32Le => &[0xFF, 0xFE, 0x00, 0x00],
            Encoding::Utf32Be => &[0x00, 0x00, 0xFE, 0xFF],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Utf8Bom => "utf-8-bom",
            Encoding::Utf16Le => "utf-16le",
            Encoding::Utf16Be => "utf-16be",
            Encoding::Utf32Le => "utf-32le",
            Encoding::Utf32Be => "utf-32be",
        }
    }

    /// @ai:intent Decode content bytes (BOM already stripped) into a string
    /// @ai:post invalid sequences are replaced with U+FFFD; the flag reports whether that happened
    /// @ai:effects pure
    pub fn decode(&self, bytes: &[u8]) -> (String, bool) {
        match self {
            Encoding::Utf8 | Encoding::Utf8Bom => {
                let text = String::from_utf8_lossy(bytes);
                let lossy = matches!(text, std::borrow::Cow::Owned(_));
                (text.into_owned(), lossy)
            }
            Encoding::Utf16Le => decode_utf16(bytes, u16::from_le_bytes),
            Encoding::Utf16Be => decode_utf16(bytes, u16::from_be_bytes),
            Encoding::Utf32Le => decode_utf32(bytes, u32::from_le_bytes),
            Encoding::Utf32Be => decode_utf32(bytes, u32::from_be_bytes),
        }
    }

    /// @ai:intent Encode text into bytes, prefixed with this encoding's BOM
    /// @ai:effects pure
    pub fn encode(&self, text: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.bom().len() + text.len());
        out.extend_from_slice(self.bom());

        match self {
            Encoding::Utf8 | Encoding::Utf8Bom => out.extend_from_slice(text.as_bytes()),
            Encoding::Utf16Le => text.encode_utf16().for_each(|u| out.extend(u.to_le_bytes())),
            Encoding::Utf16Be => text.encode_utf16().for_each(|u| out.extend(u.to_be_bytes())),
            Encoding::Utf32Le => text.chars().for_each(|c| out.extend((c as u32).to_le_bytes())),
            Encoding::Utf32Be => text.chars().for_each(|c| out.extend((c as u32).to_be_bytes())),
        }

        out
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> (String, bool) {
    let chunks = bytes.chunks_exact(2);
    let mut lossy = !chunks.remainder().is_empty();
    let units = chunks.map(|c| unit([c[0], c[1]]));

    let mut text: String = char::decode_utf16(units)
        .map(|r| {
            r.unwrap_or_else(|_| {
                lossy = true;
                char::REPLACEMENT_CHARACTER
            })
        })
        .collect();

    if bytes.len() % 2 != 0 {
        text.push(char::REPLACEMENT_CHARACTER);
    }

    (text, lossy)
}

fn decode_utf32(bytes: &[u8], unit: fn([u8; 4]) -> u32) -> (String, bool) {
    let chunks = bytes.chunks_exact(4);
    let mut lossy = !chunks.remainder().is_empty();

    let mut text: String = chunks
        .map(|c| {
            char::from_u32(unit([c[0], c[1], c[2], c[3]])).unwrap_or_else(|| {
                lossy = true;
                char::REPLACEMENT_CHARACTER
            })
        })
        .collect();

    if bytes.len() % 4 != 0 {
        text.push(char::REPLACEMENT_CHARACTER);
    }

    (text, lossy)
}

/// @ai:intent Sniff the byte-order mark at the start of a file
/// @ai:post returns the encoding and the number of BOM bytes to skip
/// @ai:example ([0xEF, 0xBB, 0xBF, 0x41]) -> (Utf8Bom, 3)
/// @ai:example ([0x41, 0x42]) -> (Utf8, 0)
/// @ai:effects pure
pub fn detect_encoding(bytes: &[u8]) -> (Encoding, usize) {
    match bytes {
        [0xFE, 0xFF, ..] => (Encoding::Utf16Be, 2),
        [0xFF, 0xFE, 0x00, 0x00, ..] => (Encoding::Utf32Le, 4),
        [0xFF, 0xFE, ..] => (Encoding::Utf16Le, 2),
        [0xEF, 0xBB, 0xBF, ..] => (Encoding::Utf8Bom, 3),
        [0x00, 0x00, 0xFE, 0xFF, ..] => (Encoding::Utf32Be, 4),
        _ => (Encoding::Utf8, 0),
    }
}
