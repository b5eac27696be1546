//! @ai:module:intent Define the severity markings and the on-disk marker syntax
//! @ai:module:layer domain
//! @ai:module:public_api Severity, MARKER_PREFIX, COMMENTS_TAG
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix of every synthetic marker line.
pub const MARKER_PREFIX: &str = ">>>>>CM:";

/// Marker suffix that opens the trailing comment block.
pub const COMMENTS_TAG: &str = "COMMENTS";

/// @ai:intent Triage label on a single source line, ordered by priority
/// @ai:invariant Red doubles as "no marker present" and is never written to disk
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Severity {
    Green = 1,
    Yellow = 2,
    Red = 3,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Green, Severity::Yellow, Severity::Red];

    /// @ai:intent Name used in marker lines and text output
    /// @ai:effects pure
    pub fn name(&self) -> &'static str {
        match self {
            Severity::Green => "GREEN",
            Severity::Yellow => "YELLOW",
            Severity::Red => "RED",
        }
    }

    /// @ai:intent Resolve a marker suffix to a severity
    /// @ai:example ("GREEN") -> Some(Green)
    /// @ai:example ("RED") -> None
    /// @ai:effects pure
    pub fn from_marker(tag: &str) -> Option<Severity> {
        match tag {
            "GREEN" => Some(Severity::Green),
            "YELLOW" => Some(Severity::Yellow),
            _ => None,
        }
    }

    /// @ai:intent Background highlight colour for editors painting marked lines
    /// @ai:effects pure
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Severity::Green => (200, 255, 200),
            Severity::Yellow => (255, 233, 127),
            Severity::Red => (255, 200, 200),
        }
    }

    /// @ai:intent Whether this severity produces a marker line on save
    pub fn is_written(&self) -> bool {
        *self != Severity::Red
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_marker_known_tags() {
        assert_eq!(Severity::from_marker("GREEN"), Some(Severity::Green));
        assert_eq!(Severity::from_marker("YELLOW"), Some(Severity::Yellow));
    }

    #[test]
    fn test_red_is_not_a_marker() {
        assert_eq!(Severity::from_marker("RED"), None);
        assert_eq!(Severity::from_marker("green"), None);
        assert!(!Severity::Red.is_written());
    }

    #[test]
    fn test_priority_order() {
        assert!(Severity::Green < Severity::Yellow);
        assert!(Severity::Yellow < Severity::Red);
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Yellow).unwrap(), "\"yellow\"");
    }
}
