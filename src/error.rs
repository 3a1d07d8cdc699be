//! Warnings and recoverable input problems
//!
//! Nothing that arrives over the network or out of storage is allowed to
//! abort a decode. Parsers degrade to a partial result and describe what
//! they dropped with a [`Warning`].

use std::fmt;

/// Category of a recovered input problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningKind {
    /// Pixel stream length is not a multiple of 6; the trailing partial record was dropped.
    MalformedStream,
    /// A 6-character window contained non-hex characters and was skipped.
    InvalidHex,
    /// A color index has no palette entry; the default entry is used.
    UnknownColorIndex,
    /// Share text was not valid base64url or ended in a partial record.
    MalformedShareText,
    /// A placement referenced a magnet beyond the end of the magnet list.
    MagnetIndexOutOfRange,
    /// A magnet has no pixels and cannot be placed.
    EmptyBoundingBox,
    /// A placement position is NaN or infinite.
    InvalidPlacement,
}

impl WarningKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningKind::MalformedStream => "malformed_stream",
            WarningKind::InvalidHex => "invalid_hex",
            WarningKind::UnknownColorIndex => "unknown_color_index",
            WarningKind::MalformedShareText => "malformed_share_text",
            WarningKind::MagnetIndexOutOfRange => "magnet_index_out_of_range",
            WarningKind::EmptyBoundingBox => "empty_bounding_box",
            WarningKind::InvalidPlacement => "invalid_placement",
        }
    }
}

/// A recovered problem found while decoding or compositing.
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }

    /// Emit this warning through the `log` facade.
    pub(crate) fn log(&self) {
        log::warn!("{}: {}", self.kind.as_str(), self.message);
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display() {
        let w = Warning::new(WarningKind::MalformedStream, "2 trailing characters dropped");
        assert_eq!(w.to_string(), "malformed_stream: 2 trailing characters dropped");
    }
}
