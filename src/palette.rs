//! The fixed 8-entry BasePaint palette
//!
//! Color indices in pixel streams address this table. Index 0 doubles as
//! the canvas background and as the fallback for indices the table cannot
//! resolve.

use image::Rgba;
use thiserror::Error;

/// Number of entries in a palette.
pub const PALETTE_SIZE: usize = 8;

/// Color index of the canvas background.
pub const BACKGROUND: u8 = 0;

/// BasePaint palette, index 0 through 7.
pub const BASEPAINT_HEX: [&str; PALETTE_SIZE] =
    ["#49e7ec", "#3368dc", "#2b0f54", "#ab1f65", "#ff4f69", "#ff8142", "#ffda45", "#fff7f8"];

/// Error type for palette color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Input string doesn't start with '#'
    #[error("color must start with '#'")]
    MissingHash,
    /// Invalid length (must be 3 or 6 hex chars after #)
    #[error("invalid color length {0}, expected 3 or 6")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    /// Wrong number of palette entries
    #[error("palette must have exactly 8 colors, got {0}")]
    WrongSize(usize),
}

/// Parse a `#RGB` or `#RRGGBB` hex color into an opaque RGBA color.
///
/// # Examples
///
/// ```
/// use fridge::palette::parse_hex_color;
///
/// assert_eq!(parse_hex_color("#49e7ec").unwrap(), image::Rgba([0x49, 0xe7, 0xec, 255]));
/// assert_eq!(parse_hex_color("#F00").unwrap(), image::Rgba([255, 0, 0, 255]));
/// ```
pub fn parse_hex_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    if s.is_empty() {
        return Err(ColorError::Empty);
    }
    let hex = s.strip_prefix('#').ok_or(ColorError::MissingHash)?;

    let mut digits = Vec::with_capacity(hex.len());
    for c in hex.chars() {
        digits.push(c.to_digit(16).ok_or(ColorError::InvalidHex(c))? as u8);
    }

    match digits.len() {
        // #RGB -> #RRGGBB (doubled digits)
        3 => Ok(Rgba([digits[0] * 17, digits[1] * 17, digits[2] * 17, 255])),
        6 => Ok(Rgba([
            digits[0] * 16 + digits[1],
            digits[2] * 16 + digits[3],
            digits[4] * 16 + digits[5],
            255,
        ])),
        len => Err(ColorError::InvalidLength(len)),
    }
}

/// An 8-entry lookup table from color index to RGBA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    colors: [Rgba<u8>; PALETTE_SIZE],
}

impl Default for Palette {
    fn default() -> Self {
        Self::basepaint()
    }
}

impl Palette {
    /// The BasePaint palette.
    pub fn basepaint() -> Self {
        let mut colors = [Rgba([0, 0, 0, 255]); PALETTE_SIZE];
        for (slot, hex) in colors.iter_mut().zip(BASEPAINT_HEX) {
            // Constant table, parse cannot fail
            if let Ok(color) = parse_hex_color(hex) {
                *slot = color;
            }
        }
        Self { colors }
    }

    /// Build a palette from exactly eight hex color strings.
    pub fn from_hex<S: AsRef<str>>(entries: &[S]) -> Result<Self, ColorError> {
        if entries.len() != PALETTE_SIZE {
            return Err(ColorError::WrongSize(entries.len()));
        }
        let mut colors = [Rgba([0, 0, 0, 255]); PALETTE_SIZE];
        for (slot, entry) in colors.iter_mut().zip(entries) {
            *slot = parse_hex_color(entry.as_ref())?;
        }
        Ok(Self { colors })
    }

    /// Look up an index, returning `None` if it has no entry.
    pub fn resolve(&self, index: u8) -> Option<Rgba<u8>> {
        self.colors.get(index as usize).copied()
    }

    /// Look up an index, falling back to the background entry for unknown indices.
    pub fn color(&self, index: u8) -> Rgba<u8> {
        self.resolve(index).unwrap_or(self.colors[BACKGROUND as usize])
    }

    pub fn background(&self) -> Rgba<u8> {
        self.colors[BACKGROUND as usize]
    }

    pub fn is_known(index: u8) -> bool {
        (index as usize) < PALETTE_SIZE
    }
}
