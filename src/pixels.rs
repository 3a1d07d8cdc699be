//! Pixel stream codec
//!
//! A pixel stream is the wire and storage format for BasePaint pixel data:
//! 3-byte `(x, y, color)` records written as lowercase hex and concatenated
//! without delimiters, so every record is a 6-character window.
//!
//! Decoding is lenient. A trailing partial window is dropped and a window
//! containing non-hex characters is skipped; both are reported as warnings
//! rather than errors. Color indices are stored as-is, including ones the
//! palette cannot resolve.

use std::collections::BTreeMap;

use crate::error::{Warning, WarningKind};

/// Width and height of the BasePaint canvas in pixels.
pub const CANVAS_SIZE: u32 = 256;

/// Number of hex characters per record.
const RECORD_CHARS: usize = 6;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// A canvas coordinate.
///
/// Fields are declared `y` first so the derived ordering is row-major
/// (top-to-bottom, then left-to-right), which is the canonical encode order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub y: u8,
    pub x: u8,
}

impl Coord {
    pub fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }
}

/// A single decoded record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub x: u8,
    pub y: u8,
    pub color: u8,
}

impl Pixel {
    pub fn coord(&self) -> Coord {
        Coord::new(self.x, self.y)
    }
}

/// Sparse coordinate to color-index map for one 256x256 snapshot.
///
/// Coordinates without an entry are background (palette index 0).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseCanvas {
    pixels: BTreeMap<Coord, u8>,
}

impl SparseCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn get(&self, x: u8, y: u8) -> Option<u8> {
        self.pixels.get(&Coord::new(x, y)).copied()
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.pixels.contains_key(&coord)
    }

    /// Set the color at a coordinate, returning the previous color if any.
    pub fn set(&mut self, x: u8, y: u8, color: u8) -> Option<u8> {
        self.pixels.insert(Coord::new(x, y), color)
    }

    pub fn insert(&mut self, coord: Coord, color: u8) -> Option<u8> {
        self.pixels.insert(coord, color)
    }

    pub fn remove(&mut self, coord: Coord) -> Option<u8> {
        self.pixels.remove(&coord)
    }

    /// Iterate entries in canonical order: rows top-to-bottom, columns left-to-right.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, u8)> + '_ {
        self.pixels.iter().map(|(coord, color)| (*coord, *color))
    }

    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.pixels.keys().copied()
    }

    pub(crate) fn get_mut(&mut self, coord: Coord) -> Option<&mut u8> {
        self.pixels.get_mut(&coord)
    }
}

impl FromIterator<Pixel> for SparseCanvas {
    /// Later pixels for the same coordinate overwrite earlier ones.
    fn from_iter<I: IntoIterator<Item = Pixel>>(iter: I) -> Self {
        let mut canvas = SparseCanvas::new();
        for pixel in iter {
            canvas.insert(pixel.coord(), pixel.color);
        }
        canvas
    }
}

impl Extend<Pixel> for SparseCanvas {
    fn extend<I: IntoIterator<Item = Pixel>>(&mut self, iter: I) {
        for pixel in iter {
            self.insert(pixel.coord(), pixel.color);
        }
    }
}

/// Result of parsing a pixel stream.
#[derive(Debug, Clone, Default)]
pub struct StreamParse {
    /// Records in stream order, duplicates included.
    pub pixels: Vec<Pixel>,
    pub warnings: Vec<Warning>,
}

impl StreamParse {
    pub fn into_canvas(self) -> SparseCanvas {
        self.pixels.into_iter().collect()
    }
}

/// Strip an optional `0x` prefix left over from an upstream byte-string encoding.
fn strip_hex_prefix(stream: &str) -> &str {
    stream.strip_prefix("0x").or_else(|| stream.strip_prefix("0X")).unwrap_or(stream)
}

fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

fn hex_byte(pair: &[u8]) -> Option<u8> {
    Some(hex_value(pair[0])? << 4 | hex_value(pair[1])?)
}

/// Parse a pixel stream into its records, preserving stream order.
///
/// Never fails. Problems are collected as warnings:
/// - trailing characters that do not form a full record
/// - records containing non-hex characters (the whole record is skipped)
///
/// # Examples
///
/// ```
/// use fridge::pixels::{parse_stream, Pixel};
///
/// let parsed = parse_stream("0000010a0b02f");
/// assert_eq!(parsed.pixels, vec![
///     Pixel { x: 0, y: 0, color: 1 },
///     Pixel { x: 10, y: 11, color: 2 },
/// ]);
/// assert_eq!(parsed.warnings.len(), 1);
/// ```
pub fn parse_stream(stream: &str) -> StreamParse {
    let bytes = strip_hex_prefix(stream).as_bytes();
    let mut result = StreamParse {
        pixels: Vec::with_capacity(bytes.len() / RECORD_CHARS),
        warnings: Vec::new(),
    };

    let windows = bytes.chunks_exact(RECORD_CHARS);
    let remainder = windows.remainder().len();

    for (i, window) in windows.enumerate() {
        match (hex_byte(&window[0..2]), hex_byte(&window[2..4]), hex_byte(&window[4..6])) {
            (Some(x), Some(y), Some(color)) => result.pixels.push(Pixel { x, y, color }),
            _ => result.warnings.push(Warning::new(
                WarningKind::InvalidHex,
                format!("record {} contains non-hex characters, skipped", i),
            )),
        }
    }

    if remainder > 0 {
        result.warnings.push(Warning::new(
            WarningKind::MalformedStream,
            format!(
                "stream length is not a multiple of {}, dropped {} trailing character{}",
                RECORD_CHARS,
                remainder,
                if remainder == 1 { "" } else { "s" }
            ),
        ));
    }

    result
}

/// Decode a pixel stream into a sparse canvas.
///
/// Later records for the same coordinate win. Warnings are logged and
/// otherwise dropped; use [`parse_stream`] to inspect them.
///
/// # Examples
///
/// ```
/// use fridge::pixels::decode;
///
/// let canvas = decode("0000017f0101");
/// assert_eq!(canvas.get(0, 0), Some(1));
/// assert_eq!(canvas.get(127, 1), Some(1));
/// ```
pub fn decode(stream: &str) -> SparseCanvas {
    let parsed = parse_stream(stream);
    for warning in &parsed.warnings {
        warning.log();
    }
    parsed.into_canvas()
}

/// Encode a sparse canvas as a pixel stream.
///
/// Entries are written in canonical order (y ascending, then x ascending)
/// so re-encoding an unchanged canvas is byte-for-byte stable.
pub fn encode(canvas: &SparseCanvas) -> String {
    let mut out = String::with_capacity(canvas.len() * RECORD_CHARS);
    for (coord, color) in canvas.iter() {
        for byte in [coord.x, coord.y, color] {
            out.push(HEX_DIGITS[(byte >> 4) as usize] as char);
            out.push(HEX_DIGITS[(byte & 0x0f) as usize] as char);
        }
    }
    out
}
