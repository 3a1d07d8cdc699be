//! Masking magnets out of a base canvas
//!
//! Magnets are cut from a shared canvas snapshot. Before they can be placed
//! freely, their original pixels are painted over with the background color
//! so each sprite does not appear twice.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::Magnet;
use crate::palette::BACKGROUND;
use crate::pixels::{encode, parse_stream, Coord, SparseCanvas};

/// Result of masking a canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskResult {
    pub canvas: SparseCanvas,
    /// Distinct coordinates covered by any magnet
    pub magnet_pixels: usize,
    /// Coordinates present in the base that were reset to background
    pub replaced: usize,
}

/// Union of every coordinate referenced by any magnet stream.
///
/// Colors are ignored; only positions matter.
pub fn magnet_coords(magnets: &[Magnet]) -> BTreeSet<Coord> {
    magnets
        .iter()
        .flat_map(|magnet| parse_stream(&magnet.pixels).pixels)
        .map(|pixel| pixel.coord())
        .collect()
}

/// Reset every base pixel covered by a magnet to the background color.
///
/// Coordinates absent from the base are already background and are left
/// absent. The result does not depend on magnet order.
///
/// # Examples
///
/// ```
/// use fridge::mask::mask;
/// use fridge::models::Magnet;
/// use fridge::pixels::decode;
///
/// let base = decode("0a0a050b0b06");
/// let result = mask(&base, &[Magnet::new("0xaa", "1", "0a0a03")]);
/// assert_eq!(result.canvas.get(10, 10), Some(0));
/// assert_eq!(result.canvas.get(11, 11), Some(6));
/// assert_eq!(result.replaced, 1);
/// ```
pub fn mask(base: &SparseCanvas, magnets: &[Magnet]) -> MaskResult {
    let coords = magnet_coords(magnets);
    let mut canvas = base.clone();
    let mut replaced = 0;

    for coord in &coords {
        if let Some(color) = canvas.get_mut(*coord) {
            *color = BACKGROUND;
            replaced += 1;
        }
    }

    log::info!(
        "masked {} magnet pixels, replaced {} of {} canvas pixels",
        coords.len(),
        replaced,
        canvas.len()
    );
    MaskResult { canvas, magnet_pixels: coords.len(), replaced }
}

/// Masked canvas file as consumed by the web client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskedCanvas {
    pub description: String,
    pub pixels: String,
    pub total_pixels: usize,
    pub magnet_pixels_replaced: usize,
}

impl MaskedCanvas {
    pub fn new(result: &MaskResult, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            pixels: encode(&result.canvas),
            total_pixels: result.canvas.len(),
            magnet_pixels_replaced: result.replaced,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixels::decode;

    #[test]
    fn test_mask_replaces_regardless_of_magnet_color() {
        let base = decode("0a0a04");
        let result = mask(&base, &[Magnet::new("0x1", "1", "0a0a07")]);
        assert_eq!(result.canvas.get(10, 10), Some(BACKGROUND));
        assert_eq!(result.replaced, 1);
    }

    #[test]
    fn test_mask_leaves_absent_coords_absent() {
        let base = decode("000001");
        let result = mask(&base, &[Magnet::new("0x1", "1", "050505")]);
        assert_eq!(result.canvas, base);
        assert_eq!(result.replaced, 0);
        assert_eq!(result.magnet_pixels, 1);
    }

    #[test]
    fn test_mask_is_order_independent() {
        let base = decode("010101020202030303");
        let a = Magnet::new("0x1", "1", "010106");
        let b = Magnet::new("0x2", "2", "030306010107");
        let forward = mask(&base, &[a.clone(), b.clone()]);
        let backward = mask(&base, &[b, a]);
        assert_eq!(forward, backward);
        assert_eq!(forward.magnet_pixels, 2);
        assert_eq!(forward.replaced, 2);
        assert_eq!(forward.canvas.get(2, 2), Some(2));
    }

    #[test]
    fn test_mask_does_not_mutate_base() {
        let base = decode("010103");
        let _ = mask(&base, &[Magnet::new("0x1", "1", "010101")]);
        assert_eq!(base.get(1, 1), Some(3));
    }

    #[test]
    fn test_masked_canvas_document() {
        let base = decode("0101030000050202");
        let result = mask(&base, &[Magnet::new("0x1", "1", "010101")]);
        let doc = MaskedCanvas::new(&result, "masked");
        assert_eq!(doc.pixels, "000005010100");
        assert_eq!(doc.total_pixels, 2);
        assert_eq!(doc.magnet_pixels_replaced, 1);

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["totalPixels"], 2);
        assert_eq!(json["magnetPixelsReplaced"], 1);
    }
}
