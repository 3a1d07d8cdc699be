//! Bounding boxes and placement transforms
//!
//! Two kinds of boxes exist and must not be mixed up: the tight
//! (unpadded) box drives all placement math, while the padded box is only
//! used to frame an isolated preview of a magnet.

use crate::models::Placement;
use crate::pixels::{decode, Coord, SparseCanvas};

/// Rendered height of a magnet at scale 1.0, in canvas pixels.
pub const BASE_HEIGHT: f64 = 60.0;

/// Smallest placement scale.
pub const SCALE_MIN: f64 = 0.25;

/// Largest placement scale.
pub const SCALE_MAX: f64 = 4.0;

/// Margin added around a magnet's box when rendering a preview.
pub const PREVIEW_PADDING: u8 = 2;

/// Round half up, matching the rounding of the browser client that
/// produced existing share links.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Continuous scale range and its 8-bit quantization.
///
/// The range sets the precision budget of the share codec: one quantization
/// step is `(max - min) / 255`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleRange {
    pub min: f64,
    pub max: f64,
}

impl Default for ScaleRange {
    fn default() -> Self {
        Self { min: SCALE_MIN, max: SCALE_MAX }
    }
}

impl ScaleRange {
    /// Clamp a scale into the range. NaN maps to `min`.
    pub fn clamp(&self, scale: f64) -> f64 {
        scale.max(self.min).min(self.max)
    }

    /// Map a scale onto 0..=255.
    pub fn quantize(&self, scale: f64) -> u8 {
        let t = (self.clamp(scale) - self.min) / (self.max - self.min);
        round_half_up(t * 255.0).clamp(0.0, 255.0) as u8
    }

    /// Inverse of [`quantize`](Self::quantize). Re-quantizing the result yields the same byte.
    pub fn dequantize(&self, byte: u8) -> f64 {
        self.min + (byte as f64 / 255.0) * (self.max - self.min)
    }

    /// Size of one quantization step.
    pub fn resolution(&self) -> f64 {
        (self.max - self.min) / 255.0
    }
}

/// Constants that turn a placement into canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Rendered height at scale 1.0.
    pub base_height: f64,
    pub scale_range: ScaleRange,
}

impl Default for Layout {
    fn default() -> Self {
        Self { base_height: BASE_HEIGHT, scale_range: ScaleRange::default() }
    }
}

/// Tight rectangle around every explicit pixel of a magnet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: u8,
    pub min_y: u8,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn max_x(&self) -> u8 {
        (self.min_x as u32 + self.width - 1) as u8
    }

    pub fn max_y(&self) -> u8 {
        (self.min_y as u32 + self.height - 1) as u8
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.x >= self.min_x
            && coord.x <= self.max_x()
            && coord.y >= self.min_y
            && coord.y <= self.max_y()
    }

    /// Grow by `margin` on every side, clamped to the canvas edges.
    ///
    /// Only for preview framing; placement math uses the unpadded box.
    pub fn padded(&self, margin: u8) -> BoundingBox {
        let min_x = self.min_x.saturating_sub(margin);
        let min_y = self.min_y.saturating_sub(margin);
        let max_x = self.max_x().saturating_add(margin);
        let max_y = self.max_y().saturating_add(margin);
        BoundingBox {
            min_x,
            min_y,
            width: (max_x - min_x) as u32 + 1,
            height: (max_y - min_y) as u32 + 1,
        }
    }
}

/// Compute the bounding box of a decoded canvas. `None` when it has no pixels.
pub fn bounding_box(canvas: &SparseCanvas) -> Option<BoundingBox> {
    let mut coords = canvas.coords();
    let first = coords.next()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);

    for coord in coords {
        min_x = min_x.min(coord.x);
        max_x = max_x.max(coord.x);
        min_y = min_y.min(coord.y);
        max_y = max_y.max(coord.y);
    }

    Some(BoundingBox {
        min_x,
        min_y,
        width: (max_x - min_x) as u32 + 1,
        height: (max_y - min_y) as u32 + 1,
    })
}

/// Decode a pixel stream and compute its bounding box.
pub fn stream_bounding_box(stream: &str) -> Option<BoundingBox> {
    bounding_box(&decode(stream))
}

/// A rectangle in canvas pixel units. May extend past the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Destination rectangle of a placed magnet.
///
/// Height is `base_height * scale`, width keeps the box's aspect ratio,
/// and the rectangle is centered on the placement position.
pub fn placement_rect(bbox: &BoundingBox, placement: &Placement, layout: &Layout) -> Rect {
    let height = layout.base_height * layout.scale_range.clamp(placement.scale);
    let width = height * (bbox.width as f64 / bbox.height as f64);
    Rect { x: placement.x - width / 2.0, y: placement.y - height / 2.0, width, height }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(x: f64, y: f64, scale: f64) -> Placement {
        Placement { magnet_index: 0, x, y, scale }
    }

    #[test]
    fn test_bounding_box_empty() {
        assert_eq!(bounding_box(&SparseCanvas::new()), None);
        assert_eq!(stream_bounding_box(""), None);
    }

    #[test]
    fn test_bounding_box_single_pixel() {
        let bbox = stream_bounding_box("0a1401").unwrap();
        assert_eq!(bbox, BoundingBox { min_x: 10, min_y: 20, width: 1, height: 1 });
        assert_eq!(bbox.max_x(), 10);
    }

    #[test]
    fn test_bounding_box_spans_extremes() {
        let bbox = stream_bounding_box("0a14010c1e020b1003").unwrap();
        assert_eq!(bbox, BoundingBox { min_x: 10, min_y: 16, width: 3, height: 15 });
        assert!(bbox.contains(Coord::new(11, 20)));
        assert!(!bbox.contains(Coord::new(13, 20)));
    }

    #[test]
    fn test_padded_clamps_to_canvas() {
        let bbox = BoundingBox { min_x: 1, min_y: 100, width: 3, height: 155 };
        let padded = bbox.padded(2);
        assert_eq!(padded.min_x, 0);
        assert_eq!(padded.min_y, 98);
        assert_eq!(padded.max_x(), 5);
        assert_eq!(padded.max_y(), 255);
        assert_eq!(padded.width, 6);
        assert_eq!(padded.height, 158);
    }

    #[test]
    fn test_placement_rect_centered() {
        let bbox = BoundingBox { min_x: 0, min_y: 0, width: 20, height: 10 };
        let rect = placement_rect(&bbox, &placement(100.0, 50.0, 1.0), &Layout::default());
        assert_eq!(rect.height, 60.0);
        assert_eq!(rect.width, 120.0);
        assert_eq!(rect.x, 40.0);
        assert_eq!(rect.y, 20.0);
    }

    #[test]
    fn test_placement_rect_scaled() {
        let bbox = BoundingBox { min_x: 5, min_y: 5, width: 10, height: 10 };
        let rect = placement_rect(&bbox, &placement(0.0, 0.0, 0.5), &Layout::default());
        assert_eq!(rect.height, 30.0);
        assert_eq!(rect.width, 30.0);
        assert_eq!(rect.x, -15.0);
    }

    #[test]
    fn test_placement_rect_clamps_scale() {
        let bbox = BoundingBox { min_x: 0, min_y: 0, width: 1, height: 1 };
        let rect = placement_rect(&bbox, &placement(0.0, 0.0, 10.0), &Layout::default());
        assert_eq!(rect.height, 240.0);
    }

    #[test]
    fn test_quantize_known_values() {
        let range = ScaleRange::default();
        assert_eq!(range.quantize(0.25), 0);
        assert_eq!(range.quantize(4.0), 255);
        assert_eq!(range.quantize(1.0), 51);
        assert_eq!(range.quantize(0.0), 0);
        assert_eq!(range.quantize(9.0), 255);
        assert_eq!(range.quantize(f64::NAN), 0);
    }

    #[test]
    fn test_quantize_is_stable() {
        let range = ScaleRange::default();
        for byte in 0..=255u8 {
            assert_eq!(range.quantize(range.dequantize(byte)), byte);
        }
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-0.5), 0.0);
        assert_eq!(round_half_up(-0.6), -1.0);
    }
}
