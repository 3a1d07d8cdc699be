//! Canvas compositing
//!
//! Paints placed magnets onto a copy of a base canvas in placement order.
//! Each magnet is cut to its tight bounding box, scaled into its placement
//! rectangle with nearest-neighbour sampling, and clipped to the canvas.
//! Later placements overwrite earlier ones and the base at shared
//! coordinates.

use crate::error::{Warning, WarningKind};
use crate::geometry::{bounding_box, placement_rect, round_half_up, Layout};
use crate::models::{Magnet, Placement};
use crate::pixels::{parse_stream, SparseCanvas, StreamParse, CANVAS_SIZE};

/// Result of compositing.
#[derive(Debug, Clone, Default)]
pub struct Composite {
    pub canvas: SparseCanvas,
    pub warnings: Vec<Warning>,
}

/// Convert a destination pixel range to the in-canvas part of it.
///
/// `start..end` is the source pixel's footprint in canvas units. Every
/// source pixel covers at least the pixel at `round(start)`, so downscaled
/// magnets never vanish.
fn covered_range(start: f64, end: f64) -> std::ops::Range<i64> {
    let first = round_half_up(start) as i64;
    let last = (round_half_up(end) as i64).max(first.saturating_add(1));
    first.max(0)..last.min(CANVAS_SIZE as i64)
}

/// Paint one magnet onto `canvas`.
fn paint_magnet(
    canvas: &mut SparseCanvas,
    magnet: &Magnet,
    placement: &Placement,
    layout: &Layout,
    warnings: &mut Vec<Warning>,
) {
    if !(placement.x.is_finite() && placement.y.is_finite()) {
        warnings.push(Warning::new(
            WarningKind::InvalidPlacement,
            format!(
                "magnet {} placed at non-finite position ({}, {}), skipped",
                magnet.transaction_hash, placement.x, placement.y
            ),
        ));
        return;
    }

    let StreamParse { pixels, warnings: parse_warnings } = parse_stream(&magnet.pixels);
    for warning in parse_warnings {
        warnings.push(Warning::new(
            warning.kind,
            format!("magnet {}: {}", magnet.transaction_hash, warning.message),
        ));
    }
    let sprite: SparseCanvas = pixels.into_iter().collect();

    let Some(bbox) = bounding_box(&sprite) else {
        warnings.push(Warning::new(
            WarningKind::EmptyBoundingBox,
            format!("magnet {} has no pixels, skipped", magnet.transaction_hash),
        ));
        return;
    };

    let rect = placement_rect(&bbox, placement, layout);
    let scale_x = rect.width / bbox.width as f64;
    let scale_y = rect.height / bbox.height as f64;
    let half_w = bbox.width as f64 / 2.0;
    let half_h = bbox.height as f64 / 2.0;

    // Canonical (row-major) source order keeps overlapping writes deterministic when downscaling
    for (coord, color) in sprite.iter() {
        let local_x = (coord.x - bbox.min_x) as f64;
        let local_y = (coord.y - bbox.min_y) as f64;
        let start_x = placement.x + (local_x - half_w) * scale_x;
        let start_y = placement.y + (local_y - half_h) * scale_y;

        for dest_y in covered_range(start_y, start_y + scale_y) {
            for dest_x in covered_range(start_x, start_x + scale_x) {
                canvas.set(dest_x as u8, dest_y as u8, color);
            }
        }
    }
}

/// Composite magnets onto a base canvas.
///
/// `layers` is in paint order. The base is copied, never mutated, and
/// repeated calls with the same inputs produce identical canvases. Magnets
/// without pixels are skipped with an [`WarningKind::EmptyBoundingBox`]
/// warning.
///
/// # Examples
///
/// ```
/// use fridge::compositor::composite;
/// use fridge::geometry::Layout;
/// use fridge::models::{Magnet, Placement};
/// use fridge::pixels::SparseCanvas;
///
/// let magnet = Magnet::new("0xaa", "1", "000003");
/// let placement = Placement { magnet_index: 0, x: 100.0, y: 100.0, scale: 0.25 };
/// let layout = Layout { base_height: 4.0, ..Layout::default() };
///
/// let result = composite(&SparseCanvas::new(), &[(&magnet, placement)], &layout);
/// assert_eq!(result.canvas.get(100, 100), Some(3));
/// ```
pub fn composite(
    base: &SparseCanvas,
    layers: &[(&Magnet, Placement)],
    layout: &Layout,
) -> Composite {
    let mut result = Composite { canvas: base.clone(), warnings: Vec::new() };

    for (magnet, placement) in layers {
        paint_magnet(&mut result.canvas, magnet, placement, layout, &mut result.warnings);
    }

    log::debug!(
        "composited {} layers, {} pixels, {} warnings",
        layers.len(),
        result.canvas.len(),
        result.warnings.len()
    );
    result
}

/// Resolve placements against a magnet list and composite them.
///
/// Placements whose index is past the end of `magnets` are skipped with a
/// [`WarningKind::MagnetIndexOutOfRange`] warning; the list may have changed
/// since the placements were shared.
pub fn composite_placements(
    base: &SparseCanvas,
    magnets: &[Magnet],
    placements: &[Placement],
    layout: &Layout,
) -> Composite {
    let mut warnings = Vec::new();
    let mut layers = Vec::with_capacity(placements.len());

    for (position, placement) in placements.iter().enumerate() {
        match magnets.get(placement.magnet_index) {
            Some(magnet) => layers.push((magnet, *placement)),
            None => warnings.push(Warning::new(
                WarningKind::MagnetIndexOutOfRange,
                format!(
                    "placement {} references magnet {} but only {} magnets exist, skipped",
                    position,
                    placement.magnet_index,
                    magnets.len()
                ),
            )),
        }
    }

    let mut result = composite(base, &layers, layout);
    warnings.append(&mut result.warnings);
    result.warnings = warnings;
    for warning in &result.warnings {
        warning.log();
    }
    result
}
