//! Raster output of sparse canvases and magnet previews

use image::imageops::FilterType;
use image::RgbaImage;
use std::path::Path;
use thiserror::Error;

use crate::error::{Warning, WarningKind};
use crate::geometry::bounding_box;
use crate::palette::Palette;
use crate::pixels::{decode, SparseCanvas, CANVAS_SIZE};

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Collect one warning per distinct color index the palette cannot resolve.
fn unknown_color_warnings<'a>(colors: impl Iterator<Item = &'a u8>) -> Vec<Warning> {
    let mut unknown: Vec<u8> = colors.copied().filter(|c| !Palette::is_known(*c)).collect();
    unknown.sort_unstable();
    unknown.dedup();
    unknown
        .into_iter()
        .map(|index| {
            Warning::new(
                WarningKind::UnknownColorIndex,
                format!("color index {} has no palette entry, using background", index),
            )
        })
        .collect()
}

/// Render a sparse canvas to a 256x256 image.
///
/// Absent coordinates and unknown color indices both render as the
/// palette's background entry.
pub fn render_canvas(canvas: &SparseCanvas, palette: &Palette) -> (RgbaImage, Vec<Warning>) {
    let mut image = RgbaImage::from_pixel(CANVAS_SIZE, CANVAS_SIZE, palette.background());
    let colors: Vec<u8> = canvas.iter().map(|(_, color)| color).collect();

    for (coord, color) in canvas.iter() {
        image.put_pixel(coord.x as u32, coord.y as u32, palette.color(color));
    }

    (image, unknown_color_warnings(colors.iter()))
}

/// Render a magnet on its own, framed by its padded bounding box.
///
/// Returns `None` for a stream without pixels.
pub fn render_preview(stream: &str, palette: &Palette, padding: u8) -> Option<RgbaImage> {
    let sprite = decode(stream);
    let frame = bounding_box(&sprite)?.padded(padding);

    let mut image = RgbaImage::from_pixel(frame.width, frame.height, palette.background());
    for (coord, color) in sprite.iter() {
        image.put_pixel(
            (coord.x - frame.min_x) as u32,
            (coord.y - frame.min_y) as u32,
            palette.color(color),
        );
    }
    Some(image)
}

/// Save an RGBA image to a PNG file, creating parent directories.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save(path)?;
    Ok(())
}

/// Scale image by integer factor using nearest-neighbor interpolation.
///
/// This preserves crisp pixel edges for pixel art.
pub fn scale_image(image: RgbaImage, factor: u8) -> RgbaImage {
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    image::imageops::resize(&image, w * factor as u32, h * factor as u32, FilterType::Nearest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::TempDir;

    #[test]
    fn test_render_canvas_background_and_pixels() {
        let palette = Palette::basepaint();
        let (image, warnings) = render_canvas(&decode("0a0b03"), &palette);
        assert_eq!(image.dimensions(), (256, 256));
        assert_eq!(*image.get_pixel(10, 11), palette.color(3));
        assert_eq!(*image.get_pixel(0, 0), palette.background());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_render_unknown_color_falls_back() {
        let palette = Palette::basepaint();
        let (image, warnings) = render_canvas(&decode("01017f02027f030309"), &palette);
        assert_eq!(*image.get_pixel(1, 1), palette.background());
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().all(|w| w.kind == WarningKind::UnknownColorIndex));
    }

    #[test]
    fn test_render_preview_uses_padded_box() {
        let palette = Palette::basepaint();
        let image = render_preview("0a0a010b0a02", &palette, 2).unwrap();
        assert_eq!(image.dimensions(), (6, 5));
        assert_eq!(*image.get_pixel(2, 2), palette.color(1));
        assert_eq!(*image.get_pixel(3, 2), palette.color(2));
        assert_eq!(*image.get_pixel(0, 0), palette.background());
    }

    #[test]
    fn test_render_preview_empty() {
        assert!(render_preview("", &Palette::basepaint(), 2).is_none());
    }

    #[test]
    fn test_scale_image() {
        let image = RgbaImage::from_pixel(2, 3, Rgba([1, 2, 3, 255]));
        assert_eq!(scale_image(image.clone(), 1).dimensions(), (2, 3));
        assert_eq!(scale_image(image, 4).dimensions(), (8, 12));
    }

    #[test]
    fn test_save_png_creates_parent_dirs() {
        let temp = TempDir::new().expect("should create temp dir");
        let path = temp.path().join("out").join("canvas.png");
        let (image, _) = render_canvas(&SparseCanvas::new(), &Palette::basepaint());
        save_png(&image, &path).expect("should save png");
        assert!(path.exists());
    }
}
