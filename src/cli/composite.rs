//! CLI dispatch for the `fridge composite` command.

use std::path::Path;
use std::process::ExitCode;

use crate::compositor::composite_placements;
use crate::config::FridgeConfig;
use crate::models::{BaseCanvas, MagnetLibrary};
use crate::pixels::encode;
use crate::render::{render_canvas, save_png, scale_image};
use crate::share::{parse_share, share_param};

use super::{print_warnings, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the composite command.
pub fn run_composite(
    canvas: &Path,
    magnets: &Path,
    share: &str,
    output: Option<&Path>,
    stream: bool,
    scale: u8,
    strict: bool,
    config: &FridgeConfig,
) -> ExitCode {
    if output.is_none() && !stream {
        eprintln!("Error: either --output or --stream is required");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let base = match BaseCanvas::load(canvas) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Error: cannot load canvas '{}': {}", canvas.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let library = match MagnetLibrary::load(magnets) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error: cannot load magnets '{}': {}", magnets.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let share_text = share_param(share).unwrap_or(share);
    let decoded = parse_share(share_text, &config.scale_range());
    let mut warnings = decoded.warnings;

    let result =
        composite_placements(&base.decode(), library.magnets(), &decoded.placements, &config.layout());
    warnings.extend(result.warnings);

    if stream {
        println!("{}", encode(&result.canvas));
    }

    if let Some(path) = output {
        let (image, render_warnings) = render_canvas(&result.canvas, &config.palette());
        warnings.extend(render_warnings);
        if let Err(e) = save_png(&scale_image(image, scale), path) {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
        println!(
            "Composited {} placements onto '{}' -> '{}'",
            decoded.placements.len(),
            canvas.display(),
            path.display()
        );
    }

    print_warnings(&warnings);
    if strict && !warnings.is_empty() {
        eprintln!("Error: {} warnings in strict mode", warnings.len());
        return ExitCode::from(EXIT_ERROR);
    }

    ExitCode::from(EXIT_SUCCESS)
}
