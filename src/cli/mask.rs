//! CLI dispatch for the `fridge mask` command.

use std::path::Path;
use std::process::ExitCode;

use crate::mask::{mask, MaskedCanvas};
use crate::models::{BaseCanvas, MagnetLibrary};

use super::{EXIT_ERROR, EXIT_SUCCESS};

const DEFAULT_DESCRIPTION: &str = "Base canvas with magnet pixels reset to background";

/// Execute the mask command.
pub fn run_mask(
    canvas: &Path,
    magnets: &Path,
    output: &Path,
    description: Option<&str>,
) -> ExitCode {
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

    let result = mask(&base.decode(), library.magnets());
    let report = MaskedCanvas::new(&result, description.unwrap_or(DEFAULT_DESCRIPTION));

    let json = match serde_json::to_string_pretty(&report) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    if let Err(e) = std::fs::write(output, json) {
        eprintln!("Error: cannot write '{}': {}", output.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!(
        "Masked {} of {} magnet pixels, {} pixels total",
        report.magnet_pixels_replaced,
        result.magnet_pixels,
        report.total_pixels
    );
    ExitCode::from(EXIT_SUCCESS)
}
