//! CLI dispatch for the `fridge preview` command.

use std::path::Path;
use std::process::ExitCode;

use crate::config::FridgeConfig;
use crate::models::MagnetLibrary;
use crate::render::{render_preview, save_png, scale_image};

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the preview command.
pub fn run_preview(
    magnets: &Path,
    index: Option<usize>,
    id: Option<&str>,
    output: &Path,
    scale: u8,
    config: &FridgeConfig,
) -> ExitCode {
    let library = match MagnetLibrary::load(magnets) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error: cannot load magnets '{}': {}", magnets.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let magnet = match (index, id) {
        (Some(i), _) => match library.get(i) {
            Some(m) => m,
            None => {
                eprintln!("Error: no magnet at index {} ({} magnets)", i, library.len());
                return ExitCode::from(EXIT_ERROR);
            }
        },
        (None, Some(id)) => match library.find(id) {
            Some((_, m)) => m,
            None => {
                eprintln!("Error: magnet '{}' not found", id);
                return ExitCode::from(EXIT_ERROR);
            }
        },
        (None, None) => {
            eprintln!("Error: either --index or --id is required");
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let Some(image) = render_preview(&magnet.pixels, &config.palette(), config.preview.padding)
    else {
        eprintln!("Error: magnet '{}' has no pixels", magnet.transaction_hash);
        return ExitCode::from(EXIT_ERROR);
    };

    let image = scale_image(image, scale);
    if let Err(e) = save_png(&image, output) {
        eprintln!("Error: {}", e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!("Saved {}x{} preview to '{}'", image.width(), image.height(), output.display());
    ExitCode::from(EXIT_SUCCESS)
}
