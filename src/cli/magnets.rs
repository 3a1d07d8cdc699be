//! CLI dispatch for the `fridge magnets` subcommands.

use std::path::Path;
use std::process::ExitCode;

use crate::models::MagnetLibrary;

use super::{EXIT_ERROR, EXIT_SUCCESS};

fn load(file: &Path) -> Result<MagnetLibrary, ExitCode> {
    MagnetLibrary::load(file).map_err(|e| {
        eprintln!("Error: cannot load magnets '{}': {}", file.display(), e);
        ExitCode::from(EXIT_ERROR)
    })
}

/// Execute `magnets dedupe`.
pub fn run_dedupe(file: &Path, dry_run: bool) -> ExitCode {
    let mut library = match load(file) {
        Ok(l) => l,
        Err(code) => return code,
    };

    let removed = library.dedupe();
    if removed > 0 && !dry_run {
        if let Err(e) = library.save(file) {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    }

    if dry_run {
        println!("Would remove {} duplicates, {} magnets would remain", removed, library.len());
    } else {
        println!("Removed {} duplicates, {} magnets remain", removed, library.len());
        if removed > 0 {
            println!("Note: magnet indices changed; existing share links may point at other magnets");
        }
    }
    ExitCode::from(EXIT_SUCCESS)
}

/// Execute `magnets reassemble`.
pub fn run_reassemble(file: &Path, label: &str) -> ExitCode {
    let mut library = match load(file) {
        Ok(l) => l,
        Err(code) => return code,
    };

    let identifier = match library.reassemble(label) {
        Ok(merged) => merged.transaction_hash.clone(),
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if let Err(e) = library.save(file) {
        eprintln!("Error: {}", e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!("Reassembled '{}' as {} at index {}", label, identifier, library.len() - 1);
    ExitCode::from(EXIT_SUCCESS)
}
