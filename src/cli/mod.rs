//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod composite;
mod decode;
mod magnets;
mod mask;
mod preview;
mod share;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::{load_config, FridgeConfig};
use crate::error::Warning;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Fridge - compose BasePaint magnets onto a canvas and share the result
#[derive(Parser)]
#[command(name = "fridge")]
#[command(about = "Fridge - compose BasePaint magnets onto a canvas and share the result")]
#[command(version)]
pub struct Cli {
    /// Path to fridge.toml (default: search upward from the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a pixel stream and show its size, bounds, and canonical encoding
    Decode {
        /// Hex pixel stream, or @path to read it from a file
        stream: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Reset the pixels of every magnet in a base canvas to background
    Mask {
        /// Base canvas JSON file ({"pixels": "..."})
        #[arg(long)]
        canvas: PathBuf,

        /// Magnet library JSON file
        #[arg(long)]
        magnets: PathBuf,

        /// Output JSON file for the masked canvas
        #[arg(short, long)]
        output: PathBuf,

        /// Description stored in the output file
        #[arg(long)]
        description: Option<String>,
    },

    /// Composite a shared arrangement onto a base canvas
    Composite {
        /// Base canvas JSON file
        #[arg(long)]
        canvas: PathBuf,

        /// Magnet library JSON file
        #[arg(long)]
        magnets: PathBuf,

        /// Share string or share URL
        #[arg(long)]
        share: String,

        /// Output PNG file (required unless --stream)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the composited canvas as a pixel stream instead of writing a PNG
        #[arg(long)]
        stream: bool,

        /// Scale output by integer factor (1-16, default: 1)
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=16))]
        scale: u8,

        /// Strict mode: treat warnings as errors
        #[arg(long)]
        strict: bool,
    },

    /// Encode or decode share strings
    Share {
        #[command(subcommand)]
        action: ShareAction,
    },

    /// Render a single magnet to PNG
    Preview {
        /// Magnet library JSON file
        #[arg(long)]
        magnets: PathBuf,

        /// Magnet position in the library
        #[arg(long, conflicts_with = "id")]
        index: Option<usize>,

        /// Magnet identifier (transaction hash)
        #[arg(long)]
        id: Option<String>,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        /// Scale output by integer factor (1-16, default: 1)
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=16))]
        scale: u8,
    },

    /// Maintain the magnet library file
    Magnets {
        #[command(subcommand)]
        action: MagnetsAction,
    },
}

#[derive(Subcommand)]
pub enum ShareAction {
    /// Encode placements given as index,x,y,scale
    Encode {
        /// Placement as index,x,y,scale (repeatable, paint order)
        #[arg(short, long = "placement", value_name = "INDEX,X,Y,SCALE")]
        placements: Vec<String>,

        /// Print a full share URL under this base URL
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Decode a share string or share URL
    Decode {
        /// Share string or URL containing ?s=
        text: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum MagnetsAction {
    /// Remove records with a repeated identifier, keeping the first
    Dedupe {
        /// Magnet library JSON file (rewritten in place)
        file: PathBuf,

        /// Report without writing
        #[arg(long)]
        dry_run: bool,
    },
    /// Merge LABEL-part1, LABEL-part2, ... into one magnet
    Reassemble {
        /// Magnet library JSON file (rewritten in place)
        file: PathBuf,

        /// Token label shared by the parts
        label: String,
    },
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    dispatch(cli.command, &config)
}

fn dispatch(command: Commands, config: &FridgeConfig) -> ExitCode {
    match command {
        Commands::Decode { stream, json } => decode::run_decode(&stream, json),
        Commands::Mask { canvas, magnets, output, description } => {
            mask::run_mask(&canvas, &magnets, &output, description.as_deref())
        }
        Commands::Composite { canvas, magnets, share, output, stream, scale, strict } => {
            composite::run_composite(
                &canvas,
                &magnets,
                &share,
                output.as_deref(),
                stream,
                scale,
                strict,
                config,
            )
        }
        Commands::Share { action } => match action {
            ShareAction::Encode { placements, base_url } => {
                share::run_encode(&placements, base_url.as_deref(), config)
            }
            ShareAction::Decode { text, json } => share::run_decode(&text, json, config),
        },
        Commands::Preview { magnets, index, id, output, scale } => {
            preview::run_preview(&magnets, index, id.as_deref(), &output, scale, config)
        }
        Commands::Magnets { action } => match action {
            MagnetsAction::Dedupe { file, dry_run } => magnets::run_dedupe(&file, dry_run),
            MagnetsAction::Reassemble { file, label } => magnets::run_reassemble(&file, &label),
        },
    }
}

/// Print warnings to stderr.
pub(crate) fn print_warnings(warnings: &[Warning]) {
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }
}

/// Read a value that may be given inline or as `@path`.
pub(crate) fn read_inline_or_file(value: &str) -> std::io::Result<String> {
    match value.strip_prefix('@') {
        Some(path) => Ok(std::fs::read_to_string(Path::new(path))?.trim().to_string()),
        None => Ok(value.trim().to_string()),
    }
}
