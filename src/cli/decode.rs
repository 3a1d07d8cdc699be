//! CLI dispatch for the `fridge decode` command.

use std::process::ExitCode;

use crate::geometry::bounding_box;
use crate::pixels::{encode, parse_stream};

use super::{print_warnings, read_inline_or_file, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the decode command.
pub fn run_decode(stream: &str, json: bool) -> ExitCode {
    let stream = match read_inline_or_file(stream) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let parsed = parse_stream(&stream);
    print_warnings(&parsed.warnings);
    let canvas = parsed.into_canvas();
    let bounds = bounding_box(&canvas);

    if json {
        let output = serde_json::json!({
            "pixels": canvas.len(),
            "bounds": bounds.map(|b| [b.min_x as u32, b.min_y as u32, b.width, b.height]),
            "stream": encode(&canvas),
        });
        match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        println!("pixels: {}", canvas.len());
        match bounds {
            Some(b) => println!("bounds: {}x{} at ({}, {})", b.width, b.height, b.min_x, b.min_y),
            None => println!("bounds: none"),
        }
        println!("stream: {}", encode(&canvas));
    }

    ExitCode::from(EXIT_SUCCESS)
}
