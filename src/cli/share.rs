//! CLI dispatch for the `fridge share` subcommands.

use std::process::ExitCode;

use crate::config::FridgeConfig;
use crate::models::Placement;
use crate::share::{encode_share, parse_share, share_param, share_url};

use super::{print_warnings, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Parse an `index,x,y,scale` argument.
fn parse_placement(arg: &str) -> Result<Placement, String> {
    let fields: Vec<&str> = arg.split(',').map(str::trim).collect();
    let [index, x, y, scale] = fields.as_slice() else {
        return Err(format!("expected INDEX,X,Y,SCALE, got '{}'", arg));
    };

    let magnet_index = index.parse::<usize>().map_err(|_| format!("invalid magnet index '{}'", index))?;
    let x = x.parse::<f64>().map_err(|_| format!("invalid x '{}'", x))?;
    let y = y.parse::<f64>().map_err(|_| format!("invalid y '{}'", y))?;
    let scale = scale.parse::<f64>().map_err(|_| format!("invalid scale '{}'", scale))?;

    Ok(Placement { magnet_index, x, y, scale })
}

/// Execute `share encode`.
pub fn run_encode(args: &[String], base_url: Option<&str>, config: &FridgeConfig) -> ExitCode {
    let placements = match args.iter().map(|a| parse_placement(a)).collect::<Result<Vec<_>, _>>() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    let range = config.scale_range();
    let encoded = match base_url.or(config.share.base_url.as_deref()) {
        Some(base) => share_url(base, &placements, &range),
        None => encode_share(&placements, &range),
    };

    match encoded {
        Ok(text) => {
            println!("{}", text);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Execute `share decode`.
pub fn run_decode(text: &str, json: bool, config: &FridgeConfig) -> ExitCode {
    let share_text = share_param(text).unwrap_or(text);
    let decoded = parse_share(share_text, &config.scale_range());
    print_warnings(&decoded.warnings);

    if json {
        match serde_json::to_string_pretty(&decoded.placements) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        for (position, p) in decoded.placements.iter().enumerate() {
            println!(
                "{}: magnet {} at ({}, {}) scale {:.3}",
                position, p.magnet_index, p.x, p.y, p.scale
            );
        }
    }

    ExitCode::from(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_placement() {
        let p = parse_placement("5, 100, 200, 1.5").unwrap();
        assert_eq!(p, Placement { magnet_index: 5, x: 100.0, y: 200.0, scale: 1.5 });
    }

    #[test]
    fn test_parse_placement_errors() {
        assert!(parse_placement("5,100,200").is_err());
        assert!(parse_placement("a,1,2,1.0").is_err());
        assert!(parse_placement("-1,1,2,1.0").is_err());
        assert!(parse_placement("1,1,2,big").is_err());
    }
}
