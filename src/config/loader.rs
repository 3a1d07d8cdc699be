//! Configuration loading and discovery for `fridge.toml`

use super::schema::FridgeConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file.
pub const CONFIG_FILE: &str = "fridge.toml";

/// Error loading `fridge.toml`
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("cannot read fridge.toml: {0}")]
    Io(#[from] std::io::Error),
    #[error("fridge.toml is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    /// Values parsed but are unusable for layout, share encoding or rendering
    #[error("fridge.toml has {} invalid setting(s):\n{}", .0.len(), .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// Locate the fridge.toml that applies to the current directory.
///
/// The nearest one in the directory or an ancestor wins; otherwise the
/// per-user file under `$XDG_CONFIG_HOME/fridge/` (default `~/.config`).
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(|cwd| find_config_from(&cwd)).or_else(find_xdg_config)
}

/// Per-user fridge.toml, if it exists.
pub fn find_xdg_config() -> Option<PathBuf> {
    let config_home = env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(config_home.join("fridge").join(CONFIG_FILE)).filter(|path| path.is_file())
}

/// Nearest fridge.toml in `dir` or one of its ancestors.
pub fn find_config_from(dir: &Path) -> Option<PathBuf> {
    dir.ancestors().map(|ancestor| ancestor.join(CONFIG_FILE)).find(|path| path.is_file())
}

/// Load configuration.
///
/// If a path is provided, loads from that file. Otherwise uses
/// [`find_config`]; when nothing is found the defaults are returned.
pub fn load_config(path: Option<&Path>) -> Result<FridgeConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            log::debug!("loading config from {}", p.display());
            load_config_file(&p)
        }
        None => Ok(FridgeConfig::default()),
    }
}

/// Load configuration from a specific file path.
pub fn load_config_file(path: &Path) -> Result<FridgeConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: FridgeConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}
