//! Configuration schema types for `fridge.toml`
//!
//! The display and share constants live here rather than as literals
//! because they set the precision of the share format: links made under
//! one scale range decode differently under another.

use serde::{Deserialize, Serialize};

use crate::geometry::{Layout, ScaleRange, BASE_HEIGHT, PREVIEW_PADDING, SCALE_MAX, SCALE_MIN};
use crate::palette::{Palette, BASEPAINT_HEX};

/// Display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Rendered magnet height at scale 1.0, in canvas pixels
    #[serde(default = "default_base_height")]
    pub base_height: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { base_height: default_base_height() }
    }
}

fn default_base_height() -> f64 {
    BASE_HEIGHT
}

/// Share link settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Smallest placement scale
    #[serde(default = "default_scale_min")]
    pub scale_min: f64,
    /// Largest placement scale
    #[serde(default = "default_scale_max")]
    pub scale_max: f64,
    /// Base URL used when printing share links
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self { scale_min: default_scale_min(), scale_max: default_scale_max(), base_url: None }
    }
}

fn default_scale_min() -> f64 {
    SCALE_MIN
}

fn default_scale_max() -> f64 {
    SCALE_MAX
}

/// Preview rendering settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Margin around a magnet's bounding box in previews
    #[serde(default = "default_padding")]
    pub padding: u8,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self { padding: default_padding() }
    }
}

fn default_padding() -> u8 {
    PREVIEW_PADDING
}

/// Palette override
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteConfig {
    /// Exactly 8 hex colors, index 0 first
    #[serde(default = "default_colors")]
    pub colors: Vec<String>,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self { colors: default_colors() }
    }
}

fn default_colors() -> Vec<String> {
    BASEPAINT_HEX.iter().map(|c| c.to_string()).collect()
}

/// Complete `fridge.toml` configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FridgeConfig {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub share: ShareConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
    #[serde(default)]
    pub palette: PaletteConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "share.scale_min")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fridge.toml: '{}' {}", self.field, self.message)
    }
}

impl FridgeConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if !(self.display.base_height.is_finite() && self.display.base_height > 0.0) {
            errors.push(ConfigValidationError {
                field: "display.base_height".to_string(),
                message: "must be a positive number".to_string(),
            });
        }

        if !(self.share.scale_min.is_finite() && self.share.scale_min > 0.0) {
            errors.push(ConfigValidationError {
                field: "share.scale_min".to_string(),
                message: "must be a positive number".to_string(),
            });
        }

        if !(self.share.scale_max.is_finite() && self.share.scale_max > self.share.scale_min) {
            errors.push(ConfigValidationError {
                field: "share.scale_max".to_string(),
                message: "must be greater than share.scale_min".to_string(),
            });
        }

        if let Err(e) = Palette::from_hex(&self.palette.colors) {
            errors.push(ConfigValidationError {
                field: "palette.colors".to_string(),
                message: e.to_string(),
            });
        }

        errors
    }

    pub fn scale_range(&self) -> ScaleRange {
        ScaleRange { min: self.share.scale_min, max: self.share.scale_max }
    }

    pub fn layout(&self) -> Layout {
        Layout { base_height: self.display.base_height, scale_range: self.scale_range() }
    }

    /// The configured palette. Falls back to BasePaint if the entries do not parse.
    pub fn palette(&self) -> Palette {
        Palette::from_hex(&self.palette.colors).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = FridgeConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.layout(), Layout::default());
        assert_eq!(config.palette(), Palette::basepaint());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: FridgeConfig = toml::from_str("[display]\nbase_height = 30.0").unwrap();
        assert_eq!(config.display.base_height, 30.0);
        assert_eq!(config.share.scale_min, SCALE_MIN);
        assert_eq!(config.preview.padding, PREVIEW_PADDING);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = FridgeConfig::default();
        config.display.base_height = 0.0;
        config.share.scale_min = 2.0;
        config.share.scale_max = 1.0;
        config.palette.colors = vec!["#fff".to_string()];

        let fields: Vec<String> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["display.base_height", "share.scale_max", "palette.colors"]);
    }
}
