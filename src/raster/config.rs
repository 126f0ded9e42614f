//! Configuration for rasterization

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::path::DEFAULT_TOLERANCE;

/// Errors that can occur when loading a raster configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read raster config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse raster config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Canvas and quality options for [`crate::rasterize_with_config`]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RasterConfig {
    /// Canvas width in pixels; falls back to the root's `width`, then a guess
    pub width: Option<u32>,

    /// Canvas height in pixels; falls back to the root's `height`, then a guess
    pub height: Option<u32>,

    /// Color the canvas is cleared to; transparent when unset
    pub background: Option<String>,

    /// Flattening tolerance for curves, in user units
    pub tolerance: f64,

    /// Whether painted edges are anti-aliased
    pub anti_alias: bool,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            background: None,
            tolerance: DEFAULT_TOLERANCE,
            anti_alias: true,
        }
    }
}

impl RasterConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a configuration from TOML text; missing keys keep their defaults
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background = Some(color.into());
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_anti_alias(mut self, anti_alias: bool) -> Self {
        self.anti_alias = anti_alias;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RasterConfig::default();
        assert_eq!(config.width, None);
        assert_eq!(config.tolerance, DEFAULT_TOLERANCE);
        assert!(config.anti_alias);
    }

    #[test]
    fn test_builder_methods() {
        let config = RasterConfig::new()
            .with_size(64, 32)
            .with_background("white")
            .with_anti_alias(false);
        assert_eq!(config.width, Some(64));
        assert_eq!(config.height, Some(32));
        assert_eq!(config.background.as_deref(), Some("white"));
        assert!(!config.anti_alias);
    }

    #[test]
    fn test_from_str_partial() {
        let config = RasterConfig::from_str("width = 200\nanti-alias = false\n").unwrap();
        assert_eq!(config.width, Some(200));
        assert_eq!(config.height, None);
        assert!(!config.anti_alias);
        assert_eq!(config.tolerance, DEFAULT_TOLERANCE);
    }

    #[test]
    fn test_from_str_rejects_bad_types() {
        let err = RasterConfig::from_str("width = \"wide\"").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_from_missing_file() {
        let err = RasterConfig::from_file(Path::new("/nonexistent/raster.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
