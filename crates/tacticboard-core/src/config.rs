//! Board configuration.

use crate::eraser::ERASER_RADIUS;
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::shapes::SerializableColor;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Tunables for drawing, erasing and undo.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Eraser radius in canvas units.
    pub eraser_radius: f64,
    /// Maximum number of undo states (`None` = unbounded).
    pub history_limit: Option<usize>,
    /// Stroke width for every drawing.
    pub stroke_width: f64,
    /// Dash lengths for dashed lines.
    pub dash_pattern: Vec<f64>,
    /// Font size for text annotations, in pixels.
    pub font_size: f64,
    /// Initial drawing color as a hex string.
    pub default_color: String,
    /// Defer redraws caused by pointer moves to the next frame.
    pub coalesce_pointer_moves: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            eraser_radius: ERASER_RADIUS,
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
            stroke_width: 2.0,
            dash_pattern: vec![5.0, 5.0],
            font_size: 16.0,
            default_color: "#000000".to_string(),
            coalesce_pointer_moves: false,
        }
    }
}

impl BoardConfig {
    /// Parse and validate a config from JSON.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded board config from {}", path.display());
        Ok(config)
    }

    /// Reject values no gesture or renderer can work with.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.eraser_radius >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "eraser_radius must be non-negative, got {}",
                self.eraser_radius
            )));
        }
        if !(self.stroke_width >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "stroke_width must be non-negative, got {}",
                self.stroke_width
            )));
        }
        if !(self.font_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "font_size must be positive, got {}",
                self.font_size
            )));
        }
        if self.history_limit == Some(0) {
            return Err(ConfigError::Invalid(
                "history_limit must be at least 1".to_string(),
            ));
        }
        if self.dash_pattern.iter().any(|d| !(*d >= 0.0)) {
            return Err(ConfigError::Invalid(
                "dash_pattern entries must be non-negative".to_string(),
            ));
        }
        Ok(())
    }

    /// The configured drawing color, or black when it does not parse.
    pub fn initial_color(&self) -> SerializableColor {
        SerializableColor::from_hex(&self.default_color).unwrap_or_else(|| {
            log::warn!(
                "Unparseable default_color {:?}, falling back to black",
                self.default_color
            );
            SerializableColor::black()
        })
    }
}
