//! Configuration schema types for `studio.toml`
//!
//! Defines the structure and validation rules for the studio configuration.

use serde::{Deserialize, Serialize};

use crate::models::GridShape;

/// Grid used when a command does not pass `--rows`/`--cols`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_rows")]
    pub rows: u32,
    #[serde(default = "default_cols")]
    pub cols: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            cols: default_cols(),
        }
    }
}

impl GridConfig {
    pub fn shape(&self) -> GridShape {
        GridShape::new(self.rows, self.cols)
    }
}

fn default_rows() -> u32 {
    2
}

fn default_cols() -> u32 {
    4
}

/// Upper bounds for grid dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_rows")]
    pub max_rows: u32,
    #[serde(default = "default_max_cols")]
    pub max_cols: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_rows: default_max_rows(),
            max_cols: default_max_cols(),
        }
    }
}

fn default_max_rows() -> u32 {
    8
}

fn default_max_cols() -> u32 {
    12
}

/// Animation preview settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Edge of the square preview viewport in logical pixels
    #[serde(default = "default_viewport")]
    pub viewport: u32,
    /// Integer scale for exported frames and GIFs
    #[serde(default = "default_scale")]
    pub scale: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            viewport: default_viewport(),
            scale: default_scale(),
        }
    }
}

fn default_viewport() -> u32 {
    crate::style::VIEWPORT_SIZE
}

fn default_scale() -> u32 {
    1
}

/// Grid overlay appearance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// RGBA outline color
    #[serde(default = "default_overlay_color")]
    pub color: [u8; 4],
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            color: default_overlay_color(),
        }
    }
}

fn default_overlay_color() -> [u8; 4] {
    [99, 102, 241, 200]
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (e.g. "warn", "spritestudio=debug")
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Complete `studio.toml` configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudioConfig {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
    #[serde(default)]
    pub overlay: OverlayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "grid.rows")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "studio.toml: '{}' {}", self.field, self.message)
    }
}

impl StudioConfig {
    /// Validate the configuration and return all errors found
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: String| {
            errors.push(ConfigValidationError { field: field.to_string(), message });
        };

        if self.limits.max_rows == 0 {
            push("limits.max_rows", "must be a positive integer".to_string());
        }
        if self.limits.max_cols == 0 {
            push("limits.max_cols", "must be a positive integer".to_string());
        }

        if self.grid.rows == 0 || self.grid.rows > self.limits.max_rows {
            push("grid.rows", format!("must be between 1 and {}", self.limits.max_rows));
        }
        if self.grid.cols == 0 || self.grid.cols > self.limits.max_cols {
            push("grid.cols", format!("must be between 1 and {}", self.limits.max_cols));
        }

        if self.preview.viewport == 0 {
            push("preview.viewport", "must be a positive integer".to_string());
        }
        if self.preview.scale == 0 || self.preview.scale > 16 {
            push("preview.scale", "must be between 1 and 16".to_string());
        }

        if self.logging.level.trim().is_empty() {
            push("logging.level", "must be a non-empty filter directive".to_string());
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Check a shape against the configured limits.
    pub fn within_limits(&self, shape: GridShape) -> bool {
        shape.is_valid() && shape.rows <= self.limits.max_rows && shape.cols <= self.limits.max_cols
    }
}
