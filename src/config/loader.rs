//! Configuration loading and discovery for `studio.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::StudioConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Name of the configuration file
pub const CONFIG_FILE: &str = "studio.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse studio.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub rows: Option<u32>,
    pub cols: Option<u32>,
    pub scale: Option<u32>,
    pub viewport: Option<u32>,
    pub log_level: Option<String>,
}

/// Find `studio.toml` by walking up from the current working directory,
/// falling back to `$XDG_CONFIG_HOME/spritestudio/studio.toml`
/// (or `~/.config/spritestudio/studio.toml`).
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }
    find_xdg_config()
}

/// Find `studio.toml` in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("spritestudio").join(CONFIG_FILE);
    config_path.exists().then_some(config_path)
}

/// Find `studio.toml` by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from `path`, or from the discovered `studio.toml`.
///
/// Falls back to [`StudioConfig::default`] when no file exists.
///
/// # Example
/// ```ignore
/// let config = load_config(None)?;
/// let config = load_config(Some(Path::new("assets/studio.toml")))?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<StudioConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => {
            debug!("no studio.toml found, using defaults");
            Ok(StudioConfig::default())
        }
    }
}

/// Load configuration from a specific file path.
pub fn load_config_file(path: &Path) -> Result<StudioConfig, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let contents = fs::read_to_string(path)?;
    let config: StudioConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values. Grid overrides are
/// not validated here; invalid shapes surface as `InvalidGridShape` where
/// they are used.
pub fn merge_cli_overrides(config: &mut StudioConfig, overrides: &CliOverrides) {
    if let Some(rows) = overrides.rows {
        config.grid.rows = rows;
    }
    if let Some(cols) = overrides.cols {
        config.grid.cols = cols;
    }
    if let Some(scale) = overrides.scale {
        config.preview.scale = scale;
    }
    if let Some(viewport) = overrides.viewport {
        config.preview.viewport = viewport;
    }
    if let Some(ref level) = overrides.log_level {
        config.logging.level = level.clone();
    }
}
