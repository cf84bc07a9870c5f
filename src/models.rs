//! Data models shared by the mapper, the playback driver and the exporters

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::grid::GridError;

/// The (rows, columns) partition of a sprite sheet.
///
/// Cells are numbered in row-major order: cell `i` sits at
/// `row = i / cols`, `col = i % cols`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: u32,
    pub cols: u32,
}

impl GridShape {
    /// Build a shape without validating it.
    ///
    /// Use [`GridShape::checked`] for values that come from user input.
    pub const fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    /// Build a shape from untrusted signed input.
    ///
    /// # Examples
    ///
    /// ```
    /// use spritestudio::models::GridShape;
    ///
    /// let shape = GridShape::checked(2, 4).unwrap();
    /// assert_eq!(shape.total_frames(), 8);
    /// assert!(GridShape::checked(0, 4).is_err());
    /// assert!(GridShape::checked(-1, 4).is_err());
    /// ```
    pub fn checked(rows: i64, cols: i64) -> Result<Self, GridError> {
        let invalid = GridError::InvalidGridShape { rows, cols };
        let rows = u32::try_from(rows).map_err(|_| invalid)?;
        let cols = u32::try_from(cols).map_err(|_| invalid)?;
        let shape = Self { rows, cols };
        shape.validate()?;
        Ok(shape)
    }

    /// Check that both axes are positive and the cell count fits in a `u32`.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.rows == 0 || self.cols == 0 || self.rows.checked_mul(self.cols).is_none() {
            return Err(GridError::InvalidGridShape {
                rows: i64::from(self.rows),
                cols: i64::from(self.cols),
            });
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Number of cells (frames) in the grid.
    ///
    /// Saturates instead of overflowing; a degenerate shape yields 0.
    pub fn total_frames(&self) -> u32 {
        self.rows.saturating_mul(self.cols)
    }
}

impl Default for GridShape {
    fn default() -> Self {
        Self { rows: 2, cols: 4 }
    }
}

impl fmt::Display for GridShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Opaque reference to a composite sprite sheet image.
///
/// May be a file path, a remote URL or a `data:` URI; the mapper and the
/// playback driver never look inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompositeImage(String);

impl CompositeImage {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the reference carries its pixels inline (`data:` scheme).
    pub fn is_data_uri(&self) -> bool {
        self.0.starts_with("data:")
    }

    /// Filesystem path behind a plain path or `file://` URI.
    ///
    /// `None` for data URIs and remote URLs.
    pub fn local_path(&self) -> Option<&Path> {
        if self.is_data_uri() || self.0.starts_with("http://") || self.0.starts_with("https://") {
            return None;
        }
        Some(Path::new(self.0.strip_prefix("file://").unwrap_or(&self.0)))
    }
}

impl fmt::Display for CompositeImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Data URIs can be megabytes long
        match self.0.char_indices().nth(48) {
            Some((cut, _)) if self.is_data_uri() => write!(f, "{}...", &self.0[..cut]),
            _ => f.write_str(&self.0),
        }
    }
}

impl From<&str> for CompositeImage {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CompositeImage {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Row/column of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellPosition {
    pub row: u32,
    pub col: u32,
}

impl CellPosition {
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Row-major index of this cell within `shape`, `None` if it overflows a `u32`.
    pub fn linear_index(&self, shape: GridShape) -> Option<u32> {
        self.row.checked_mul(shape.cols)?.checked_add(self.col)
    }
}

/// CSS-style background geometry for painting one cell inside a viewport.
///
/// Derived from a [`GridShape`] and a frame index every tick, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderCoordinates {
    pub width_percent: f64,
    pub height_percent: f64,
    pub position_x_percent: f64,
    pub position_y_percent: f64,
}

/// Aspect ratio requested from the image generation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "4:3")]
    Standard,
    #[serde(rename = "16:9")]
    Wide,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Standard => "4:3",
            AspectRatio::Wide => "16:9",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1:1" => Ok(AspectRatio::Square),
            "4:3" => Ok(AspectRatio::Standard),
            "16:9" => Ok(AspectRatio::Wide),
            other => Err(format!("unsupported aspect ratio '{}', expected 1:1, 4:3 or 16:9", other)),
        }
    }
}
