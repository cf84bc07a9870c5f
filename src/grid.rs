//! Grid coordinate mapping - frame index to cell position and background geometry
//!
//! Everything in this module is pure: the same `(frame, shape)` always maps to
//! the same cell and the same CSS-style geometry. A composite sheet is treated
//! as `rows * cols` equal cells laid out row-major.

use serde::Serialize;
use thiserror::Error;

use crate::models::{CellPosition, GridShape, RenderCoordinates};

/// Contract violations reported by the mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum GridError {
    /// Rows or columns are not positive (or their product does not fit a `u32`)
    #[error("invalid grid shape {rows}x{cols}: rows and columns must be positive integers")]
    InvalidGridShape { rows: i64, cols: i64 },
    /// Frame index outside `[0, total)`
    #[error("frame {frame} is out of range for a {total}-frame grid")]
    OutOfRange { frame: u32, total: u32 },
}

/// Map a linear frame index to its grid cell.
///
/// Fails with [`GridError::OutOfRange`] when `frame >= rows * cols`; callers
/// that step frames themselves should wrap modulo the frame count first.
///
/// # Examples
///
/// ```
/// use spritestudio::grid::cell_position;
/// use spritestudio::models::{CellPosition, GridShape};
///
/// let shape = GridShape::new(2, 4);
/// assert_eq!(cell_position(5, shape).unwrap(), CellPosition::new(1, 1));
/// assert!(cell_position(8, shape).is_err());
/// ```
pub fn cell_position(frame: u32, shape: GridShape) -> Result<CellPosition, GridError> {
    shape.validate()?;
    let total = shape.total_frames();
    if frame >= total {
        return Err(GridError::OutOfRange { frame, total });
    }
    Ok(CellPosition {
        row: frame / shape.cols,
        col: frame % shape.cols,
    })
}

/// Background size/position that shows exactly one cell inside the viewport.
///
/// The sheet is stretched to `cols*100%` by `rows*100%` so a single cell fills
/// the viewport. Positions follow the CSS percentage model, where `0%` aligns
/// the first cell and `100%` the last, so the divisor is `n - 1`, clamped to 1
/// for single-row or single-column sheets (position then stays at `0%`).
pub fn background_geometry(pos: CellPosition, shape: GridShape) -> RenderCoordinates {
    let x_steps = shape.cols.saturating_sub(1).max(1);
    let y_steps = shape.rows.saturating_sub(1).max(1);

    RenderCoordinates {
        width_percent: f64::from(shape.cols) * 100.0,
        height_percent: f64::from(shape.rows) * 100.0,
        position_x_percent: f64::from(pos.col) / f64::from(x_steps) * 100.0,
        position_y_percent: f64::from(pos.row) / f64::from(y_steps) * 100.0,
    }
}

/// Cell lookup followed by geometry, as needed once per playback tick.
pub fn render_coordinates(frame: u32, shape: GridShape) -> Result<RenderCoordinates, GridError> {
    let pos = cell_position(frame, shape)?;
    Ok(background_geometry(pos, shape))
}

/// Number of outline boxes the editing overlay draws.
pub fn overlay_cell_count(shape: GridShape) -> u32 {
    shape.total_frames()
}

/// Every cell of the grid in row-major order.
pub fn overlay_cells(shape: GridShape) -> impl Iterator<Item = CellPosition> {
    let cols = shape.cols;
    (0..shape.rows).flat_map(move |row| (0..cols).map(move |col| CellPosition { row, col }))
}
