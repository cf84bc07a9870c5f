//! Render style for painting one animation cell inside a fixed-size viewport

use serde::Serialize;

use crate::grid::{render_coordinates, GridError};
use crate::models::{CompositeImage, GridShape};

/// Default preview viewport edge, in logical pixels.
pub const VIEWPORT_SIZE: u32 = 128;

/// Size of the box one cell is painted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn square(size: u32) -> Self {
        Self { width: size, height: size }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::square(VIEWPORT_SIZE)
    }
}

/// Everything the view needs to show a single frame of the sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderStyle {
    pub display_width: u32,
    pub display_height: u32,
    pub background_image: CompositeImage,
    /// (x, y) background size in percent of the viewport
    pub background_size_percent: (f64, f64),
    /// (x, y) background position in CSS percentage semantics
    pub background_position_percent: (f64, f64),
}

impl RenderStyle {
    /// Render as CSS declarations for an element sized to the viewport.
    pub fn to_css(&self) -> String {
        let (size_x, size_y) = self.background_size_percent;
        let (pos_x, pos_y) = self.background_position_percent;
        format!(
            "width: {}px; height: {}px; background-image: url({}); background-size: {} {}; \
             background-position: {} {}; image-rendering: pixelated;",
            self.display_width,
            self.display_height,
            self.background_image.as_str(),
            format_percent(size_x),
            format_percent(size_y),
            format_percent(pos_x),
            format_percent(pos_y),
        )
    }
}

/// Style for `frame` of `image` in the default 128x128 viewport.
///
/// # Examples
///
/// ```
/// use spritestudio::models::{CompositeImage, GridShape};
/// use spritestudio::style::compute_render_style;
///
/// let style = compute_render_style(5, GridShape::new(2, 4), &CompositeImage::from("hero.png")).unwrap();
/// assert_eq!(style.background_size_percent, (400.0, 200.0));
/// assert!(style.to_css().contains("background-position: 33.3333% 100%"));
/// ```
pub fn compute_render_style(
    frame: u32,
    shape: GridShape,
    image: &CompositeImage,
) -> Result<RenderStyle, GridError> {
    compute_render_style_in(Viewport::default(), frame, shape, image)
}

/// Style for `frame` of `image` in an arbitrary viewport.
pub fn compute_render_style_in(
    viewport: Viewport,
    frame: u32,
    shape: GridShape,
    image: &CompositeImage,
) -> Result<RenderStyle, GridError> {
    let coords = render_coordinates(frame, shape)?;
    Ok(RenderStyle {
        display_width: viewport.width,
        display_height: viewport.height,
        background_image: image.clone(),
        background_size_percent: (coords.width_percent, coords.height_percent),
        background_position_percent: (coords.position_x_percent, coords.position_y_percent),
    })
}

/// Format a percentage with at most 4 decimals and no trailing zeros.
pub fn format_percent(value: f64) -> String {
    let mut text = format!("{:.4}", value);
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    if text == "-0" {
        text = "0".to_string();
    }
    format!("{}%", text)
}
