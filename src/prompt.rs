//! Generation requests for the image model
//!
//! The studio talks to a generative image service in two steps: an idea is
//! first expanded into a detailed visual description, then that description is
//! wrapped with the grid requirement and sent for image generation. This
//! module only builds those requests; the service call lives elsewhere.

use serde::Serialize;

use crate::models::{AspectRatio, GridShape};

/// Instruction asking a text model to turn a short idea into a visual prompt.
///
/// Grid numbers are deliberately left out of the refined text; they are added
/// by [`sheet_prompt`].
pub fn refine_instruction(idea: &str) -> String {
    format!(
        "Transform this simple sprite idea into a highly detailed visual prompt for an image \
         generator: \"{}\". Focus on character traits, color palette, and clear distinct \
         animation frames. DO NOT mention specific grid numbers, as those will be appended \
         separately. Keep it focused on the visual style.",
        idea.trim()
    )
}

/// Image prompt requiring a strict `rows x cols` sheet layout.
///
/// # Examples
///
/// ```
/// use spritestudio::models::GridShape;
/// use spritestudio::prompt::sheet_prompt;
///
/// let prompt = sheet_prompt("a knight walking", GridShape::new(2, 4));
/// assert!(prompt.contains("2 rows and 4 columns"));
/// assert!(prompt.contains("Total frames: 8."));
/// ```
pub fn sheet_prompt(description: &str, shape: GridShape) -> String {
    format!(
        "Create a professional game asset sprite sheet for: {}.\n\
         REQUIREMENT: The sprite sheet MUST be organized into a strict grid of {} rows and {} columns.\n\
         Total frames: {}.\n\
         Background: Solid white.\n\
         Style: Professional 2D game asset, pixel art or clean vector.\n\
         Ensure each frame is centered within its grid cell.",
        description.trim(),
        shape.rows,
        shape.cols,
        shape.total_frames()
    )
}

/// Everything the image service needs for one sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub rows: u32,
    pub cols: u32,
    pub aspect_ratio: AspectRatio,
}

impl GenerationRequest {
    pub fn new(description: &str, shape: GridShape, aspect_ratio: AspectRatio) -> Self {
        Self {
            prompt: sheet_prompt(description, shape),
            rows: shape.rows,
            cols: shape.cols,
            aspect_ratio,
        }
    }

    pub fn shape(&self) -> GridShape {
        GridShape::new(self.rows, self.cols)
    }
}
