//! SpriteStudio - sprite sheet grid mapping and flipbook preview
//!
//! This library provides functionality to:
//! - Map a frame index of a `rows x cols` sprite sheet to its cell and to the
//!   CSS background geometry that shows that cell in a fixed viewport
//! - Drive a restartable, pausable 10 fps flipbook over a sheet
//! - Load sheets from paths or data URIs, split them into frames, draw the
//!   grid overlay and export the animation as GIF
//! - Build generation requests for the image model

pub mod cli;
pub mod config;
pub mod gif;
pub mod grid;
pub mod logging;
pub mod models;
pub mod output;
pub mod playback;
pub mod prompt;
pub mod sheet;
pub mod style;

pub use grid::{background_geometry, cell_position, overlay_cell_count, GridError};
pub use models::{CellPosition, CompositeImage, GridShape, RenderCoordinates};
pub use playback::{PlaybackDriver, PlaybackStatus, FRAME_PERIOD};
pub use style::{compute_render_style, RenderStyle};
