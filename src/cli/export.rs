//! Overlay, split and gif commands

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use image::{Rgba, RgbaImage};

use crate::gif::export_flipbook_gif;
use crate::models::{CompositeImage, GridShape};
use crate::output::{frame_output_path, output_stem, save_png, scale_image};
use crate::sheet::{draw_grid_overlay, load_sheet, split_sheet, SheetError};

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

fn open_sheet(sheet: &str) -> Result<RgbaImage, ExitCode> {
    load_sheet(&CompositeImage::new(sheet)).map_err(|e| {
        eprintln!("Error: Cannot load sheet '{}': {}", CompositeImage::new(sheet), e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })
}

fn sheet_error(e: SheetError) -> ExitCode {
    eprintln!("Error: {}", e);
    match e {
        SheetError::Grid(_) | SheetError::TooSmall { .. } => ExitCode::from(EXIT_INVALID_ARGS),
        _ => ExitCode::from(EXIT_ERROR),
    }
}

/// Default output path next to the sheet, or in the working directory for data URIs
fn default_output(sheet: &str, suffix: &str) -> PathBuf {
    let source = CompositeImage::new(sheet);
    let name = format!("{}{}", output_stem(&source), suffix);
    match source.local_path().and_then(Path::parent) {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

/// Execute the overlay command
pub fn run_overlay(sheet: &str, shape: GridShape, output: Option<&Path>, color: [u8; 4]) -> ExitCode {
    let image = match open_sheet(sheet) {
        Ok(image) => image,
        Err(code) => return code,
    };
    let annotated = match draw_grid_overlay(&image, shape, Rgba(color)) {
        Ok(annotated) => annotated,
        Err(e) => return sheet_error(e),
    };

    let path = output.map(Path::to_path_buf).unwrap_or_else(|| default_output(sheet, "_grid.png"));
    if let Err(e) = save_png(&annotated, &path) {
        eprintln!("Error: Failed to save '{}': {}", path.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }
    println!("Saved: {} ({} cells)", path.display(), shape.total_frames());
    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the split command
pub fn run_split(sheet: &str, shape: GridShape, output: Option<&Path>, scale: u32) -> ExitCode {
    let image = match open_sheet(sheet) {
        Ok(image) => image,
        Err(code) => return code,
    };
    let frames = match split_sheet(&image, shape) {
        Ok(frames) => frames,
        Err(e) => return sheet_error(e),
    };

    let dir = output.unwrap_or_else(|| Path::new("."));
    let stem = output_stem(&CompositeImage::new(sheet));
    for (index, frame) in frames.into_iter().enumerate() {
        let path = frame_output_path(dir, &stem, index as u32);
        if let Err(e) = save_png(&scale_image(frame, scale), &path) {
            eprintln!("Error: Failed to save '{}': {}", path.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
        println!("Saved: {}", path.display());
    }
    ExitCode::from(EXIT_SUCCESS)
}

/// Execute the gif command
pub fn run_gif(sheet: &str, shape: GridShape, output: Option<&Path>, scale: u32) -> ExitCode {
    let image = match open_sheet(sheet) {
        Ok(image) => image,
        Err(code) => return code,
    };

    let path = output.map(Path::to_path_buf).unwrap_or_else(|| default_output(sheet, ".gif"));
    match export_flipbook_gif(&image, shape, scale, &path) {
        Ok(count) => {
            println!("Saved: {} ({} frames)", path.display(), count);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(crate::gif::ExportError::Sheet(e)) => sheet_error(e),
        Err(e) => {
            eprintln!("Error: Failed to save '{}': {}", path.display(), e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
