//! Preview and style commands

use std::process::ExitCode;

use crate::models::{CompositeImage, GridShape};
use crate::playback::{FrameUpdate, PlaybackDriver, PlaybackError};
use crate::style::{compute_render_style_in, format_percent, RenderStyle, Viewport};

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the preview command - play the flipbook for `ticks` frames
pub fn run_preview(sheet: &str, shape: GridShape, ticks: u32, json: bool) -> ExitCode {
    let rt = match tokio::runtime::Builder::new_current_thread().enable_time().build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: Failed to create async runtime: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match rt.block_on(play(CompositeImage::new(sheet), shape, ticks, json)) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

async fn play(
    image: CompositeImage,
    shape: GridShape,
    ticks: u32,
    json: bool,
) -> Result<(), PlaybackError> {
    let driver = PlaybackDriver::new(shape, Some(image))?;
    let mut updates = driver.subscribe();

    let first = updates.borrow_and_update().clone();
    print_update(&first, json);

    for _ in 0..ticks {
        if updates.changed().await.is_err() {
            break;
        }
        let update = updates.borrow_and_update().clone();
        print_update(&update, json);
    }

    driver.dispose();
    Ok(())
}

fn print_update(update: &FrameUpdate, json: bool) {
    if json {
        match serde_json::to_string(update) {
            Ok(line) => println!("{}", line),
            Err(e) => eprintln!("Error: {}", e),
        }
        return;
    }

    match &update.coordinates {
        Some(coords) => println!(
            "frame {}/{}  background-position: {} {}",
            update.frame + 1,
            update.total_frames,
            format_percent(coords.position_x_percent),
            format_percent(coords.position_y_percent)
        ),
        None => println!("frame {}/{}  ({:?})", update.frame + 1, update.total_frames, update.status),
    }
}

/// Execute the style command - print CSS (or JSON) for one or all frames
pub fn run_style(
    sheet: &str,
    shape: GridShape,
    frame: u32,
    all: bool,
    viewport: u32,
    json: bool,
) -> ExitCode {
    let image = CompositeImage::new(sheet);
    let viewport = Viewport::square(viewport);
    let frames: Vec<u32> = if all { (0..shape.total_frames()).collect() } else { vec![frame] };

    let mut styles: Vec<(u32, RenderStyle)> = Vec::with_capacity(frames.len());
    for index in frames {
        match compute_render_style_in(viewport, index, shape, &image) {
            Ok(style) => styles.push((index, style)),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_INVALID_ARGS);
            }
        }
    }

    if json {
        let values: Vec<&RenderStyle> = styles.iter().map(|(_, s)| s).collect();
        let rendered = if all {
            serde_json::to_string_pretty(&values)
        } else {
            serde_json::to_string_pretty(values[0])
        };
        match rendered {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else if all {
        for (index, style) in &styles {
            println!(".frame-{} {{ {} }}", index, style.to_css());
        }
    } else {
        println!("{}", styles[0].1.to_css());
    }

    ExitCode::from(EXIT_SUCCESS)
}
