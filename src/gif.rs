//! GIF export of the flipbook animation

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::models::GridShape;
use crate::output::{ensure_parent_dir, scale_image, OutputError};
use crate::playback::FRAME_PERIOD;
use crate::sheet::{split_sheet, SheetError};

/// Render a sequence of frames as an animated GIF.
///
/// GIF delays are stored in centiseconds, so `duration_ms` is rounded down
/// to a multiple of 10 (minimum 10).
pub fn render_gif(
    frames: &[RgbaImage],
    duration_ms: u32,
    loop_anim: bool,
    path: &Path,
) -> Result<(), OutputError> {
    if frames.is_empty() {
        return Ok(());
    }
    ensure_parent_dir(path)?;

    let file = File::create(path)?;
    let mut encoder = GifEncoder::new(BufWriter::new(file));
    encoder.set_repeat(if loop_anim {
        Repeat::Infinite
    } else {
        Repeat::Finite(0)
    })?;

    let delay_ms = (duration_ms / 10).max(1) * 10;
    for image in frames {
        let frame = Frame::from_parts(image.clone(), 0, 0, Delay::from_numer_denom_ms(delay_ms, 1));
        encoder.encode_frame(frame)?;
    }
    Ok(())
}

/// Errors exporting a sheet as a GIF
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Sheet(#[from] SheetError),
    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Write the looping flipbook of `sheet` as the preview plays it:
/// one cell per frame, row-major, at the playback cadence.
///
/// Returns the number of frames written.
pub fn export_flipbook_gif(
    sheet: &RgbaImage,
    shape: GridShape,
    scale: u32,
    path: &Path,
) -> Result<usize, ExportError> {
    let frames: Vec<RgbaImage> =
        split_sheet(sheet, shape)?.into_iter().map(|f| scale_image(f, scale)).collect();
    let duration_ms = FRAME_PERIOD.as_millis() as u32;
    render_gif(&frames, duration_ms, true, path)?;
    Ok(frames.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifDecoder;
    use image::{AnimationDecoder, Rgba};
    use tempfile::tempdir;

    fn solid(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
        RgbaImage::from_pixel(width, height, color)
    }

    fn decode_frames(path: &Path) -> Vec<Frame> {
        let file = File::open(path).unwrap();
        let decoder = GifDecoder::new(std::io::BufReader::new(file)).unwrap();
        decoder.into_frames().collect_frames().unwrap()
    }

    #[test]
    fn test_render_gif_creates_valid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.gif");
        let frames = vec![
            solid(2, 2, Rgba([255, 0, 0, 255])),
            solid(2, 2, Rgba([0, 255, 0, 255])),
        ];

        render_gif(&frames, 100, true, &path).unwrap();
        assert!(image::open(&path).is_ok());
        assert_eq!(decode_frames(&path).len(), 2);
    }

    #[test]
    fn test_render_gif_empty_frames_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.gif");
        render_gif(&[], 100, true, &path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_export_flipbook_uses_playback_cadence() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("walk.gif");
        let colors = [
            Rgba([255, 0, 0, 255]),
            Rgba([0, 255, 0, 255]),
            Rgba([0, 0, 255, 255]),
            Rgba([255, 255, 0, 255]),
        ];
        let sheet = RgbaImage::from_fn(8, 2, |x, _| colors[(x / 2) as usize]);

        let written = export_flipbook_gif(&sheet, GridShape::new(1, 4), 2, &path).unwrap();
        assert_eq!(written, 4);

        let frames = decode_frames(&path);
        assert_eq!(frames.len(), 4);
        for frame in &frames {
            assert_eq!(frame.buffer().dimensions(), (4, 4));
            let (numer, denom) = frame.delay().numer_denom_ms();
            assert_eq!(numer / denom, 100);
        }
        // GIF quantizes colors, so only check the dominant channel
        let px = frames[2].buffer().get_pixel(0, 0);
        assert!(px[2] > 200 && px[0] < 60 && px[1] < 60);
    }

    #[test]
    fn test_export_flipbook_rejects_invalid_grid() {
        let dir = tempdir().unwrap();
        let sheet = solid(4, 4, Rgba([0, 0, 0, 255]));
        let result = export_flipbook_gif(&sheet, GridShape::new(0, 1), 1, &dir.path().join("x.gif"));
        assert!(matches!(result, Err(ExportError::Sheet(_))));
    }
}
