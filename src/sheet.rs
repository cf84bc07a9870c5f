//! Sprite sheet pixels - loading, per-cell rectangles, splitting and grid overlay
//!
//! The sheet is trusted to be an exact `rows x cols` grid of equal cells; no
//! frame boundary detection happens here. When the pixel size does not divide
//! evenly, the leftover columns/rows at the right and bottom edges belong to
//! no cell.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{Rgba, RgbaImage};
use thiserror::Error;
use tracing::debug;

use crate::grid::{overlay_cells, GridError};
use crate::models::{CellPosition, CompositeImage, GridShape};

/// Errors loading or slicing a sheet
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SheetError {
    #[error(transparent)]
    Grid(#[from] GridError),
    /// Fewer pixels than cells along an axis
    #[error("sheet is {width}x{height} pixels, too small for a {shape} grid")]
    TooSmall {
        width: u32,
        height: u32,
        shape: GridShape,
    },
    #[error("failed to decode sheet image: {0}")]
    Image(#[from] image::ImageError),
    #[error("malformed data URI: {0}")]
    DataUri(String),
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("remote sheets are not fetched, download it first: {0}")]
    Remote(String),
}

/// Pixel rectangle of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Load the pixels behind a composite image reference.
///
/// Accepts plain paths, `file://` URIs and base64 `data:` URIs (the form the
/// generation service returns).
pub fn load_sheet(source: &CompositeImage) -> Result<RgbaImage, SheetError> {
    let uri = source.as_str();
    if source.is_data_uri() {
        let bytes = decode_data_uri(uri)?;
        return Ok(image::load_from_memory(&bytes)?.to_rgba8());
    }
    let path = source.local_path().ok_or_else(|| SheetError::Remote(uri.to_string()))?;
    debug!(path = %path.display(), "loading sheet");
    Ok(image::open(path)?.to_rgba8())
}

/// Payload bytes of a `data:[<mime>];base64,<payload>` URI.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>, SheetError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| SheetError::DataUri("missing 'data:' scheme".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| SheetError::DataUri("missing ',' before payload".to_string()))?;
    if !header.split(';').any(|part| part == "base64") {
        return Err(SheetError::DataUri("only base64 payloads are supported".to_string()));
    }
    Ok(STANDARD.decode(payload.trim())?)
}

/// Encode PNG bytes as a data URI the preview can use directly.
pub fn png_data_uri(png: &[u8]) -> CompositeImage {
    CompositeImage::new(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}

/// Pixel rectangle of `pos` in a `width x height` sheet.
///
/// # Examples
///
/// ```
/// use spritestudio::models::{CellPosition, GridShape};
/// use spritestudio::sheet::{cell_rect, CellRect};
///
/// let rect = cell_rect(CellPosition::new(1, 2), GridShape::new(2, 4), 128, 64);
/// assert_eq!(rect, CellRect { x: 64, y: 32, width: 32, height: 32 });
/// ```
pub fn cell_rect(pos: CellPosition, shape: GridShape, width: u32, height: u32) -> CellRect {
    let cell_w = width / shape.cols.max(1);
    let cell_h = height / shape.rows.max(1);
    CellRect {
        x: pos.col * cell_w,
        y: pos.row * cell_h,
        width: cell_w,
        height: cell_h,
    }
}

fn check_fits(sheet: &RgbaImage, shape: GridShape) -> Result<(), SheetError> {
    shape.validate()?;
    let (width, height) = sheet.dimensions();
    if width < shape.cols || height < shape.rows {
        return Err(SheetError::TooSmall { width, height, shape });
    }
    Ok(())
}

/// Cut a sheet into its frames, in row-major order.
pub fn split_sheet(sheet: &RgbaImage, shape: GridShape) -> Result<Vec<RgbaImage>, SheetError> {
    check_fits(sheet, shape)?;
    let (width, height) = sheet.dimensions();

    let frames = overlay_cells(shape)
        .map(|pos| {
            let rect = cell_rect(pos, shape, width, height);
            image::imageops::crop_imm(sheet, rect.x, rect.y, rect.width, rect.height).to_image()
        })
        .collect();
    Ok(frames)
}

/// Copy of `sheet` with a one-pixel outline drawn around every cell.
///
/// `color` is alpha-blended over the sheet so a translucent overlay keeps the
/// sprite visible underneath.
pub fn draw_grid_overlay(
    sheet: &RgbaImage,
    shape: GridShape,
    color: Rgba<u8>,
) -> Result<RgbaImage, SheetError> {
    check_fits(sheet, shape)?;
    let (width, height) = sheet.dimensions();
    let mut out = sheet.clone();

    for pos in overlay_cells(shape) {
        let rect = cell_rect(pos, shape, width, height);
        stroke_rect(&mut out, rect, color);
    }
    Ok(out)
}

fn stroke_rect(image: &mut RgbaImage, rect: CellRect, color: Rgba<u8>) {
    if rect.width == 0 || rect.height == 0 {
        return;
    }
    let right = rect.x + rect.width - 1;
    let bottom = rect.y + rect.height - 1;

    for x in rect.x..=right {
        blend_pixel(image, x, rect.y, color);
        if bottom != rect.y {
            blend_pixel(image, x, bottom, color);
        }
    }
    // Corners are already covered by the horizontal edges
    for y in (rect.y + 1)..bottom {
        blend_pixel(image, rect.x, y, color);
        if right != rect.x {
            blend_pixel(image, right, y, color);
        }
    }
}

fn blend_pixel(image: &mut RgbaImage, x: u32, y: u32, color: Rgba<u8>) {
    let under = *image.get_pixel(x, y);
    image.put_pixel(x, y, overlay_over(color, under));
}

/// Paint a translucent overlay color over a sheet pixel (source-over),
/// in integer arithmetic with alphas scaled to 0..=255.
fn overlay_over(color: Rgba<u8>, under: Rgba<u8>) -> Rgba<u8> {
    let top_a = u32::from(color[3]);
    let under_a = u32::from(under[3]);
    let rest = 255 - top_a;
    // Output alpha times 255
    let coverage = top_a * 255 + under_a * rest;
    if coverage == 0 {
        return Rgba([0, 0, 0, 0]);
    }

    let mix = |top: u8, bottom: u8| -> u8 {
        let weighted = u32::from(top) * top_a * 255 + u32::from(bottom) * under_a * rest;
        ((weighted + coverage / 2) / coverage) as u8
    };

    Rgba([
        mix(color[0], under[0]),
        mix(color[1], under[1]),
        mix(color[2], under[2]),
        ((coverage + 127) / 255) as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    /// 2x2 grid of 3x3 solid cells: red, green / blue, white
    fn make_sheet() -> RgbaImage {
        let colors = [RED, GREEN, BLUE, WHITE];
        RgbaImage::from_fn(6, 6, |x, y| colors[((y / 3) * 2 + x / 3) as usize])
    }

    fn encode_png(image: &RgbaImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png).unwrap();
        bytes
    }

    #[test]
    fn test_cell_rect_ignores_remainder_pixels() {
        let shape = GridShape::new(2, 3);
        let rect = cell_rect(CellPosition::new(1, 2), shape, 100, 50);
        assert_eq!(rect, CellRect { x: 66, y: 25, width: 33, height: 25 });
    }

    #[test]
    fn test_split_sheet_row_major() {
        let frames = split_sheet(&make_sheet(), GridShape::new(2, 2)).unwrap();
        assert_eq!(frames.len(), 4);
        assert!(frames.iter().all(|f| f.dimensions() == (3, 3)));
        assert_eq!(*frames[0].get_pixel(1, 1), RED);
        assert_eq!(*frames[1].get_pixel(1, 1), GREEN);
        assert_eq!(*frames[2].get_pixel(0, 0), BLUE);
        assert_eq!(*frames[3].get_pixel(2, 2), WHITE);
    }

    #[test]
    fn test_split_single_cell_is_whole_sheet() {
        let sheet = make_sheet();
        let frames = split_sheet(&sheet, GridShape::new(1, 1)).unwrap();
        assert_eq!(frames, vec![sheet]);
    }

    #[test]
    fn test_split_rejects_invalid_and_oversized_grids() {
        let sheet = make_sheet();
        assert!(matches!(
            split_sheet(&sheet, GridShape::new(0, 2)),
            Err(SheetError::Grid(GridError::InvalidGridShape { .. }))
        ));
        assert!(matches!(
            split_sheet(&sheet, GridShape::new(2, 7)),
            Err(SheetError::TooSmall { width: 6, height: 6, .. })
        ));
    }

    #[test]
    fn test_overlay_outlines_every_cell() {
        let black = Rgba([0, 0, 0, 255]);
        let out = draw_grid_overlay(&make_sheet(), GridShape::new(2, 2), black).unwrap();

        // Cell borders
        assert_eq!(*out.get_pixel(0, 0), black);
        assert_eq!(*out.get_pixel(2, 1), black);
        assert_eq!(*out.get_pixel(3, 0), black);
        assert_eq!(*out.get_pixel(5, 5), black);
        // Cell centres untouched
        assert_eq!(*out.get_pixel(1, 1), RED);
        assert_eq!(*out.get_pixel(4, 1), GREEN);
        assert_eq!(*out.get_pixel(1, 4), BLUE);
        assert_eq!(*out.get_pixel(4, 4), WHITE);
    }

    #[test]
    fn test_overlay_blends_translucent_color() {
        let half_black = Rgba([0, 0, 0, 128]);
        let out = draw_grid_overlay(&make_sheet(), GridShape::new(1, 1), half_black).unwrap();
        let px = out.get_pixel(0, 0);
        assert_eq!(px[3], 255);
        assert!(px[0] > 100 && px[0] < 150);
    }

    #[test]
    fn test_overlay_over() {
        assert_eq!(overlay_over(RED, Rgba([0, 0, 0, 0])), RED);
        assert_eq!(overlay_over(Rgba([0, 0, 0, 0]), BLUE), BLUE);
        assert_eq!(overlay_over(Rgba([0, 0, 0, 0]), Rgba([0, 0, 0, 0])), Rgba([0, 0, 0, 0]));
        assert_eq!(overlay_over(RED, BLUE), RED);
    }

    #[test]
    fn test_overlay_over_half_transparent_on_opaque() {
        let half_white = Rgba([255, 255, 255, 128]);
        assert_eq!(overlay_over(half_white, Rgba([0, 0, 0, 255])), Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn test_load_sheet_from_data_uri() {
        let sheet = make_sheet();
        let uri = png_data_uri(&encode_png(&sheet));
        assert!(uri.as_str().starts_with("data:image/png;base64,"));
        assert_eq!(load_sheet(&uri).unwrap(), sheet);
    }

    #[test]
    fn test_load_sheet_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.png");
        make_sheet().save(&path).unwrap();

        let plain = CompositeImage::new(path.display().to_string());
        assert_eq!(load_sheet(&plain).unwrap().dimensions(), (6, 6));
        let file_uri = CompositeImage::new(format!("file://{}", path.display()));
        assert_eq!(load_sheet(&file_uri).unwrap().dimensions(), (6, 6));
    }

    #[test]
    fn test_load_sheet_rejects_remote_and_bad_data() {
        assert!(matches!(
            load_sheet(&"https://example.com/a.png".into()),
            Err(SheetError::Remote(_))
        ));
        assert!(matches!(
            load_sheet(&"data:image/png,rawbytes".into()),
            Err(SheetError::DataUri(_))
        ));
        assert!(matches!(
            load_sheet(&"data:image/png;base64,@@@".into()),
            Err(SheetError::Base64(_))
        ));
        assert!(matches!(load_sheet(&"data:image/png;base64".into()), Err(SheetError::DataUri(_))));
    }
}
