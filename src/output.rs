//! PNG output and frame file naming

use image::imageops::FilterType;
use image::RgbaImage;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::CompositeImage;

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Save an RGBA image to a PNG file, creating parent directories as needed.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    ensure_parent_dir(path)?;
    image.save(path)?;
    Ok(())
}

pub(crate) fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Scale image by integer factor using nearest-neighbor interpolation.
///
/// Keeps pixel art edges crisp. A factor of 0 or 1 returns the image unchanged.
pub fn scale_image(image: RgbaImage, factor: u32) -> RgbaImage {
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    image::imageops::resize(&image, w * factor, h * factor, FilterType::Nearest)
}

/// Path for the `index`-th frame extracted from a sheet.
///
/// | stem | index | result |
/// |------|-------|--------|
/// | `knight` | 0 | `dir/knight_00.png` |
/// | `knight` | 11 | `dir/knight_11.png` |
/// | `knight` | 120 | `dir/knight_120.png` |
pub fn frame_output_path(dir: &Path, stem: &str, index: u32) -> PathBuf {
    dir.join(format!("{}_{:02}.png", stem, index))
}

/// File stem used for derived outputs, `sheet` for data URIs and remote images.
pub fn output_stem(source: &CompositeImage) -> String {
    source
        .local_path()
        .and_then(Path::file_stem)
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "sheet".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::tempdir;

    #[test]
    fn test_save_png_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("frame.png");
        let image = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));

        save_png(&image, &path).unwrap();
        assert!(path.exists());
        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(*loaded.get_pixel(1, 1), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_scale_image() {
        let mut image = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([255, 255, 255, 255]));

        let scaled = scale_image(image.clone(), 3);
        assert_eq!(scaled.dimensions(), (6, 3));
        assert_eq!(*scaled.get_pixel(2, 2), Rgba([0, 0, 0, 255]));
        assert_eq!(*scaled.get_pixel(3, 0), Rgba([255, 255, 255, 255]));

        assert_eq!(scale_image(image.clone(), 1), image);
        assert_eq!(scale_image(image.clone(), 0), image);
    }

    #[test]
    fn test_frame_output_path() {
        let dir = Path::new("out");
        assert_eq!(frame_output_path(dir, "knight", 0), PathBuf::from("out/knight_00.png"));
        assert_eq!(frame_output_path(dir, "knight", 11), PathBuf::from("out/knight_11.png"));
        assert_eq!(frame_output_path(dir, "knight", 120), PathBuf::from("out/knight_120.png"));
    }

    #[test]
    fn test_output_stem() {
        let stem = |s: &str| output_stem(&CompositeImage::from(s));
        assert_eq!(stem("sheets/knight_walk.png"), "knight_walk");
        assert_eq!(stem("file:///tmp/art/knight.png"), "knight");
        assert_eq!(stem("data:image/png;base64,AAAA"), "sheet");
        assert_eq!(stem("https://example.com/a.png"), "sheet");
        assert_eq!(stem(""), "sheet");
    }
}
