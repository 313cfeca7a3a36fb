//! Image loading

use std::path::Path;
use ::image::imageops::{self, FilterType};
use log::{debug, info};
use crate::error::{SpectroglyphError, Result};
use super::LuminanceField;

/// Decode an image, convert it to luminance and resize it to the canvas.
///
/// The result is in canvas orientation (first row at the top).
pub fn load_image_field<P: AsRef<Path>>(path: P, width: usize, height: usize) -> Result<LuminanceField> {
    let path = path.as_ref();

    let img = ::image::open(path)
        .map_err(|e| SpectroglyphError::image(format!("Cannot load image {}: {}", path.display(), e)))?;
    info!("Image loaded: {}x{} pixels", img.width(), img.height());

    let gray = img.to_luma8();
    let resized = imageops::resize(&gray, width as u32, height as u32, FilterType::Lanczos3);
    debug!("Resized to {}x{}", resized.width(), resized.height());

    Ok(LuminanceField::from_gray_image(&resized))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::image::{GrayImage, Luma, Rgb, RgbImage};
    use tempfile::TempDir;

    #[test]
    fn test_missing_file() {
        let err = load_image_field("/definitely/not/here.png", 10, 10).unwrap_err();
        assert!(matches!(err, SpectroglyphError::Image { .. }));
        assert!(err.to_string().contains("here.png"));
    }

    #[test]
    fn test_undecodable_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("junk.png");
        std::fs::write(&path, b"this is not a png").unwrap();
        assert!(load_image_field(&path, 10, 10).is_err());
    }

    #[test]
    fn test_resize_and_luminance() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("half.png");

        // Top half white, bottom half black
        let img = RgbImage::from_fn(16, 16, |_, y| if y < 8 { Rgb([255, 255, 255]) } else { Rgb([0, 0, 0]) });
        img.save(&path).unwrap();

        let field = load_image_field(&path, 40, 20).unwrap();
        assert_eq!((field.height(), field.width()), (20, 40));
        assert!(field.get(2, 20) > 0.95);
        assert!(field.get(17, 20) < 0.05);
    }

    #[test]
    fn test_grayscale_input() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gray.png");
        GrayImage::from_pixel(8, 8, Luma([128])).save(&path).unwrap();

        let field = load_image_field(&path, 8, 8).unwrap();
        assert!((field.get(4, 4) - 128.0 / 255.0).abs() < 0.01);
    }
}
