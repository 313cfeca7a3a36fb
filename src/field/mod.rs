//! Luminance Field
//!
//! The 2D intensity grid that gets turned into sound. Rows are frequency
//! bands, columns are time. Sources are rendered text or a decoded image.

pub mod font;
pub mod image;
pub mod text;

use ::image::GrayImage;
use ndarray::{Array2, ArrayView1, Axis};
use std::path::Path;
use crate::error::{SpectroglyphError, Result};

pub use self::image::load_image_field;
pub use self::text::render_text_field;

/// Where a field comes from
#[derive(Debug, Clone)]
pub enum FieldSource {
    Text(crate::config::TextConfig),
    Image(std::path::PathBuf),
}

impl FieldSource {
    /// Produce the canvas (first row at the top) at the given size
    pub fn render(&self, width: usize, height: usize) -> Result<LuminanceField> {
        match self {
            FieldSource::Text(config) => Ok(render_text_field(config, width, height)),
            FieldSource::Image(path) => load_image_field(path, width, height),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            FieldSource::Text(config) => format!("text {:?}", config.message),
            FieldSource::Image(path) => format!("image {}", path.display()),
        }
    }
}

/// Intensity grid with values in [0, 1], shape `(height, width)`
#[derive(Debug, Clone, PartialEq)]
pub struct LuminanceField {
    data: Array2<f32>,
}

impl LuminanceField {
    pub fn new(data: Array2<f32>) -> Result<Self> {
        if data.nrows() == 0 || data.ncols() == 0 {
            return Err(SpectroglyphError::synthesis("Field cannot be empty"));
        }
        if let Some(bad) = data.iter().find(|v| !(0.0..=1.0).contains(*v)) {
            return Err(SpectroglyphError::synthesis(format!(
                "Field intensity {} is outside [0, 1]", bad
            )));
        }
        Ok(Self { data })
    }

    pub fn zeros(height: usize, width: usize) -> Self {
        Self { data: Array2::zeros((height, width)) }
    }

    /// Convert an 8-bit grayscale image, top image row first
    pub fn from_gray_image(img: &GrayImage) -> Self {
        let (w, h) = img.dimensions();
        let data = Array2::from_shape_fn((h as usize, w as usize), |(y, x)| {
            img.get_pixel(x as u32, y as u32).0[0] as f32 / 255.0
        });
        Self { data }
    }

    pub fn to_gray_image(&self) -> GrayImage {
        GrayImage::from_fn(self.width() as u32, self.height() as u32, |x, y| {
            let v = self.data[[y as usize, x as usize]];
            ::image::Luma([(v * 255.0).round() as u8])
        })
    }

    /// Mirror top and bottom so row 0 becomes the lowest frequency
    pub fn flipped_vertically(&self) -> Self {
        let mut data = self.data.clone();
        data.invert_axis(Axis(0));
        Self { data: data.as_standard_layout().to_owned() }
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn row(&self, y: usize) -> ArrayView1<'_, f32> {
        self.data.row(y)
    }

    pub fn get(&self, y: usize, x: usize) -> f32 {
        self.data[[y, x]]
    }

    pub fn data(&self) -> &Array2<f32> {
        &self.data
    }

    /// Rows containing any non-zero intensity
    pub fn lit_rows(&self) -> usize {
        self.data.rows().into_iter().filter(|r| r.iter().any(|&v| v > 0.0)).count()
    }

    pub fn is_silent(&self) -> bool {
        self.data.iter().all(|&v| v == 0.0)
    }

    /// Save the field as a grayscale PNG
    pub fn save_preview<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.to_gray_image().save(path).map_err(|e| {
            SpectroglyphError::image(format!("Cannot save preview {}: {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(LuminanceField::new(array![[0.0, 1.5]]).is_err());
        assert!(LuminanceField::new(array![[0.0, f32::NAN]]).is_err());
        assert!(LuminanceField::new(Array2::zeros((0, 4))).is_err());
        assert!(LuminanceField::new(array![[0.0, 1.0], [0.5, 0.25]]).is_ok());
    }

    #[test]
    fn test_flip_vertical() {
        let field = LuminanceField::new(array![[1.0, 0.0], [0.0, 0.0], [0.0, 0.5]]).unwrap();
        let flipped = field.flipped_vertically();
        assert_eq!(flipped.get(0, 1), 0.5);
        assert_eq!(flipped.get(2, 0), 1.0);
        assert_eq!(flipped.flipped_vertically(), field);
    }

    #[test]
    fn test_gray_image_conversion() {
        let mut img = GrayImage::new(3, 2);
        img.put_pixel(2, 0, ::image::Luma([255]));
        img.put_pixel(0, 1, ::image::Luma([51]));

        let field = LuminanceField::from_gray_image(&img);
        assert_eq!((field.height(), field.width()), (2, 3));
        assert_eq!(field.get(0, 2), 1.0);
        assert!((field.get(1, 0) - 0.2).abs() < 1e-6);
        assert_eq!(field.to_gray_image(), img);
    }

    #[test]
    fn test_lit_rows_and_silence() {
        let mut field = LuminanceField::zeros(4, 5);
        assert!(field.is_silent());
        assert_eq!(field.lit_rows(), 0);

        field.data[[2, 3]] = 0.7;
        assert!(!field.is_silent());
        assert_eq!(field.lit_rows(), 1);
    }
}
