//! Text rasterization

use log::{debug, warn};
use ndarray::Array2;
use crate::config::TextConfig;
use super::{font, LuminanceField};

/// Draw the message centered in each of `config.lines` horizontal bands.
///
/// The result is in canvas orientation (first row at the top).
pub fn render_text_field(config: &TextConfig, width: usize, height: usize) -> LuminanceField {
    let mut canvas = Array2::<f32>::zeros((height, width));
    let (text_w, text_h) = font::measure(&config.message, config.scale);

    if text_w as usize > width {
        warn!("Text is {} px wide but the canvas only has {} columns, clipping", text_w, width);
    }

    let lines = config.lines.max(1);
    let band = height / lines;
    if (text_h as usize) > band {
        warn!("Text is {} px tall but each of the {} bands is {} px, lines will overlap", text_h, lines, band);
    }

    let x = (width as i64 - text_w as i64) / 2;
    for line in 0..lines {
        let y = (line * band) as i64 + (band as i64 - text_h as i64) / 2;
        font::render(&config.message, x, y, config.scale, |px, py| {
            if px >= 0 && py >= 0 && (px as usize) < width && (py as usize) < height {
                canvas[[py as usize, px as usize]] = 1.0;
            }
        });
    }

    debug!("Rendered {:?} ({}x{} px) {} times on a {}x{} canvas",
           config.message, text_w, text_h, lines, width, height);

    LuminanceField { data: canvas }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_config(message: &str, lines: usize, scale: u32) -> TextConfig {
        TextConfig { message: message.to_string(), lines, scale }
    }

    fn lit_bounds(field: &LuminanceField) -> Option<(usize, usize, usize, usize)> {
        let mut bounds: Option<(usize, usize, usize, usize)> = None;
        for ((y, x), &v) in field.data().indexed_iter() {
            if v > 0.0 {
                bounds = Some(match bounds {
                    None => (y, y, x, x),
                    Some((y0, y1, x0, x1)) => (y0.min(y), y1.max(y), x0.min(x), x1.max(x)),
                });
            }
        }
        bounds
    }

    #[test]
    fn test_text_is_centered() {
        let field = render_text_field(&text_config("HI", 1, 2), 100, 40);
        let (y0, y1, x0, x1) = lit_bounds(&field).unwrap();
        // "HI" at scale 2 is 22x14 starting at column 39; the I stem ends at 58
        assert_eq!((x0, x1), (39, 58));
        assert_eq!((y0, y1), (13, 26));
    }

    #[test]
    fn test_text_repeats_in_each_band() {
        let field = render_text_field(&text_config("I", 4, 1), 20, 40);
        for band in 0..4 {
            let lit = (band * 10..(band + 1) * 10)
                .filter(|&y| field.row(y).iter().any(|&v| v > 0.0))
                .count();
            assert_eq!(lit, 7, "band {}", band);
        }
    }

    #[test]
    fn test_values_are_binary() {
        let field = render_text_field(&TextConfig::default(), 1200, 400);
        assert!(field.data().iter().all(|&v| v == 0.0 || v == 1.0));
        assert!(!field.is_silent());
    }

    #[test]
    fn test_wide_text_is_clipped() {
        let field = render_text_field(&text_config("WWWWWWWWWW", 1, 4), 50, 40);
        assert_eq!(field.width(), 50);
        assert!(!field.is_silent());
    }
}
