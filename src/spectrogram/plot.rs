//! Spectrogram figure rendering and PNG export

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use image::{Rgb, RgbImage};
use log::{debug, info};
use crate::config::SpectrogramConfig;
use crate::error::{SpectroglyphError, Result};
use crate::field::font;
use super::{Colormap, Spectrogram};

const INCH_PER_METER: f64 = 1.0 / 0.0254;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

#[derive(Debug, Clone)]
pub struct PlotOptions {
    pub title: String,
    pub colormap: Colormap,
    pub dpi: u32,
    /// Figure size in pixels
    pub width: u32,
    pub height: u32,
    pub dynamic_range_db: f64,
    pub colorbar: bool,
}

impl PlotOptions {
    pub fn from_config<S: Into<String>>(config: &SpectrogramConfig, title: S) -> Self {
        let (width, height) = config.pixel_size();
        Self {
            title: title.into(),
            colormap: config.colormap,
            dpi: config.dpi,
            width,
            height,
            dynamic_range_db: config.dynamic_range_db,
            colorbar: false,
        }
    }

    pub fn with_colorbar(mut self, colorbar: bool) -> Self {
        self.colorbar = colorbar;
        self
    }

    /// Font pixel size for 10pt text
    fn font_scale(&self) -> u32 {
        ((self.dpi as f64 * 10.0 / 72.0) / font::GLYPH_HEIGHT as f64).round().max(1.0) as u32
    }

    fn line_width(&self) -> u32 {
        (self.dpi / 100).max(1)
    }
}

/// Pixel rectangle, `x1` and `y1` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rect {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl Rect {
    fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    fn height(&self) -> u32 {
        self.y1 - self.y0
    }
}

#[derive(Debug, Clone)]
struct Ticks {
    values: Vec<f64>,
    labels: Vec<String>,
}

impl Ticks {
    fn widest(&self, scale: u32) -> u32 {
        self.labels.iter().map(|l| font::measure(l, scale).0).max().unwrap_or(0)
    }
}

/// Round a raw step up to 1, 2 or 5 times a power of ten
fn nice_step(raw: f64) -> f64 {
    if raw <= 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

fn ticks(lo: f64, hi: f64, target: usize) -> Ticks {
    let step = nice_step((hi - lo) / target.max(1) as f64);
    let decimals = if step >= 1.0 { 0 } else { (-step.log10()).ceil() as usize };

    let mut values = Vec::new();
    let mut k = (lo / step).ceil();
    while k * step <= hi + step * 1e-9 {
        values.push(k * step + 0.0);
        k += 1.0;
    }
    let labels = values.iter().map(|v| format!("{:.*}", decimals, v)).collect();
    Ticks { values, labels }
}

/// Drawing surface that silently clips everything outside the image
struct Canvas {
    image: RgbImage,
}

impl Canvas {
    fn new(width: u32, height: u32) -> Self {
        Self { image: RgbImage::from_pixel(width, height, WHITE) }
    }

    fn put(&mut self, x: i64, y: i64, color: Rgb<u8>) {
        if x >= 0 && y >= 0 && (x as u32) < self.image.width() && (y as u32) < self.image.height() {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }

    fn fill(&mut self, x: i64, y: i64, w: u32, h: u32, color: Rgb<u8>) {
        for dy in 0..h as i64 {
            for dx in 0..w as i64 {
                self.put(x + dx, y + dy, color);
            }
        }
    }

    fn text(&mut self, text: &str, x: i64, y: i64, scale: u32) {
        let mut lit = Vec::new();
        font::render(text, x, y, scale, |px, py| lit.push((px, py)));
        for (px, py) in lit {
            self.put(px, py, BLACK);
        }
    }

    fn vertical_text(&mut self, text: &str, x: i64, y: i64, scale: u32) {
        let mut lit = Vec::new();
        font::render_vertical(text, x, y, scale, |px, py| lit.push((px, py)));
        for (px, py) in lit {
            self.put(px, py, BLACK);
        }
    }

    /// Outline drawn just outside `rect`
    fn frame(&mut self, rect: Rect, line: u32) {
        let l = line as i64;
        let (x0, y0) = (rect.x0 as i64 - l, rect.y0 as i64 - l);
        let w = rect.width() + 2 * line;
        let h = rect.height() + 2 * line;
        self.fill(x0, y0, w, line, BLACK);
        self.fill(x0, rect.y1 as i64, w, line, BLACK);
        self.fill(x0, y0, line, h, BLACK);
        self.fill(rect.x1 as i64, y0, line, h, BLACK);
    }
}

struct Layout {
    plot: Rect,
    colorbar: Option<Rect>,
}

pub struct SpectrogramPlot<'a> {
    spectrogram: &'a Spectrogram,
    options: PlotOptions,
}

impl<'a> SpectrogramPlot<'a> {
    pub fn new(spectrogram: &'a Spectrogram, options: PlotOptions) -> Self {
        Self { spectrogram, options }
    }

    pub fn options(&self) -> &PlotOptions {
        &self.options
    }

    /// Color scale bounds in dB: the loudest cell and `dynamic_range_db` below it
    pub fn db_bounds(&self, db: &ndarray::Array2<f64>) -> (f64, f64) {
        let max = db.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (max - self.options.dynamic_range_db, max)
    }

    fn layout(&self, freq_ticks: &Ticks, db_ticks: &Ticks) -> Result<Layout> {
        let opts = &self.options;
        let scale = opts.font_scale();
        let title_scale = (scale as f64 * 1.2).round() as u32;
        let text_h = font::GLYPH_HEIGHT * scale;
        let pad = 4 * scale;
        let tick = 2 * scale;

        let left = pad + text_h + pad + freq_ticks.widest(scale) + scale * 2 + tick;
        let bottom = tick + scale * 2 + text_h + pad + text_h + pad;
        let top = pad + font::GLYPH_HEIGHT * title_scale + pad;
        let bar_width = 6 * scale;
        let right = if opts.colorbar {
            2 * pad + bar_width + tick + scale * 2 + db_ticks.widest(scale) + pad + text_h + pad
        } else {
            2 * pad
        };

        let min_plot = 16;
        if opts.width < left + right + min_plot || opts.height < top + bottom + min_plot {
            return Err(SpectroglyphError::render(format!(
                "Figure {}x{} px is too small for its labels", opts.width, opts.height
            )));
        }

        let plot = Rect { x0: left, y0: top, x1: opts.width - right, y1: opts.height - bottom };
        let colorbar = opts.colorbar.then(|| Rect {
            x0: plot.x1 + 2 * pad,
            y0: plot.y0,
            x1: plot.x1 + 2 * pad + bar_width,
            y1: plot.y1,
        });
        Ok(Layout { plot, colorbar })
    }

    /// Draw the full figure
    pub fn render(&self) -> Result<RgbImage> {
        let spec = self.spectrogram;
        let opts = &self.options;
        let scale = opts.font_scale();
        let line = opts.line_width();
        let tick = 2 * scale;
        let text_h = (font::GLYPH_HEIGHT * scale) as i64;

        let db = spec.to_db();
        let (vmin, vmax) = self.db_bounds(&db);
        let (t_lo, t_hi) = spec.time_extent();
        let f_hi = spec.nyquist();

        let time_ticks = ticks(t_lo.max(0.0), t_hi, 8);
        let freq_ticks = ticks(0.0, f_hi, 6);
        let db_ticks = ticks(vmin, vmax, 5);
        let layout = self.layout(&freq_ticks, &db_ticks)?;
        let plot = layout.plot;

        debug!("Plot area {}x{} at ({}, {}), dB range [{:.1}, {:.1}]",
               plot.width(), plot.height(), plot.x0, plot.y0, vmin, vmax);

        let mut canvas = Canvas::new(opts.width, opts.height);

        // Nearest-cell lookup, one frame per column and one bin per row
        let columns: Vec<usize> = (0..plot.width())
            .map(|px| spec.frame_for(t_lo + (px as f64 + 0.5) / plot.width() as f64 * (t_hi - t_lo)))
            .collect();
        let rows: Vec<usize> = (0..plot.height())
            .map(|py| spec.bin_for(f_hi * (1.0 - (py as f64 + 0.5) / plot.height() as f64)))
            .collect();
        let span = vmax - vmin;
        for (py, &bin) in rows.iter().enumerate() {
            for (px, &frame) in columns.iter().enumerate() {
                let t = if span > 0.0 { (db[[bin, frame]] - vmin) / span } else { 1.0 };
                canvas.image.put_pixel(plot.x0 + px as u32, plot.y0 + py as u32, Rgb(opts.colormap.map(t)));
            }
        }
        canvas.frame(plot, line);

        // Time axis
        let to_x = |t: f64| plot.x0 as i64 + ((t - t_lo) / (t_hi - t_lo) * plot.width() as f64).round() as i64;
        let label_y = plot.y1 as i64 + line as i64 + tick as i64 + 2 * scale as i64;
        for (value, label) in time_ticks.values.iter().zip(&time_ticks.labels) {
            let x = to_x(*value);
            canvas.fill(x - line as i64 / 2, plot.y1 as i64, line, tick + line, BLACK);
            let (w, _) = font::measure(label, scale);
            canvas.text(label, x - w as i64 / 2, label_y, scale);
        }
        let xlabel = "Time (s)";
        let (w, _) = font::measure(xlabel, scale);
        let xlabel_y = label_y + text_h + 4 * scale as i64;
        canvas.text(xlabel, plot.x0 as i64 + (plot.width() as i64 - w as i64) / 2, xlabel_y, scale);

        // Frequency axis
        let to_y = |f: f64| plot.y1 as i64 - (f / f_hi * plot.height() as f64).round() as i64;
        for (value, label) in freq_ticks.values.iter().zip(&freq_ticks.labels) {
            let y = to_y(*value);
            let mark_x = plot.x0 as i64 - line as i64 - tick as i64;
            canvas.fill(mark_x, y - line as i64 / 2, tick + line, line, BLACK);
            let (w, _) = font::measure(label, scale);
            canvas.text(label, mark_x - 2 * scale as i64 - w as i64, y - text_h / 2, scale);
        }
        let ylabel = "Frequency (Hz)";
        let (w, _) = font::measure(ylabel, scale);
        canvas.vertical_text(
            ylabel,
            4 * scale as i64,
            plot.y0 as i64 + (plot.height() as i64 + w as i64) / 2,
            scale,
        );

        // Title
        let title_scale = (scale as f64 * 1.2).round() as u32;
        let (w, _) = font::measure(&opts.title, title_scale);
        canvas.text(
            &opts.title,
            plot.x0 as i64 + (plot.width() as i64 - w as i64) / 2,
            4 * scale as i64,
            title_scale,
        );

        if let Some(bar) = layout.colorbar {
            for py in 0..bar.height() {
                let t = 1.0 - (py as f64 + 0.5) / bar.height() as f64;
                let color = Rgb(opts.colormap.map(t));
                for px in bar.x0..bar.x1 {
                    canvas.image.put_pixel(px, bar.y0 + py, color);
                }
            }
            canvas.frame(bar, line);

            let to_bar_y = |v: f64| bar.y1 as i64 - ((v - vmin) / span * bar.height() as f64).round() as i64;
            let mark_x = bar.x1 as i64 + line as i64;
            let mut widest = 0;
            for (value, label) in db_ticks.values.iter().zip(&db_ticks.labels) {
                let y = to_bar_y(*value);
                canvas.fill(mark_x, y - line as i64 / 2, tick, line, BLACK);
                let (w, _) = font::measure(label, scale);
                widest = widest.max(w);
                canvas.text(label, mark_x + tick as i64 + 2 * scale as i64, y - text_h / 2, scale);
            }
            let cblabel = "Intensity (dB)";
            let (w, _) = font::measure(cblabel, scale);
            canvas.vertical_text(
                cblabel,
                mark_x + tick as i64 + 2 * scale as i64 + widest as i64 + 4 * scale as i64,
                bar.y0 as i64 + (bar.height() as i64 + w as i64) / 2,
                scale,
            );
        }

        Ok(canvas.image)
    }

    /// Render and write an RGB PNG whose `pHYs` chunk records the DPI
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let image = self.render()?;
        write_png(path, &image, self.options.dpi)?;
        info!("Spectrogram plot saved: {} ({}x{} px, {} dpi)",
              path.display(), image.width(), image.height(), self.options.dpi);
        Ok(())
    }
}

/// Encode `image` as 8-bit RGB PNG with its physical resolution set to `dpi`
pub fn write_png(path: &Path, image: &RgbImage, dpi: u32) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)
        .map_err(|e| SpectroglyphError::render(format!("Cannot create {}: {}", path.display(), e)))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), image.width(), image.height());
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);

    let pixels_per_meter = (dpi as f64 * INCH_PER_METER).round() as u32;
    encoder.set_pixel_dims(Some(png::PixelDimensions {
        xppu: pixels_per_meter,
        yppu: pixels_per_meter,
        unit: png::Unit::Meter,
    }));

    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())?;
    writer.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    use tempfile::TempDir;
    use crate::spectrogram::StftParams;

    fn tone_spectrogram() -> Spectrogram {
        let sample_rate = 8000;
        let samples: Vec<f32> = (0..16000)
            .map(|i| (2.0 * PI * 1000.0 * i as f64 / sample_rate as f64).sin() as f32)
            .collect();
        Spectrogram::compute(&samples, sample_rate, StftParams::default()).unwrap()
    }

    fn small_options() -> PlotOptions {
        PlotOptions {
            title: "Test".to_string(),
            colormap: Colormap::Inferno,
            dpi: 50,
            width: 500,
            height: 300,
            dynamic_range_db: 100.0,
            colorbar: false,
        }
    }

    #[test]
    fn test_nice_ticks() {
        let t = ticks(0.0, 4000.0, 6);
        assert_eq!(t.labels, vec!["0", "1000", "2000", "3000", "4000"]);

        let t = ticks(0.03, 1.97, 8);
        assert_eq!(t.labels, vec!["0.5", "1.0", "1.5"]);

        let t = ticks(-103.2, -3.2, 5);
        assert_eq!(t.labels, vec!["-100", "-80", "-60", "-40", "-20"]);

        assert_eq!(nice_step(0.0), 1.0);
        assert_eq!(nice_step(3.0), 5.0);
        assert_eq!(nice_step(700.0), 1000.0);
    }

    #[test]
    fn test_render_dimensions_and_background() {
        let spec = tone_spectrogram();
        let image = SpectrogramPlot::new(&spec, small_options()).render().unwrap();
        assert_eq!(image.dimensions(), (500, 300));
        assert_eq!(*image.get_pixel(0, 0), WHITE);
        assert_eq!(*image.get_pixel(499, 299), WHITE);
    }

    #[test]
    fn test_tone_is_brightest_near_its_frequency() {
        let spec = tone_spectrogram();
        let plot = SpectrogramPlot::new(&spec, small_options());
        let image = plot.render().unwrap();

        let db = spec.to_db();
        let freq_ticks = ticks(0.0, spec.nyquist(), 6);
        let layout = plot.layout(&freq_ticks, &ticks(0.0, 1.0, 5)).unwrap();
        let area = layout.plot;
        let x = (area.x0 + area.x1) / 2;

        let luma = |p: &Rgb<u8>| p.0.iter().map(|&c| c as u32).sum::<u32>();
        let brightest = (area.y0..area.y1)
            .max_by_key(|&y| luma(image.get_pixel(x, y)))
            .unwrap();
        let freq = spec.nyquist() * (1.0 - ((brightest - area.y0) as f64 + 0.5) / area.height() as f64);
        assert!((freq - 1000.0).abs() <= 2.0 * spec.bin_width() + spec.nyquist() / area.height() as f64,
                "brightest row at {} Hz", freq);
        assert!(plot.db_bounds(&db).1.is_finite());
    }

    #[test]
    fn test_colorbar_uses_extra_space() {
        let spec = tone_spectrogram();
        let ft = ticks(0.0, spec.nyquist(), 6);
        let dt = ticks(-100.0, 0.0, 5);
        let without = SpectrogramPlot::new(&spec, small_options()).layout(&ft, &dt).unwrap();
        let with = SpectrogramPlot::new(&spec, small_options().with_colorbar(true)).layout(&ft, &dt).unwrap();
        assert!(with.plot.width() < without.plot.width());
        assert!(with.colorbar.is_some());
        assert!(without.colorbar.is_none());
    }

    #[test]
    fn test_too_small_figure() {
        let spec = tone_spectrogram();
        let options = PlotOptions { width: 40, height: 30, ..small_options() };
        assert!(SpectrogramPlot::new(&spec, options).render().is_err());
    }

    #[test]
    fn test_png_records_dpi() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plot.png");
        let spec = tone_spectrogram();
        let options = PlotOptions { dpi: 300, width: 900, height: 600, ..small_options() };
        SpectrogramPlot::new(&spec, options.with_colorbar(true)).save(&path).unwrap();

        let decoder = png::Decoder::new(File::open(&path).unwrap());
        let reader = decoder.read_info().unwrap();
        let info = reader.info();
        assert_eq!((info.width, info.height), (900, 600));
        let dims = info.pixel_dims.unwrap();
        assert_eq!(dims.xppu, 11811);
        assert_eq!(dims.unit, png::Unit::Meter);
    }
}
