//! Color lookup tables for intensity display

use serde::{Deserialize, Serialize};

const INFERNO: [[u8; 3]; 10] = [
    [0x00, 0x00, 0x04], [0x1B, 0x0C, 0x42], [0x4B, 0x0C, 0x6B], [0x78, 0x1C, 0x6D], [0xA5, 0x2C, 0x60],
    [0xCF, 0x44, 0x46], [0xED, 0x69, 0x25], [0xFB, 0x9A, 0x06], [0xF7, 0xD1, 0x3D], [0xFC, 0xFF, 0xA4],
];

const MAGMA: [[u8; 3]; 10] = [
    [0x00, 0x00, 0x04], [0x18, 0x0F, 0x3E], [0x45, 0x10, 0x77], [0x72, 0x1F, 0x81], [0x9F, 0x2F, 0x7F],
    [0xCD, 0x40, 0x71], [0xF1, 0x60, 0x5D], [0xFD, 0x95, 0x67], [0xFE, 0xC9, 0x8D], [0xFC, 0xFD, 0xBF],
];

const VIRIDIS: [[u8; 3]; 10] = [
    [0x44, 0x01, 0x54], [0x48, 0x28, 0x78], [0x3E, 0x4A, 0x89], [0x31, 0x68, 0x8E], [0x26, 0x82, 0x8E],
    [0x1F, 0x9E, 0x89], [0x35, 0xB7, 0x79], [0x6D, 0xCD, 0x59], [0xB4, 0xDE, 0x2C], [0xFD, 0xE7, 0x25],
];

const GRAY: [[u8; 3]; 2] = [[0, 0, 0], [255, 255, 255]];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    #[default]
    Inferno,
    Magma,
    Viridis,
    Gray,
}

impl Colormap {
    pub fn name(&self) -> &'static str {
        match self {
            Colormap::Inferno => "inferno",
            Colormap::Magma => "magma",
            Colormap::Viridis => "viridis",
            Colormap::Gray => "gray",
        }
    }

    fn stops(&self) -> &'static [[u8; 3]] {
        match self {
            Colormap::Inferno => &INFERNO,
            Colormap::Magma => &MAGMA,
            Colormap::Viridis => &VIRIDIS,
            Colormap::Gray => &GRAY,
        }
    }

    /// Color for `t` in [0, 1]; values outside are clamped, NaN maps to 0
    pub fn map(&self, t: f64) -> [u8; 3] {
        let stops = self.stops();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let position = t * (stops.len() - 1) as f64;
        let lower = (position.floor() as usize).min(stops.len() - 2);
        let fraction = position - lower as f64;

        let a = stops[lower];
        let b = stops[lower + 1];
        let mut rgb = [0u8; 3];
        for c in 0..3 {
            let value = a[c] as f64 + (b[c] as f64 - a[c] as f64) * fraction;
            rgb[c] = value.round().clamp(0.0, 255.0) as u8;
        }
        rgb
    }
}

impl std::fmt::Display for Colormap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
