//! Short-time Fourier transform power spectrogram

use std::f64::consts::PI;
use log::debug;
use ndarray::Array2;
use rayon::prelude::*;
use rustfft::{num_complex::Complex, FftPlanner};
use crate::config::SpectrogramConfig;
use crate::error::{SpectroglyphError, Result};

/// Smallest power used before taking logarithms
const POWER_FLOOR: f64 = 1e-30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StftParams {
    pub window_size: usize,
    pub hop_size: usize,
}

impl StftParams {
    pub fn new(window_size: usize, overlap: usize) -> Result<Self> {
        if window_size < 2 || overlap >= window_size {
            return Err(SpectroglyphError::render(format!(
                "Invalid STFT window {} with overlap {}", window_size, overlap
            )));
        }
        Ok(Self { window_size, hop_size: window_size - overlap })
    }

    pub fn from_config(config: &SpectrogramConfig) -> Result<Self> {
        Self::new(config.window_size, config.overlap)
    }
}

impl Default for StftParams {
    fn default() -> Self {
        Self { window_size: 1024, hop_size: 512 }
    }
}

/// Symmetric Hann window
pub fn hann_window(size: usize) -> Vec<f64> {
    if size < 2 {
        return vec![1.0; size];
    }
    (0..size)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / (size - 1) as f64).cos())
        .collect()
}

/// One-sided power spectral density over time.
///
/// `power` has shape `(bins, frames)` with bin 0 at DC and the last bin at
/// the Nyquist frequency.
#[derive(Debug, Clone)]
pub struct Spectrogram {
    power: Array2<f64>,
    frequencies: Vec<f64>,
    times: Vec<f64>,
    sample_rate: u32,
    params: StftParams,
}

impl Spectrogram {
    /// Signals shorter than one window are zero-padded to a single frame
    pub fn compute(samples: &[f32], sample_rate: u32, params: StftParams) -> Result<Self> {
        if samples.is_empty() {
            return Err(SpectroglyphError::render("Cannot compute a spectrogram of an empty signal"));
        }
        if sample_rate == 0 {
            return Err(SpectroglyphError::render("Sample rate cannot be 0"));
        }

        let nfft = params.window_size;
        let hop = params.hop_size;
        let padded;
        let signal: &[f32] = if samples.len() < nfft {
            padded = {
                let mut v = samples.to_vec();
                v.resize(nfft, 0.0);
                v
            };
            &padded
        } else {
            samples
        };

        let frames = (signal.len() - nfft) / hop + 1;
        let bins = nfft / 2 + 1;
        let fs = sample_rate as f64;

        let window = hann_window(nfft);
        let window_energy: f64 = window.iter().map(|w| w * w).sum();
        let scale = 1.0 / (fs * window_energy);
        // Bins folded from the negative half count twice, DC and Nyquist once
        let doubled_end = if nfft % 2 == 0 { bins - 1 } else { bins };

        let fft = FftPlanner::<f64>::new().plan_fft_forward(nfft);

        let columns: Vec<Vec<f64>> = (0..frames)
            .into_par_iter()
            .map(|frame| {
                let start = frame * hop;
                let mut buffer: Vec<Complex<f64>> = signal[start..start + nfft]
                    .iter()
                    .zip(window.iter())
                    .map(|(&s, &w)| Complex::new(s as f64 * w, 0.0))
                    .collect();
                fft.process(&mut buffer);

                buffer[..bins]
                    .iter()
                    .enumerate()
                    .map(|(k, c)| {
                        let p = c.norm_sqr() * scale;
                        if k >= 1 && k < doubled_end { p * 2.0 } else { p }
                    })
                    .collect()
            })
            .collect();

        let power = Array2::from_shape_fn((bins, frames), |(k, frame)| columns[frame][k]);
        let frequencies = (0..bins).map(|k| k as f64 * fs / nfft as f64).collect();
        let times = (0..frames)
            .map(|frame| (frame * hop) as f64 / fs + nfft as f64 / 2.0 / fs)
            .collect();

        debug!("STFT: {} frames x {} bins (nfft={}, hop={})", frames, bins, nfft, hop);

        Ok(Self { power, frequencies, times, sample_rate, params })
    }

    pub fn power(&self) -> &Array2<f64> {
        &self.power
    }

    /// Power in decibels, floored to avoid `-inf` on silence
    pub fn to_db(&self) -> Array2<f64> {
        self.power.mapv(|p| 10.0 * p.max(POWER_FLOOR).log10())
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn bins(&self) -> usize {
        self.power.nrows()
    }

    pub fn frames(&self) -> usize {
        self.power.ncols()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn params(&self) -> StftParams {
        self.params
    }

    /// Width of one frequency bin in Hz
    pub fn bin_width(&self) -> f64 {
        self.sample_rate as f64 / self.params.window_size as f64
    }

    /// Time between two frames in seconds
    pub fn frame_step(&self) -> f64 {
        self.params.hop_size as f64 / self.sample_rate as f64
    }

    /// Time span covered by the frames, each frame owning half a hop on
    /// either side of its center
    pub fn time_extent(&self) -> (f64, f64) {
        let pad = self.frame_step() / 2.0;
        let first = self.times.first().copied().unwrap_or(0.0);
        let last = self.times.last().copied().unwrap_or(0.0);
        (first - pad, last + pad)
    }

    pub fn nyquist(&self) -> f64 {
        self.sample_rate as f64 / 2.0
    }

    /// Nearest bin for a frequency, clamped to the available range
    pub fn bin_for(&self, freq: f64) -> usize {
        let bin = (freq / self.bin_width()).round().max(0.0) as usize;
        bin.min(self.bins() - 1)
    }

    /// Nearest frame for a time, clamped to the available range
    pub fn frame_for(&self, time: f64) -> usize {
        let first = self.times.first().copied().unwrap_or(0.0);
        let frame = ((time - first) / self.frame_step()).round().max(0.0) as usize;
        frame.min(self.frames() - 1)
    }

    /// Mean power of every bin across all frames
    pub fn mean_power(&self) -> Vec<f64> {
        self.power
            .rows()
            .into_iter()
            .map(|row| row.sum() / row.len() as f64)
            .collect()
    }
}
