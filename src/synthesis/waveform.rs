//! Synthesized waveform, peak normalization and 16-bit quantization

use std::path::Path;
use log::{debug, warn};
use ndarray::Array1;
use crate::audio::write_pcm16;
use crate::error::Result;

/// Full-scale value of a 16-bit sample
pub const PCM16_SCALE: f64 = 32767.0;

#[derive(Debug, Clone)]
pub struct Waveform {
    samples: Array1<f64>,
    sample_rate: u32,
}

/// Outcome of peak normalization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    /// Peak absolute value before scaling
    pub peak: f64,
    /// False when the signal was silent and left untouched
    pub applied: bool,
}

impl Waveform {
    pub fn new(samples: Array1<f64>, sample_rate: u32) -> Self {
        Self { samples, sample_rate }
    }

    pub fn samples(&self) -> &Array1<f64> {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn peak(&self) -> f64 {
        self.samples.iter().fold(0.0f64, |p, &x| p.max(x.abs()))
    }

    /// Scale so the largest absolute sample is exactly 1.0.
    ///
    /// A silent (or non-finite) signal is left as is.
    pub fn normalize(&mut self) -> Normalization {
        let peak = self.peak();
        if peak == 0.0 || !peak.is_finite() {
            warn!("Waveform peak is {}, skipping normalization", peak);
            return Normalization { peak, applied: false };
        }

        debug!("Normalization: peak={:.4}", peak);
        self.samples.mapv_inplace(|x| x / peak);
        Normalization { peak, applied: true }
    }

    /// Scale by 32767 and truncate toward zero
    pub fn to_pcm16(&self) -> Vec<i16> {
        self.samples.iter().map(|&x| (x * PCM16_SCALE) as i16).collect()
    }

    /// Samples as `f32`, for analysis
    pub fn to_f32(&self) -> Vec<f32> {
        self.samples.iter().map(|&x| x as f32).collect()
    }

    pub fn save_pcm16<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_pcm16(path, self.sample_rate, &self.to_pcm16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_normalize_to_unit_peak() {
        let mut wave = Waveform::new(array![0.5, -2.0, 1.0], 8000);
        let result = wave.normalize();
        assert_eq!(result, Normalization { peak: 2.0, applied: true });
        assert_eq!(wave.peak(), 1.0);
        assert_eq!(wave.samples()[1], -1.0);
    }

    #[test]
    fn test_silence_is_not_normalized() {
        let mut wave = Waveform::new(Array1::zeros(16), 8000);
        let result = wave.normalize();
        assert!(!result.applied);
        assert!(wave.samples().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_pcm16_truncates_toward_zero() {
        let wave = Waveform::new(array![1.0, -1.0, 0.5, -0.5, 0.0], 8000);
        assert_eq!(wave.to_pcm16(), vec![32767, -32767, 16383, -16383, 0]);
    }

    #[test]
    fn test_duration() {
        let wave = Waveform::new(Array1::zeros(22050), 44100);
        assert_eq!(wave.duration(), 0.5);
    }
}
