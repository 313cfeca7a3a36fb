//! Row to frequency mapping

use crate::config::SynthesisConfig;
use crate::error::{SpectroglyphError, Result};

/// Evenly spaced band frequencies, row 0 at `min_freq` and the last row at
/// `max_freq`, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyMap {
    min_freq: f64,
    max_freq: f64,
    bands: usize,
}

impl FrequencyMap {
    pub fn new(min_freq: f64, max_freq: f64, bands: usize) -> Result<Self> {
        if bands < 2 {
            return Err(SpectroglyphError::synthesis("Frequency map needs at least 2 bands"));
        }
        if !min_freq.is_finite() || !max_freq.is_finite() || min_freq < 0.0 || max_freq <= min_freq {
            return Err(SpectroglyphError::synthesis(format!(
                "Invalid frequency range [{}, {}]", min_freq, max_freq
            )));
        }
        Ok(Self { min_freq, max_freq, bands })
    }

    pub fn from_config(config: &SynthesisConfig) -> Result<Self> {
        Self::new(config.min_freq, config.max_freq, config.height)
    }

    pub fn bands(&self) -> usize {
        self.bands
    }

    pub fn min_freq(&self) -> f64 {
        self.min_freq
    }

    pub fn max_freq(&self) -> f64 {
        self.max_freq
    }

    /// Distance between two neighbouring bands in Hz
    pub fn spacing(&self) -> f64 {
        (self.max_freq - self.min_freq) / (self.bands - 1) as f64
    }

    pub fn frequency(&self, row: usize) -> f64 {
        if row >= self.bands - 1 {
            return self.max_freq;
        }
        self.min_freq + (self.max_freq - self.min_freq) * row as f64 / (self.bands - 1) as f64
    }

    pub fn frequencies(&self) -> Vec<f64> {
        (0..self.bands).map(|row| self.frequency(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_range_is_inclusive() {
        let map = FrequencyMap::from_config(&SynthesisConfig::default()).unwrap();
        let freqs = map.frequencies();
        assert_eq!(freqs.len(), 400);
        assert_eq!(freqs[0], 300.0);
        assert_eq!(freqs[399], 8000.0);
    }

    #[test]
    fn test_monotonic_and_evenly_spaced() {
        let map = FrequencyMap::new(300.0, 8000.0, 400).unwrap();
        let freqs = map.frequencies();
        let spacing = map.spacing();
        for pair in freqs.windows(2) {
            assert!(pair[1] > pair[0]);
            assert!((pair[1] - pair[0] - spacing).abs() < 1e-9);
        }
    }

    #[test]
    fn test_invalid_maps() {
        assert!(FrequencyMap::new(300.0, 8000.0, 1).is_err());
        assert!(FrequencyMap::new(8000.0, 300.0, 10).is_err());
        assert!(FrequencyMap::new(-1.0, 300.0, 10).is_err());
        assert!(FrequencyMap::new(0.0, f64::INFINITY, 10).is_err());
    }
}
