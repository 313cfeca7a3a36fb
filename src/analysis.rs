//! Measurements on synthesized audio
//!
//! Used by the read command's summary and by `--verify` to check that a field
//! actually shows up in the spectrogram of its own waveform.

use log::debug;
use crate::error::Result;
use crate::field::LuminanceField;
use crate::spectrogram::{Spectrogram, StftParams};
use crate::synthesis::FrequencyMap;

/// Frequency in Hz of the strongest bin of the frame-averaged power spectrum.
///
/// Frames are `nfft` long with 50% overlap. A silent signal reports 0 Hz.
pub fn dominant_frequency(samples: &[f32], sample_rate: u32, nfft: usize) -> Result<f64> {
    let params = StftParams::new(nfft, nfft / 2)?;
    let spectrogram = Spectrogram::compute(samples, sample_rate, params)?;
    Ok(peak_frequency(&spectrogram))
}

/// Frequency of the strongest bin of an already computed spectrogram
pub fn peak_frequency(spectrogram: &Spectrogram) -> f64 {
    let mean = spectrogram.mean_power();
    let mut best = 0;
    for (bin, &power) in mean.iter().enumerate() {
        if power > mean[best] {
            best = bin;
        }
    }
    spectrogram.frequencies()[best]
}

/// Pearson correlation between field intensities and the spectrogram level
/// (dB) at the matching time and frequency.
///
/// `field` must be in synthesis orientation (row 0 = lowest band). Columns
/// whose time falls outside the analysed frames are skipped. Returns `None`
/// when fewer than two cells can be compared or either side is constant.
pub fn silhouette_correlation(
    field: &LuminanceField,
    frequency_map: &FrequencyMap,
    duration: f64,
    spectrogram: &Spectrogram,
) -> Option<f64> {
    if field.height() != frequency_map.bands() || spectrogram.frames() == 0 {
        return None;
    }

    let db = spectrogram.to_db();
    let times = spectrogram.times();
    let (first, last) = (times[0], times[times.len() - 1]);

    let bins: Vec<usize> = (0..field.height())
        .map(|y| spectrogram.bin_for(frequency_map.frequency(y)))
        .collect();

    let mut pairs = Vec::with_capacity(field.height() * field.width());
    for x in 0..field.width() {
        let t = x as f64 * duration / field.width() as f64;
        if t < first || t > last {
            continue;
        }
        let frame = spectrogram.frame_for(t);
        for (y, &bin) in bins.iter().enumerate() {
            pairs.push((field.get(y, x) as f64, db[[bin, frame]]));
        }
    }

    let correlation = pearson(&pairs);
    debug!("Silhouette correlation over {} cells: {:?}", pairs.len(), correlation);
    correlation
}

fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_a = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_b = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for &(a, b) in pairs {
        let (da, db) = (a - mean_a, b - mean_b);
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }
    if var_a <= 0.0 || var_b <= 0.0 {
        return None;
    }
    Some(cov / (var_a.sqrt() * var_b.sqrt()))
}
