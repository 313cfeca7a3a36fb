//! Additive synthesis: one sine per field row, weighted by the row envelope

use std::f64::consts::PI;
use log::{debug, info};
use ndarray::Array1;
use rayon::prelude::*;
use crate::config::{utils, SynthesisConfig};
use crate::error::{SpectroglyphError, Result};
use crate::field::LuminanceField;
use super::envelope::{Lerp, TimeAxis};
use super::{FrequencyMap, Waveform};

/// Samples handed to one rayon task
const CHUNK_SIZE: usize = 4096;

/// A field row ready for synthesis
struct Partial {
    angular_freq: f64,
    envelope: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct AdditiveSynthesizer {
    frequency_map: FrequencyMap,
    sample_rate: u32,
    duration: f64,
    total_samples: usize,
    threads: usize,
}

impl AdditiveSynthesizer {
    pub fn new(config: &SynthesisConfig) -> Result<Self> {
        Ok(Self {
            frequency_map: FrequencyMap::from_config(config)?,
            sample_rate: config.sample_rate,
            duration: config.duration,
            total_samples: config.total_samples(),
            threads: utils::thread_count(config.threads),
        })
    }

    pub fn frequency_map(&self) -> &FrequencyMap {
        &self.frequency_map
    }

    pub fn total_samples(&self) -> usize {
        self.total_samples
    }

    /// Sum a sine for every lit row of `field` (row 0 = lowest frequency).
    ///
    /// The returned waveform is not normalized. Every output sample adds the
    /// rows in ascending order, so the result does not depend on the thread
    /// count.
    pub fn synthesize(&self, field: &LuminanceField) -> Result<Waveform> {
        if field.height() != self.frequency_map.bands() {
            return Err(SpectroglyphError::synthesis(format!(
                "Field has {} rows but the frequency map has {} bands",
                field.height(), self.frequency_map.bands()
            )));
        }

        let partials: Vec<Partial> = (0..field.height())
            .filter(|&y| field.row(y).iter().any(|&v| v > 0.0))
            .map(|y| Partial {
                angular_freq: 2.0 * PI * self.frequency_map.frequency(y),
                envelope: field.row(y).iter().map(|&v| v as f64).collect(),
            })
            .collect();

        info!("Synthesizing {} samples from {} of {} rows",
              self.total_samples, partials.len(), field.height());

        let axis = TimeAxis::new(self.total_samples, self.duration, field.width());
        let width = field.width();
        let mut output = vec![0.0f64; self.total_samples];

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .build()
            .map_err(|e| SpectroglyphError::synthesis(format!("Cannot start worker pool: {}", e)))?;

        pool.install(|| {
            output.par_chunks_mut(CHUNK_SIZE).enumerate().for_each(|(chunk, samples)| {
                let offset = chunk * CHUNK_SIZE;
                for (j, sample) in samples.iter_mut().enumerate() {
                    let i = offset + j;
                    let t = axis.time(i);
                    let lerp = Lerp::at(axis.field_position(i), width);
                    let mut acc = 0.0;
                    for partial in &partials {
                        acc += (partial.angular_freq * t).sin() * lerp.apply(&partial.envelope);
                    }
                    *sample = acc;
                }
            });
        });

        debug!("Synthesis used {} threads", self.threads);
        Ok(Waveform::new(Array1::from(output), self.sample_rate))
    }
}
