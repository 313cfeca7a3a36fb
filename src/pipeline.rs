//! Encode and read pipelines

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use log::{debug, info, warn};
use crate::analysis;
use crate::audio::WavAudio;
use crate::config::Config;
use crate::error::Result;
use crate::field::{FieldSource, LuminanceField};
use crate::spectrogram::{PlotOptions, Spectrogram, SpectrogramPlot, StftParams};
use crate::synthesis::{AdditiveSynthesizer, Normalization, Waveform};

/// Field to audio: synthesize, normalize, write the WAV, optionally plot
#[derive(Debug)]
pub struct EncodePipeline {
    config: Config,
    synthesizer: AdditiveSynthesizer,
    plot_title: String,
    verify: bool,
}

impl EncodePipeline {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let synthesizer = AdditiveSynthesizer::new(&config.synthesis)?;
        debug!("Encode pipeline: {}x{} field, {} samples",
               config.synthesis.width(), config.synthesis.height, synthesizer.total_samples());
        Ok(Self {
            config,
            synthesizer,
            plot_title: "Spectrogram".to_string(),
            verify: false,
        })
    }

    pub fn with_plot_title<S: Into<String>>(mut self, title: S) -> Self {
        self.plot_title = title.into();
        self
    }

    /// Also measure how well the field shows up in the resulting spectrogram
    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn synthesizer(&self) -> &AdditiveSynthesizer {
        &self.synthesizer
    }

    /// Render `source` at the configured size, save the canvas as a preview
    /// if asked, and flip it so row 0 is the lowest frequency.
    pub fn prepare_field(&self, source: &FieldSource, preview: Option<&Path>) -> Result<LuminanceField> {
        let synthesis = &self.config.synthesis;
        let canvas = source.render(synthesis.width(), synthesis.height)?;
        info!("Field from {}: {}x{}, {} lit rows",
              source.describe(), canvas.width(), canvas.height(), canvas.lit_rows());

        if let Some(path) = preview {
            canvas.save_preview(path)?;
            info!("Field preview saved: {}", path.display());
        }

        Ok(canvas.flipped_vertically())
    }

    /// Synthesize and peak-normalize `field` (synthesis orientation)
    pub fn encode(&self, field: &LuminanceField) -> Result<(Waveform, Normalization)> {
        let mut waveform = self.synthesizer.synthesize(field)?;
        let normalization = waveform.normalize();
        Ok((waveform, normalization))
    }

    pub fn run(&self, field: &LuminanceField, wav_path: &Path, plot_path: Option<&Path>) -> Result<EncodeReport> {
        let start_time = Instant::now();

        let (waveform, normalization) = self.encode(field)?;
        waveform.save_pcm16(wav_path)?;
        info!("Saved: {} ({} samples, {:.2}s)", wav_path.display(), waveform.len(), waveform.duration());

        let needs_spectrogram = plot_path.is_some() || self.verify;
        let spectrogram = if needs_spectrogram {
            let params = StftParams::from_config(&self.config.spectrogram)?;
            Some(Spectrogram::compute(&waveform.to_f32(), waveform.sample_rate(), params)?)
        } else {
            None
        };

        if let (Some(path), Some(spec)) = (plot_path, spectrogram.as_ref()) {
            let options = PlotOptions::from_config(&self.config.spectrogram, self.plot_title.as_str());
            SpectrogramPlot::new(spec, options).save(path)?;
        }

        let correlation = match (self.verify, spectrogram.as_ref()) {
            (true, Some(spec)) => {
                let r = analysis::silhouette_correlation(
                    field,
                    self.synthesizer.frequency_map(),
                    self.config.synthesis.duration,
                    spec,
                );
                if r.is_none() {
                    warn!("Field and spectrogram cannot be correlated (constant field or silence)");
                }
                r
            }
            _ => None,
        };

        let processing_time = start_time.elapsed();
        let duration = waveform.duration();
        Ok(EncodeReport {
            wav_path: wav_path.to_path_buf(),
            plot_path: plot_path.map(Path::to_path_buf),
            samples: waveform.len(),
            sample_rate: waveform.sample_rate(),
            duration,
            field_width: field.width(),
            field_height: field.height(),
            lit_rows: field.lit_rows(),
            normalization,
            correlation,
            processing_time,
            real_time_factor: real_time_factor(processing_time, duration),
        })
    }

    /// `prepare_field` followed by `run`
    pub fn run_source(
        &self,
        source: &FieldSource,
        wav_path: &Path,
        plot_path: Option<&Path>,
        preview: Option<&Path>,
    ) -> Result<EncodeReport> {
        let field = self.prepare_field(source, preview)?;
        self.run(&field, wav_path, plot_path)
    }
}

#[derive(Debug, Clone)]
pub struct EncodeReport {
    pub wav_path: PathBuf,
    pub plot_path: Option<PathBuf>,
    pub samples: usize,
    pub sample_rate: u32,
    pub duration: f64,
    pub field_width: usize,
    pub field_height: usize,
    pub lit_rows: usize,
    pub normalization: Normalization,
    /// Field/spectrogram correlation, only with verification on
    pub correlation: Option<f64>,
    pub processing_time: Duration,
    pub real_time_factor: f64,
}

const READ_PLOT_TITLE: &str = "Spectrogram - hidden message";

/// Audio to picture: load a WAV and plot its spectrogram
#[derive(Debug)]
pub struct ReadPipeline {
    config: Config,
}

impl ReadPipeline {
    /// Only the spectrogram section is checked; the synthesis settings play
    /// no part in reading.
    pub fn new(config: Config) -> Result<Self> {
        config.spectrogram.validate()?;
        Ok(Self { config })
    }

    pub fn run(&self, wav_path: &Path, plot_path: &Path) -> Result<ReadReport> {
        let start_time = Instant::now();

        let audio = WavAudio::from_file(wav_path)?;
        info!("Audio: {:.2}s, {}Hz, {}ch, {}",
              audio.duration(), audio.sample_rate(), audio.channels(), audio.format().name());
        let samples = audio.to_mono().to_vec();

        let params = StftParams::from_config(&self.config.spectrogram)?;
        let spectrogram = Spectrogram::compute(&samples, audio.sample_rate(), params)?;
        let dominant_frequency = analysis::peak_frequency(&spectrogram);

        let options = PlotOptions::from_config(&self.config.spectrogram, READ_PLOT_TITLE)
            .with_colorbar(true);
        SpectrogramPlot::new(&spectrogram, options).save(plot_path)?;

        let processing_time = start_time.elapsed();
        Ok(ReadReport {
            input_path: wav_path.to_path_buf(),
            plot_path: plot_path.to_path_buf(),
            sample_rate: audio.sample_rate(),
            channels: audio.channels(),
            samples: samples.len(),
            duration: audio.duration(),
            frames: spectrogram.frames(),
            dominant_frequency,
            processing_time,
            real_time_factor: real_time_factor(processing_time, audio.duration()),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ReadReport {
    pub input_path: PathBuf,
    pub plot_path: PathBuf,
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: usize,
    pub duration: f64,
    pub frames: usize,
    pub dominant_frequency: f64,
    pub processing_time: Duration,
    pub real_time_factor: f64,
}

fn real_time_factor(processing_time: Duration, audio_duration: f64) -> f64 {
    if audio_duration > 0.0 {
        processing_time.as_secs_f64() / audio_duration
    } else {
        0.0
    }
}
