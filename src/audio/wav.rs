//! WAV audio file processing

use std::path::Path;
use std::fs::File;
use std::io::BufWriter;
use hound::{WavReader, WavWriter, SampleFormat};
use ndarray::{Array1, Array2};
use crate::error::{SpectroglyphError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Int8,
    Int16,
    Int24,
    Int32,
    Float32,
}

impl AudioFormat {
    pub fn name(&self) -> &'static str {
        match self {
            AudioFormat::Int8 => "int8",
            AudioFormat::Int16 => "int16",
            AudioFormat::Int24 => "int24",
            AudioFormat::Int32 => "int32",
            AudioFormat::Float32 => "float32",
        }
    }

    pub fn bits_per_sample(&self) -> u16 {
        match self {
            AudioFormat::Int8 => 8,
            AudioFormat::Int16 => 16,
            AudioFormat::Int24 => 24,
            AudioFormat::Int32 | AudioFormat::Float32 => 32,
        }
    }

    pub fn to_sample_format(self) -> SampleFormat {
        match self {
            AudioFormat::Float32 => SampleFormat::Float,
            _ => SampleFormat::Int,
        }
    }

    fn from_spec(spec: &hound::WavSpec) -> Option<Self> {
        match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Int, 8) => Some(AudioFormat::Int8),
            (SampleFormat::Int, 16) => Some(AudioFormat::Int16),
            (SampleFormat::Int, 24) => Some(AudioFormat::Int24),
            (SampleFormat::Int, 32) => Some(AudioFormat::Int32),
            (SampleFormat::Float, 32) => Some(AudioFormat::Float32),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AudioHeader {
    pub sample_rate: u32,
    pub channels: u16,
    pub format: AudioFormat,
    pub total_samples: u32,
    pub duration: f64,
}

impl AudioHeader {
    pub fn new(sample_rate: u32, channels: u16, format: AudioFormat, total_samples: u32) -> Self {
        Self {
            sample_rate,
            channels,
            format,
            total_samples,
            duration: total_samples as f64 / sample_rate as f64,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(SpectroglyphError::audio("Sample rate cannot be 0"));
        }
        if self.channels == 0 || self.channels > 2 {
            return Err(SpectroglyphError::audio("Channel count must be 1 or 2"));
        }
        Ok(())
    }

    pub fn to_wav_spec(&self) -> hound::WavSpec {
        hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.format.bits_per_sample(),
            sample_format: self.format.to_sample_format(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum AudioData {
    Mono(Array1<f32>),
    Stereo(Array2<f32>),
}

impl AudioData {
    pub fn len(&self) -> usize {
        match self {
            AudioData::Mono(data) => data.len(),
            AudioData::Stereo(data) => data.nrows(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn channels(&self) -> u16 {
        match self {
            AudioData::Mono(_) => 1,
            AudioData::Stereo(_) => 2,
        }
    }

    /// Average the channels into one
    pub fn to_mono(&self) -> Array1<f32> {
        match self {
            AudioData::Mono(data) => data.clone(),
            AudioData::Stereo(data) => {
                Array1::from_iter(data.rows().into_iter().map(|frame| (frame[0] + frame[1]) / 2.0))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct WavAudio {
    pub header: AudioHeader,
    pub data: AudioData,
}

impl WavAudio {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let reader = WavReader::open(path)
            .map_err(|e| SpectroglyphError::audio(format!("Cannot open audio file {}: {}", path.display(), e)))?;

        let spec = reader.spec();
        if spec.sample_rate == 0 {
            return Err(SpectroglyphError::audio("Invalid sample rate"));
        }
        if spec.channels == 0 || spec.channels > 2 {
            return Err(SpectroglyphError::audio("Only mono or stereo audio supported"));
        }

        let format = AudioFormat::from_spec(&spec).ok_or_else(|| {
            SpectroglyphError::audio(format!(
                "Unsupported sample format: {:?} {}-bit", spec.sample_format, spec.bits_per_sample
            ))
        })?;

        let samples = match format {
            AudioFormat::Float32 => reader.into_samples::<f32>()
                .collect::<std::result::Result<Vec<f32>, _>>(),
            // Integer PCM scaled so full scale maps to [-1, 1)
            _ => {
                let full_scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader.into_samples::<i32>()
                    .map(|s| s.map(|s| s as f32 / full_scale))
                    .collect::<std::result::Result<Vec<f32>, _>>()
            }
        }
        .map_err(|e| SpectroglyphError::audio(format!("Failed to read sample: {}", e)))?;

        let data = if spec.channels == 1 {
            AudioData::Mono(Array1::from(samples))
        } else {
            let frames = samples.len() / 2;
            let stereo = Array2::from_shape_vec((frames, 2), samples[..frames * 2].to_vec())
                .map_err(|e| SpectroglyphError::audio(format!("Malformed stereo data: {}", e)))?;
            AudioData::Stereo(stereo)
        };

        let header = AudioHeader::new(spec.sample_rate, spec.channels, format, data.len() as u32);
        header.validate()?;

        Ok(WavAudio { header, data })
    }

    pub fn sample_rate(&self) -> u32 {
        self.header.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.header.channels
    }

    pub fn total_samples(&self) -> u32 {
        self.header.total_samples
    }

    pub fn duration(&self) -> f64 {
        self.header.duration
    }

    pub fn format(&self) -> AudioFormat {
        self.header.format
    }

    pub fn to_mono(&self) -> Array1<f32> {
        self.data.to_mono()
    }
}

/// Write single-channel 16-bit PCM
pub fn write_pcm16<P: AsRef<Path>>(path: P, sample_rate: u32, samples: &[i16]) -> Result<()> {
    let path = path.as_ref();
    let header = AudioHeader::new(sample_rate, 1, AudioFormat::Int16, samples.len() as u32);
    header.validate()?;

    let mut writer = create_writer(path, header.to_wav_spec())?;
    for &sample in samples {
        writer.write_sample(sample)
            .map_err(|e| SpectroglyphError::audio(format!("Failed to write sample: {}", e)))?;
    }

    writer.finalize()
        .map_err(|e| SpectroglyphError::audio(format!("Failed to finalize WAV writing: {}", e)))
}

fn create_writer(path: &Path, spec: hound::WavSpec) -> Result<WavWriter<BufWriter<File>>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| SpectroglyphError::audio(format!("Cannot create output directory: {}", e)))?;
    }

    WavWriter::create(path, spec)
        .map_err(|e| SpectroglyphError::audio(format!("Cannot create output file {}: {}", path.display(), e)))
}
