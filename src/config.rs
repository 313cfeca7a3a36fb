//! Configuration management for spectrogram encoding

use crate::error::{SpectroglyphError, Result};
use crate::spectrogram::Colormap;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_MESSAGE: &str = "COUCOU STOP C'EST LA CIA STOP";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub synthesis: SynthesisConfig,
    pub text: TextConfig,
    pub spectrogram: SpectrogramConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Length of the generated audio in seconds
    pub duration: f64,
    pub sample_rate: u32,
    pub min_freq: f64,
    pub max_freq: f64,
    /// Number of frequency bands (field rows)
    pub height: usize,
    /// Field columns per second of audio
    pub pixels_per_second: f64,
    /// Worker threads, 0 means one per logical CPU
    pub threads: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub message: String,
    /// Number of vertical bands the message is repeated in
    pub lines: usize,
    /// Integer upscaling applied to each font pixel
    pub scale: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrogramConfig {
    pub window_size: usize,
    pub overlap: usize,
    pub colormap: Colormap,
    pub dpi: u32,
    /// Figure size in inches
    pub figure_width: f64,
    pub figure_height: f64,
    pub dynamic_range_db: f64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            duration: 6.0,
            sample_rate: 44100,
            min_freq: 300.0,
            max_freq: 8000.0,
            height: 400,
            pixels_per_second: 200.0,
            threads: 0,
        }
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            message: DEFAULT_MESSAGE.to_string(),
            lines: 4,
            scale: 4,
        }
    }
}

impl Default for SpectrogramConfig {
    fn default() -> Self {
        Self {
            window_size: 1024,
            overlap: 512,
            colormap: Colormap::Inferno,
            dpi: 300,
            figure_width: 10.0,
            figure_height: 6.0,
            dynamic_range_db: 100.0,
        }
    }
}

impl SynthesisConfig {
    /// Field width in columns (truncated, like the pixel canvas it describes)
    pub fn width(&self) -> usize {
        (self.duration * self.pixels_per_second) as usize
    }

    /// Number of audio samples produced for the configured duration
    pub fn total_samples(&self) -> usize {
        (self.sample_rate as f64 * self.duration).round() as usize
    }

    pub fn nyquist(&self) -> f64 {
        self.sample_rate as f64 / 2.0
    }
}

impl SpectrogramConfig {
    pub fn hop_size(&self) -> usize {
        self.window_size - self.overlap
    }

    /// Rendered figure size in pixels
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            (self.figure_width * self.dpi as f64).round() as u32,
            (self.figure_height * self.dpi as f64).round() as u32,
        )
    }

    /// Check the analysis and figure settings on their own; reading a WAV
    /// file needs nothing else
    pub fn validate(&self) -> Result<()> {
        let spec = self;
        if spec.window_size < 2 {
            return Err(SpectroglyphError::config("Spectrogram window must hold at least 2 samples"));
        }
        if spec.overlap >= spec.window_size {
            return Err(SpectroglyphError::config("Spectrogram overlap must be smaller than the window"));
        }
        if spec.dpi == 0 || spec.dpi > 1200 {
            return Err(SpectroglyphError::config("DPI must be in range [1, 1200]"));
        }
        if !(spec.figure_width > 0.0) || !(spec.figure_height > 0.0) {
            return Err(SpectroglyphError::config("Figure size must be positive"));
        }
        let (w, h) = spec.pixel_size();
        if w < 64 || h < 64 || w > 20000 || h > 20000 {
            return Err(SpectroglyphError::config(format!(
                "Figure of {}x{} pixels is outside the supported range", w, h
            )));
        }
        if !(spec.dynamic_range_db > 0.0) {
            return Err(SpectroglyphError::config("Dynamic range must be greater than 0 dB"));
        }

        Ok(())
    }
}

#[derive(Debug, Parser)]
#[command(name = "spectroglyph", about = "Hide text and images in the spectrogram of a sound", version)]
pub struct Cli {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct CommonArgs {
    #[arg(short = 'c', long = "config", global = true, help = "Config file path (TOML format)")]
    pub config_file: Option<PathBuf>,

    #[arg(short = 'v', long = "verbose", global = true, help = "Enable verbose output mode")]
    pub verbose: bool,

    #[arg(short = 'r', long = "sample-rate", global = true, help = "Audio sample rate (Hz)")]
    pub sample_rate: Option<u32>,

    #[arg(short = 'd', long = "duration", global = true, help = "Audio duration (seconds)")]
    pub duration: Option<f64>,

    #[arg(long = "min-freq", global = true, help = "Frequency of the bottom field row (Hz)")]
    pub min_freq: Option<f64>,

    #[arg(long = "max-freq", global = true, help = "Frequency of the top field row (Hz)")]
    pub max_freq: Option<f64>,

    #[arg(long = "colormap", global = true, value_enum, help = "Spectrogram color map")]
    pub colormap: Option<Colormap>,

    #[arg(long = "dpi", global = true, help = "Spectrogram image resolution")]
    pub dpi: Option<u32>,

    #[arg(long = "threads", global = true, help = "Worker thread count (0 = all cores)")]
    pub threads: Option<usize>,
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct EncodeArgs {
    #[arg(short = 'o', long = "output", help = "Output WAV file path")]
    pub output: Option<PathBuf>,

    #[arg(long = "plot", help = "Spectrogram PNG path")]
    pub plot: Option<PathBuf>,

    #[arg(long = "no-plot", conflicts_with = "plot", help = "Do not render a spectrogram")]
    pub no_plot: bool,

    #[arg(long = "preview", help = "Save the field as a PNG before it is flipped")]
    pub preview: Option<PathBuf>,

    #[arg(long = "verify", help = "Report how well the spectrogram reproduces the field")]
    pub verify: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Encode a text message into a WAV file
    Text {
        #[arg(short = 'm', long = "message", help = "Message to encode")]
        message: Option<String>,

        #[command(flatten)]
        encode: EncodeArgs,
    },
    /// Encode an image file into a WAV file
    Image {
        #[arg(value_name = "IMAGE", help = "Image to encode")]
        image: PathBuf,

        #[command(flatten)]
        encode: EncodeArgs,
    },
    /// Render the spectrogram of a WAV file
    Read {
        #[arg(value_name = "WAV", default_value = "message_cache.wav", help = "WAV file to analyze")]
        input: PathBuf,

        #[arg(short = 'o', long = "output", default_value = "spectrogram.png", help = "Spectrogram PNG path")]
        output: PathBuf,
    },
    /// Write the default configuration to a TOML file
    InitConfig {
        #[arg(value_name = "PATH", default_value = "spectroglyph.toml")]
        path: PathBuf,
    },
}

impl Config {
    /// Merge command line overrides into the config file (or the defaults).
    ///
    /// Nothing is validated here; each pipeline checks the sections it uses.
    pub fn from_args(args: &CommonArgs) -> Result<Self> {
        let mut config = if let Some(config_path) = &args.config_file {
            Self::from_file(config_path)?
        } else {
            Self::default()
        };

        // Command line arguments override config file settings
        if let Some(sample_rate) = args.sample_rate {
            config.synthesis.sample_rate = sample_rate;
        }
        if let Some(duration) = args.duration {
            config.synthesis.duration = duration;
        }
        if let Some(min_freq) = args.min_freq {
            config.synthesis.min_freq = min_freq;
        }
        if let Some(max_freq) = args.max_freq {
            config.synthesis.max_freq = max_freq;
        }
        if let Some(threads) = args.threads {
            config.synthesis.threads = threads;
        }
        if let Some(colormap) = args.colormap {
            config.spectrogram.colormap = colormap;
        }
        if let Some(dpi) = args.dpi {
            config.spectrogram.dpi = dpi;
        }

        Ok(config)
    }

    /// Load config from TOML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SpectroglyphError::config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| SpectroglyphError::config(format!("Failed to parse config file: {}", e)))
    }

    /// Validate configuration parameter validity
    pub fn validate(&self) -> Result<()> {
        let synth = &self.synthesis;

        if synth.sample_rate == 0 {
            return Err(SpectroglyphError::config("Sample rate must be greater than 0"));
        }
        if synth.sample_rate > 192000 {
            return Err(SpectroglyphError::config("Sample rate cannot exceed 192000 Hz"));
        }

        if !synth.duration.is_finite() || synth.duration <= 0.0 {
            return Err(SpectroglyphError::config("Duration must be a positive number of seconds"));
        }
        if synth.duration > 600.0 {
            return Err(SpectroglyphError::config("Duration cannot exceed 600 seconds"));
        }

        if !(synth.min_freq >= 0.0) || !(synth.max_freq > synth.min_freq) {
            return Err(SpectroglyphError::config("Frequency range must satisfy 0 <= min_freq < max_freq"));
        }
        if synth.max_freq >= synth.nyquist() {
            return Err(SpectroglyphError::config(format!(
                "Max frequency {} Hz must be below the Nyquist frequency {} Hz",
                synth.max_freq, synth.nyquist()
            )));
        }

        if synth.height < 2 {
            return Err(SpectroglyphError::config("Field height must be at least 2 rows"));
        }
        if !(synth.pixels_per_second > 0.0) || synth.width() == 0 {
            return Err(SpectroglyphError::config("Field must be at least one column wide"));
        }

        if synth.threads > num_cpus::get() * 2 {
            return Err(SpectroglyphError::config("Thread count cannot exceed 2x logical CPU cores"));
        }

        if self.text.message.is_empty() {
            return Err(SpectroglyphError::config("Text message cannot be empty"));
        }
        if self.text.lines == 0 {
            return Err(SpectroglyphError::config("Text must be drawn on at least one line"));
        }
        if self.text.scale == 0 {
            return Err(SpectroglyphError::config("Text scale must be greater than 0"));
        }
        let glyph_height = self.text.scale as u64 * crate::field::font::GLYPH_HEIGHT as u64;
        if glyph_height > synth.height as u64 {
            return Err(SpectroglyphError::config(format!(
                "Text scale {} makes glyphs {} px tall, taller than the {}-row field",
                self.text.scale, glyph_height, synth.height
            )));
        }

        self.spectrogram.validate()
    }

    /// Save config to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SpectroglyphError::config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| SpectroglyphError::config(format!("Failed to write config file: {}", e)))
    }

    /// Create default config file
    pub fn create_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        Self::default().save_to_file(path)
    }
}

pub mod utils {
    /// Resolve a thread setting, 0 meaning every logical core
    pub fn thread_count(requested: usize) -> usize {
        if requested == 0 { num_cpus::get() } else { requested }
    }
}
