//! Spectroglyph - Hide Text and Images in the Spectrogram of a Sound
//!
//! Each row of a luminance field becomes a sine tone whose amplitude follows
//! the row's brightness over time, so the field reappears when the audio is
//! viewed as a spectrogram.

pub mod analysis;
pub mod audio;
pub mod config;
pub mod error;
pub mod field;
pub mod pipeline;
pub mod spectrogram;
pub mod synthesis;

pub use config::{Cli, Command, Config};
pub use error::{SpectroglyphError, Result};
pub use field::{FieldSource, LuminanceField};
pub use pipeline::{EncodePipeline, EncodeReport, ReadPipeline, ReadReport};
pub use spectrogram::{Colormap, Spectrogram};
pub use synthesis::{AdditiveSynthesizer, FrequencyMap, Waveform};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Log at info (debug when verbose); `RUST_LOG` still takes precedence
pub fn init_logging(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info })
        .parse_default_env()
        .try_init()
        .ok();
}

pub fn get_library_info() -> LibraryInfo {
    LibraryInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

impl std::fmt::Display for LibraryInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} v{} - {}", self.name, self.version, self.description)
    }
}
