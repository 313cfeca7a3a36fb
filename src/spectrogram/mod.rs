//! Spectrogram computation and plotting

pub mod colormap;
pub mod plot;
pub mod stft;

pub use colormap::Colormap;
pub use plot::{write_png, PlotOptions, SpectrogramPlot};
pub use stft::{hann_window, Spectrogram, StftParams};
