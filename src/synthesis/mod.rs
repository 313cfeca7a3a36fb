//! Additive Synthesis
//!
//! Turns a luminance field into a waveform: each row becomes a sine at its
//! band frequency, shaped by the row's intensities over time.

pub mod envelope;
pub mod frequency;
pub mod synthesizer;
pub mod waveform;

pub use envelope::{envelope, TimeAxis};
pub use frequency::FrequencyMap;
pub use synthesizer::AdditiveSynthesizer;
pub use waveform::{Normalization, Waveform};
