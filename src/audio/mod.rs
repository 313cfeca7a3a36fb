//! Audio Module
//!
//! WAV reading and writing. Output is always mono 16-bit PCM; input may be
//! 8/16/24/32-bit integer or 32-bit float, mono or stereo.

pub mod wav;

pub use wav::{write_pcm16, AudioData, AudioFormat, AudioHeader, WavAudio};
