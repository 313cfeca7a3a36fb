//! Error Types

use thiserror::Error;

/// Main error type
#[derive(Debug, Clone, Error)]
pub enum SpectroglyphError {
    #[error("Config error: {message}")]
    Config { message: String },
    #[error("Image error: {message}")]
    Image { message: String },
    #[error("Audio error: {message}")]
    Audio { message: String },
    #[error("Synthesis error: {message}")]
    Synthesis { message: String },
    #[error("Render error: {message}")]
    Render { message: String },
    #[error("IO error: {message}")]
    Io { message: String },
}

impl SpectroglyphError {
    pub fn config<S: Into<String>>(msg: S) -> Self { Self::Config { message: msg.into() } }
    pub fn image<S: Into<String>>(msg: S) -> Self { Self::Image { message: msg.into() } }
    pub fn audio<S: Into<String>>(msg: S) -> Self { Self::Audio { message: msg.into() } }
    pub fn synthesis<S: Into<String>>(msg: S) -> Self { Self::Synthesis { message: msg.into() } }
    pub fn render<S: Into<String>>(msg: S) -> Self { Self::Render { message: msg.into() } }
    pub fn io<S: Into<String>>(msg: S) -> Self { Self::Io { message: msg.into() } }
}

pub type Result<T> = std::result::Result<T, SpectroglyphError>;

impl From<std::io::Error> for SpectroglyphError {
    fn from(err: std::io::Error) -> Self { Self::io(err.to_string()) }
}

impl From<image::ImageError> for SpectroglyphError {
    fn from(err: image::ImageError) -> Self { Self::image(err.to_string()) }
}

impl From<hound::Error> for SpectroglyphError {
    fn from(err: hound::Error) -> Self { Self::audio(format!("WAV: {}", err)) }
}

impl From<png::EncodingError> for SpectroglyphError {
    fn from(err: png::EncodingError) -> Self { Self::render(format!("PNG: {}", err)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = SpectroglyphError::image("cannot decode");
        assert_eq!(e.to_string(), "Image error: cannot decode");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let e: SpectroglyphError = io.into();
        assert!(matches!(e, SpectroglyphError::Io { .. }));
        assert!(e.to_string().contains("missing"));
    }
}
