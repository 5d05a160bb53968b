// this_file: backends/capgen-core/src/error.rs

//! Error types for capgen.
//!
//! Every failure is reported synchronously to the caller of the generator;
//! nothing is retried internally and no partial images are returned.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for capgen operations.
#[derive(Error, Debug)]
pub enum CaptchaError {
    /// No usable (font, size) combination or otherwise unusable settings
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    /// Caller supplied input the generator cannot work with
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A character produced no opaque pixels under any renderer
    #[error("Character {ch:?} has no visible glyph (last tried: {renderer})")]
    EmptyGlyph { ch: char, renderer: String },

    /// Degenerate dimensions reached a resize or transform step
    #[error("Degenerate geometry: {reason}")]
    Geometry { reason: String },

    /// Font file not found at specified path
    #[error("Font file not found: {path}")]
    FontNotFound { path: PathBuf },

    /// Invalid font format or corrupted font file
    #[error("Invalid font file at {path}: {reason}")]
    InvalidFont { path: PathBuf, reason: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image encoding error
    #[error("Image encoding error: {reason}")]
    Encode { reason: String },
}

impl CaptchaError {
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn geometry(reason: impl Into<String>) -> Self {
        Self::Geometry {
            reason: reason.into(),
        }
    }

    pub fn encode(reason: impl Into<String>) -> Self {
        Self::Encode {
            reason: reason.into(),
        }
    }

    /// Whether the caller may simply retry with a fresh random draw.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidInput { .. } | Self::EmptyGlyph { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_empty_glyph() {
        let err = CaptchaError::EmptyGlyph {
            ch: ' ',
            renderer: "DejaVuSans@42".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("' '"));
        assert!(msg.contains("DejaVuSans@42"));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_error_display_configuration() {
        let err = CaptchaError::configuration("no fonts supplied");
        assert_eq!(err.to_string(), "Configuration error: no fonts supplied");
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: CaptchaError = io.into();
        assert!(matches!(err, CaptchaError::Io(_)));
    }
}
