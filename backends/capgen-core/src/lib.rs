// this_file: backends/capgen-core/src/lib.rs

//! Core traits and types for the capgen CAPTCHA generator.

pub mod diagnostics;
pub mod error;
pub mod surface;
pub mod traits;
pub mod types;
pub mod utils;

pub use diagnostics::GenerationDiagnostics;
pub use error::CaptchaError;
pub use surface::{composite_over, encode_png, RenderSurface};
pub use traits::GlyphRenderer;
pub use types::{
    BoundingBox, CaptchaConfig, Color, CurveNoise, DotNoise, GlyphTile, NoiseConfig,
};

/// Result type for capgen operations
pub type Result<T> = std::result::Result<T, CaptchaError>;
