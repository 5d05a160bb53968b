// this_file: backends/capgen-core/src/types.rs

//! Core types shared by the renderer backends and the synthesis pipeline.

use crate::{CaptchaError, Result};
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 8-bit RGBA color. Opaque colors carry `a == 255`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn channels(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.a])
    }
}

impl From<Rgba<u8>> for Color {
    fn from(px: Rgba<u8>) -> Self {
        let [r, g, b, a] = px.0;
        Self { r, g, b, a }
    }
}

/// Placement of one character in final-canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Intersect with the `width × height` canvas rectangle anchored at the origin.
    pub fn clip_to(&self, width: u32, height: u32) -> Self {
        let left = (self.x as i64).clamp(0, width as i64);
        let top = (self.y as i64).clamp(0, height as i64);
        let right = self.right().clamp(0, width as i64);
        let bottom = self.bottom().clamp(0, height as i64);
        Self {
            x: left as i32,
            y: top as i32,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        }
    }

    /// Scale the horizontal extent by `ratio`, truncating toward zero.
    pub fn scale_x(&self, ratio: f64) -> Self {
        Self {
            x: (self.x as f64 * ratio) as i32,
            width: (self.width as f64 * ratio) as u32,
            ..*self
        }
    }
}

/// One rendered, warped character cropped to its opaque extent.
#[derive(Debug, Clone)]
pub struct GlyphTile {
    /// Character the tile was rendered from
    pub ch: char,
    /// Label of the renderer that produced it
    pub renderer: String,
    /// Straight-alpha RGBA pixels
    pub image: RgbaImage,
}

impl GlyphTile {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Short diagonal dot strokes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotNoise {
    /// Number of dots
    pub count: u32,
    /// Stroke width in pixels
    pub width: f32,
}

impl Default for DotNoise {
    fn default() -> Self {
        Self {
            count: 60,
            width: 3.0,
        }
    }
}

/// Elliptical arcs spanning the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveNoise {
    /// Number of arcs
    pub count: u32,
    /// Upper bound for the random stroke thickness
    pub max_thickness: u32,
}

impl Default for CurveNoise {
    fn default() -> Self {
        Self {
            count: 5,
            max_thickness: 3,
        }
    }
}

/// Noise drawn over the composed image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub dots: DotNoise,
    pub curves: CurveNoise,
}

/// Generator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptchaConfig {
    /// Target image width in pixels
    pub width: u32,
    /// Target image height in pixels
    pub height: u32,
    /// Pixel sizes combined with every supplied font
    pub font_sizes: Vec<f32>,
    /// Distractor shapes
    pub noise: NoiseConfig,
    /// Apply the smoothing pass after noise
    pub smooth: bool,
}

impl Default for CaptchaConfig {
    fn default() -> Self {
        Self {
            width: 160,
            height: 60,
            font_sizes: vec![42.0, 50.0, 56.0],
            noise: NoiseConfig::default(),
            smooth: true,
        }
    }
}

impl CaptchaConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_font_sizes(mut self, sizes: impl IntoIterator<Item = f32>) -> Self {
        self.font_sizes = sizes.into_iter().collect();
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    /// Reject settings the pipeline cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CaptchaError::configuration(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.font_sizes.is_empty() {
            return Err(CaptchaError::configuration("font_sizes is empty"));
        }
        if let Some(size) = self
            .font_sizes
            .iter()
            .find(|size| !size.is_finite() || **size <= 0.0)
        {
            return Err(CaptchaError::configuration(format!(
                "font size {size} is not a positive number"
            )));
        }
        let dot_width = self.noise.dots.width;
        if self.noise.dots.count > 0 && (!dot_width.is_finite() || dot_width <= 0.0) {
            return Err(CaptchaError::configuration(
                "dot noise width must be positive",
            ));
        }
        if self.noise.curves.count > 0 && self.noise.curves.max_thickness == 0 {
            return Err(CaptchaError::configuration(
                "curve noise max_thickness must be at least 1",
            ));
        }
        Ok(())
    }
}
