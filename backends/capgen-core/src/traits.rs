// this_file: backends/capgen-core/src/traits.rs

//! Renderer abstraction consumed by the synthesis pipeline.

use crate::{Color, Result};
use image::RgbaImage;

/// A font bound to one pixel size, able to measure and rasterize characters.
///
/// Implementations are created once and then shared read-only between
/// generation calls, possibly from several threads.
pub trait GlyphRenderer: Send + Sync {
    /// Human readable label, e.g. `"DejaVuSans@42"`.
    fn name(&self) -> &str;

    /// Pixel size the renderer was built for.
    fn size(&self) -> f32;

    /// Extent `(width, height)` of `ch` when drawn at the origin.
    fn measure(&self, ch: char) -> Result<(u32, u32)>;

    /// Draw `ch` onto a transparent tile of exactly [`measure`](Self::measure) size.
    ///
    /// The tile uses straight (non-premultiplied) alpha.
    fn render(&self, ch: char, color: Color) -> Result<RgbaImage>;
}
