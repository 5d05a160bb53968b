// this_file: crates/capgen-render/src/test_support.rs

//! Font-free renderers for pipeline tests.

use capgen_core::{Color, GlyphRenderer, Result};
use image::{Rgba, RgbaImage};
use std::sync::Arc;

/// Paints a solid block with a one pixel transparent margin.
pub struct BlockRenderer {
    name: String,
    width: u32,
    height: u32,
}

impl BlockRenderer {
    pub fn shared(name: &str, width: u32, height: u32) -> Arc<dyn GlyphRenderer> {
        Arc::new(Self {
            name: name.to_string(),
            width,
            height,
        })
    }
}

impl GlyphRenderer for BlockRenderer {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> f32 {
        self.height as f32
    }

    fn measure(&self, ch: char) -> Result<(u32, u32)> {
        if ch.is_whitespace() {
            return Ok((self.width / 2, self.height));
        }
        Ok((self.width, self.height))
    }

    fn render(&self, ch: char, color: Color) -> Result<RgbaImage> {
        let (width, height) = self.measure(ch)?;
        let mut tile = RgbaImage::from_pixel(width, height, Rgba([color.r, color.g, color.b, 0]));
        if ch.is_whitespace() {
            return Ok(tile);
        }
        for y in 1..height.saturating_sub(1) {
            for x in 1..width.saturating_sub(1) {
                tile.put_pixel(x, y, color.to_rgba());
            }
        }
        Ok(tile)
    }
}
