// this_file: crates/capgen-render/src/pool.rs

//! Precomputed (font, size) renderers with uniform random selection.

use capgen_core::{CaptchaError, GlyphRenderer, Result};
use capgen_skia::{renderers_for, FontFace};
use rand::Rng;
use std::sync::Arc;

/// Immutable set of renderers shared by every generation call.
#[derive(Clone)]
pub struct RendererPool {
    renderers: Vec<Arc<dyn GlyphRenderer>>,
}

impl RendererPool {
    pub fn new(renderers: Vec<Arc<dyn GlyphRenderer>>) -> Result<Self> {
        if renderers.is_empty() {
            return Err(CaptchaError::configuration(
                "renderer pool needs at least one (font, size) combination",
            ));
        }
        Ok(Self { renderers })
    }

    /// Cross product of `fonts` and `sizes`.
    pub fn from_fonts(fonts: &[Arc<FontFace>], sizes: &[f32]) -> Result<Self> {
        if fonts.is_empty() {
            return Err(CaptchaError::configuration("no font resources supplied"));
        }
        if sizes.is_empty() {
            return Err(CaptchaError::configuration("no font sizes supplied"));
        }
        Self::new(renderers_for(fonts, sizes)?)
    }

    /// Uniformly random renderer.
    pub fn pick_renderer<R: Rng + ?Sized>(&self, rng: &mut R) -> &Arc<dyn GlyphRenderer> {
        &self.renderers[self.pick_index(rng)]
    }

    /// Index of a uniformly random renderer.
    pub fn pick_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        rng.gen_range(0..self.renderers.len())
    }

    pub fn renderers(&self) -> &[Arc<dyn GlyphRenderer>] {
        &self.renderers
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

impl std::fmt::Debug for RendererPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.renderers.iter().map(|r| r.name()))
            .finish()
    }
}
