// this_file: crates/capgen-render/src/glyph.rs

//! Per-character rasterization: render, warp, crop.

use crate::pool::RendererPool;
use crate::warp::{crop_to_content, warp_glyph};
use capgen_core::utils::near_opaque_color;
use capgen_core::{CaptchaError, GlyphRenderer, GlyphTile, Result};
use log::{trace, warn};
use rand::seq::SliceRandom;
use rand::Rng;

/// Render `ch` with a random renderer, warp it and crop it to its ink.
///
/// When the picked renderer leaves no opaque pixels (for example a font
/// without that glyph) the remaining renderers are tried in random order.
pub fn draw_character<R: Rng + ?Sized>(
    rng: &mut R,
    pool: &RendererPool,
    ch: char,
) -> Result<GlyphTile> {
    let first = pool.pick_index(rng);
    let renderers = pool.renderers();
    if let Some(tile) = render_with(rng, renderers[first].as_ref(), ch)? {
        return Ok(tile);
    }

    let mut fallbacks: Vec<usize> = (0..renderers.len()).filter(|i| *i != first).collect();
    fallbacks.shuffle(rng);

    let mut last = renderers[first].name();
    for index in fallbacks {
        warn!(
            target: "capgen::render",
            "{last} produced no ink for {ch:?}, trying {}",
            renderers[index].name()
        );
        if let Some(tile) = render_with(rng, renderers[index].as_ref(), ch)? {
            return Ok(tile);
        }
        last = renderers[index].name();
    }

    Err(CaptchaError::EmptyGlyph {
        ch,
        renderer: last.to_string(),
    })
}

fn render_with<R: Rng + ?Sized>(
    rng: &mut R,
    renderer: &dyn GlyphRenderer,
    ch: char,
) -> Result<Option<GlyphTile>> {
    let (w, h) = renderer.measure(ch)?;
    if w == 0 || h == 0 {
        return Ok(None);
    }

    let color = near_opaque_color(rng);
    let tile = renderer.render(ch, color)?;
    if tile.dimensions() != (w, h) {
        return Err(CaptchaError::geometry(format!(
            "{} measured {ch:?} as {w}x{h} but rendered {}x{}",
            renderer.name(),
            tile.width(),
            tile.height()
        )));
    }

    let warped = warp_glyph(rng, &tile)?;
    let Some(image) = crop_to_content(&warped) else {
        return Ok(None);
    };
    trace!(
        target: "capgen::render",
        "{ch:?} via {}: {w}x{h} -> {}x{}",
        renderer.name(),
        image.width(),
        image.height()
    );
    Ok(Some(GlyphTile {
        ch,
        renderer: renderer.name().to_string(),
        image,
    }))
}
