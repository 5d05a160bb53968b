// this_file: backends/capgen-skia/src/renderer.rs

//! `GlyphRenderer` implementation backed by tiny-skia.

use crate::fonts::FontFace;
use capgen_core::{CaptchaError, Color, GlyphRenderer, Result};
use dashmap::DashMap;
use image::{Rgba, RgbaImage};
use log::trace;
use std::sync::Arc;
use tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Transform};
use ttf_parser::OutlineBuilder;

/// Outline builder for converting TrueType outlines to tiny-skia paths
struct SkiaOutlineBuilder {
    builder: PathBuilder,
    scale: f32,
}

impl OutlineBuilder for SkiaOutlineBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(x * self.scale, -y * self.scale);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(x * self.scale, -y * self.scale);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quad_to(
            x1 * self.scale,
            -y1 * self.scale,
            x * self.scale,
            -y * self.scale,
        );
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(
            x1 * self.scale,
            -y1 * self.scale,
            x2 * self.scale,
            -y2 * self.scale,
            x * self.scale,
            -y * self.scale,
        );
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

/// Placement of one character inside its tile, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TileMetrics {
    width: u32,
    height: u32,
    origin_x: f32,
    baseline: f32,
}

/// One font at one pixel size.
pub struct SkiaGlyphRenderer {
    font: Arc<FontFace>,
    size: f32,
    name: String,
    outlines: DashMap<char, Option<Arc<Path>>>,
}

impl SkiaGlyphRenderer {
    pub fn new(font: Arc<FontFace>, size: f32) -> Result<Self> {
        if !size.is_finite() || size <= 0.0 {
            return Err(CaptchaError::configuration(format!(
                "font size {size} is not a positive number"
            )));
        }
        let name = format!("{}@{}", font.label(), size);
        Ok(Self {
            font,
            size,
            name,
            outlines: DashMap::new(),
        })
    }

    pub fn font(&self) -> &Arc<FontFace> {
        &self.font
    }

    fn scale(&self) -> f32 {
        self.size / self.font.face().units_per_em() as f32
    }

    fn metrics(&self, ch: char) -> TileMetrics {
        let face = self.font.face();
        let scale = self.scale();
        let ascender = face.ascender() as f32 * scale;
        let descender = face.descender() as f32 * scale;
        let height = (ascender - descender).ceil().max(0.0) as u32;

        let Some(glyph_id) = face.glyph_index(ch) else {
            return TileMetrics {
                width: 0,
                height,
                origin_x: 0.0,
                baseline: ascender,
            };
        };

        let advance = face.glyph_hor_advance(glyph_id).unwrap_or(0) as f32 * scale;
        let (origin_x, right) = match face.glyph_bounding_box(glyph_id) {
            Some(rect) => (
                (-(rect.x_min as f32) * scale).max(0.0),
                advance.max(rect.x_max as f32 * scale),
            ),
            None => (0.0, advance),
        };

        TileMetrics {
            width: (origin_x + right).ceil().max(0.0) as u32,
            height,
            origin_x,
            baseline: ascender,
        }
    }

    fn outline(&self, ch: char) -> Option<Arc<Path>> {
        if let Some(entry) = self.outlines.get(&ch) {
            return entry.value().clone();
        }

        let face = self.font.face();
        let path = face.glyph_index(ch).and_then(|glyph_id| {
            let mut builder = SkiaOutlineBuilder {
                builder: PathBuilder::new(),
                scale: self.scale(),
            };
            face.outline_glyph(glyph_id, &mut builder)?;
            builder.builder.finish().map(Arc::new)
        });
        trace!(
            target: "capgen::render",
            "{} outline for {ch:?}: {}",
            self.name,
            if path.is_some() { "cached" } else { "empty" }
        );
        self.outlines.insert(ch, path.clone());
        path
    }
}

impl GlyphRenderer for SkiaGlyphRenderer {
    fn name(&self) -> &str {
        &self.name
    }

    fn size(&self) -> f32 {
        self.size
    }

    fn measure(&self, ch: char) -> Result<(u32, u32)> {
        let metrics = self.metrics(ch);
        Ok((metrics.width, metrics.height))
    }

    fn render(&self, ch: char, color: Color) -> Result<RgbaImage> {
        let metrics = self.metrics(ch);
        let mut pixmap = Pixmap::new(metrics.width, metrics.height).ok_or_else(|| {
            CaptchaError::geometry(format!(
                "cannot allocate {}x{} tile for {ch:?} with {}",
                metrics.width, metrics.height, self.name
            ))
        })?;

        if let Some(path) = self.outline(ch) {
            let mut paint = Paint::default();
            paint.set_color_rgba8(color.r, color.g, color.b, color.a);
            paint.anti_alias = true;
            let transform = Transform::from_translate(metrics.origin_x, metrics.baseline);
            pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
        }

        // Every pixel carries the ink color so resampling never bleeds black fringes.
        let mut tile = RgbaImage::new(metrics.width, metrics.height);
        for (dst, src) in tile.pixels_mut().zip(pixmap.pixels()) {
            *dst = Rgba([color.r, color.g, color.b, src.alpha()]);
        }
        Ok(tile)
    }
}

/// Build the (font × size) cross product, font-major.
pub fn renderers_for(
    fonts: &[Arc<FontFace>],
    sizes: &[f32],
) -> Result<Vec<Arc<dyn GlyphRenderer>>> {
    let mut renderers: Vec<Arc<dyn GlyphRenderer>> =
        Vec::with_capacity(fonts.len() * sizes.len());
    for font in fonts {
        for &size in sizes {
            renderers.push(Arc::new(SkiaGlyphRenderer::new(Arc::clone(font), size)?));
        }
    }
    Ok(renderers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::discover_system_fonts;
    use capgen_core::utils::opaque_bounds;

    /// First system font that can draw `A`, if the machine has one.
    fn any_latin_font() -> Option<Arc<FontFace>> {
        discover_system_fonts()
            .into_iter()
            .filter_map(|path| FontFace::from_path(path).ok())
            .find(|font| {
                let face = font.face();
                face.glyph_index('A')
                    .and_then(|id| face.glyph_bounding_box(id))
                    .is_some()
            })
            .map(Arc::new)
    }

    #[test]
    fn renders_visible_glyph_with_measured_size() {
        let _ = env_logger::builder().is_test(true).try_init();
        let Some(font) = any_latin_font() else {
            eprintln!("no system font available, skipping");
            return;
        };
        let renderer = SkiaGlyphRenderer::new(font, 42.0).unwrap();
        let (w, h) = renderer.measure('A').unwrap();
        assert!(w > 0 && h > 0);

        let tile = renderer.render('A', Color::rgba(10, 20, 30, 240)).unwrap();
        assert_eq!(tile.dimensions(), (w, h));
        let (_, _, bw, bh) = opaque_bounds(&tile).expect("glyph should have ink");
        assert!(bw > 1 && bh > 1);
        assert!(tile.pixels().all(|px| px[0] == 10 && px[1] == 20 && px[2] == 30));
        assert!(tile.pixels().all(|px| px[3] <= 240));
    }

    #[test]
    fn larger_size_measures_taller() {
        let Some(font) = any_latin_font() else {
            return;
        };
        let small = SkiaGlyphRenderer::new(Arc::clone(&font), 20.0).unwrap();
        let large = SkiaGlyphRenderer::new(font, 56.0).unwrap();
        assert!(large.measure('A').unwrap().1 > small.measure('A').unwrap().1);
        assert!(large.name().ends_with("@56"));
    }

    #[test]
    fn cross_product_is_font_major() {
        let Some(font) = any_latin_font() else {
            return;
        };
        let renderers = renderers_for(&[Arc::clone(&font), font], &[42.0, 50.0, 56.0]).unwrap();
        assert_eq!(renderers.len(), 6);
        let sizes: Vec<f32> = renderers.iter().map(|r| r.size()).collect();
        assert_eq!(sizes, vec![42.0, 50.0, 56.0, 42.0, 50.0, 56.0]);
    }

    #[test]
    fn rejects_non_positive_size() {
        let Some(font) = any_latin_font() else {
            return;
        };
        assert!(SkiaGlyphRenderer::new(font, 0.0).is_err());
    }
}
