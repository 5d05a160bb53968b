// this_file: crates/capgen-render/src/layout.rs

//! Left-to-right packing of glyph tiles onto the background.

use capgen_core::surface::composite_over;
use capgen_core::utils::{floor_div, randint};
use capgen_core::{BoundingBox, CaptchaError, GlyphTile, Result};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use log::trace;
use rand::Rng;

/// Composited text canvas at target size plus per-glyph boxes.
#[derive(Debug, Clone)]
pub struct Packed {
    /// Canvas of exactly the target size
    pub image: RgbaImage,
    /// One box per tile, in input order, final-canvas coordinates
    pub bboxes: Vec<BoundingBox>,
    /// Sum of tile widths
    pub text_width: u32,
    /// Canvas width used while pasting, before the final rescale
    pub packed_width: u32,
}

/// Paste `tiles` left to right with random spacing and vertical jitter.
///
/// The canvas is `max(text_width, width)` wide and is scaled back down to
/// `width × height` afterwards; box x/width are scaled along with it. Glyphs
/// pushed past the right edge by spacing jitter are clipped, and so are their boxes.
pub fn pack_glyphs<R: Rng + ?Sized>(
    rng: &mut R,
    background: RgbaImage,
    tiles: &[GlyphTile],
    width: u32,
    height: u32,
) -> Result<Packed> {
    if tiles.is_empty() {
        return Err(CaptchaError::invalid_input("no glyphs to lay out"));
    }
    if width == 0 || height == 0 {
        return Err(CaptchaError::geometry(format!(
            "layout target must be non-empty, got {width}x{height}"
        )));
    }

    let text_width: u64 = tiles.iter().map(|tile| tile.width() as u64).sum();
    let average = text_width / tiles.len() as u64;
    let mut offset = (average as f64 * 0.1) as i64;

    let packed_width = text_width.max(width as u64);
    let packed_width = u32::try_from(packed_width).map_err(|_| {
        CaptchaError::geometry(format!("packed text is too wide ({packed_width}px)"))
    })?;

    let mut canvas = if background.dimensions() == (packed_width, height) {
        background
    } else {
        imageops::resize(&background, packed_width, height, FilterType::CatmullRom)
    };

    let mut bboxes = Vec::with_capacity(tiles.len());
    for tile in tiles {
        let w = tile.width() as i64;
        let h = tile.height() as i64;
        let centered = (height as i64 - h) / 2;
        let y = centered + randint(rng, floor_div(-centered, 2), floor_div(centered, 2));
        let x = offset;

        composite_over(&mut canvas, &tile.image, x, y);
        let bbox = BoundingBox::new(x as i32, y as i32, tile.width(), tile.height());
        trace!(target: "capgen::render", "placed {:?} at {bbox:?}", tile.ch);
        bboxes.push(bbox.clip_to(packed_width, height));

        offset += w + randint(rng, -floor_div(w, 5), floor_div(w, 2));
    }

    if packed_width > width {
        canvas = imageops::resize(&canvas, width, height, FilterType::CatmullRom);
        let ratio = width as f64 / packed_width as f64;
        for bbox in &mut bboxes {
            *bbox = bbox.scale_x(ratio);
        }
    }

    Ok(Packed {
        image: canvas,
        bboxes,
        text_width: text_width as u32,
        packed_width,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn solid_tile(ch: char, width: u32, height: u32) -> GlyphTile {
        GlyphTile {
            ch,
            renderer: "solid".to_string(),
            image: RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255])),
        }
    }

    fn white(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]))
    }

    #[test]
    fn narrow_text_keeps_canvas_and_orders_boxes() {
        let tiles: Vec<_> = "abc".chars().map(|c| solid_tile(c, 20, 30)).collect();
        let mut rng = StdRng::seed_from_u64(3);
        let packed = pack_glyphs(&mut rng, white(160, 60), &tiles, 160, 60).unwrap();

        assert_eq!(packed.image.dimensions(), (160, 60));
        assert_eq!(packed.packed_width, 160);
        assert_eq!(packed.text_width, 60);
        assert_eq!(packed.bboxes.len(), 3);
        assert_eq!(packed.bboxes[0].x, 2);
        for pair in packed.bboxes.windows(2) {
            assert!(pair[0].x <= pair[1].x);
        }
        for bbox in &packed.bboxes {
            assert_eq!((bbox.width, bbox.height), (20, 30));
            // centered offset 15, jitter within [-8, 7]
            assert!((7..=22).contains(&bbox.y), "{bbox:?}");
            let inside = packed.image.get_pixel(bbox.x as u32 + 10, bbox.y as u32 + 15);
            assert_eq!(inside, &Rgba([0, 0, 0, 255]));
        }
    }

    #[test]
    fn wide_text_is_rescaled_into_target() {
        let tiles: Vec<_> = "ABCDEFGHIJ".chars().map(|c| solid_tile(c, 40, 50)).collect();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let packed = pack_glyphs(&mut rng, white(160, 60), &tiles, 160, 60).unwrap();
            assert_eq!(packed.image.dimensions(), (160, 60));
            assert_eq!(packed.packed_width, 400);
            for bbox in &packed.bboxes {
                assert!(bbox.x >= 0 && bbox.y >= 0);
                assert!(bbox.right() <= 160, "{bbox:?}");
                assert!(bbox.bottom() <= 60, "{bbox:?}");
                assert_eq!(bbox.height, 50);
            }
        }
    }

    #[test]
    fn canvas_width_is_text_width_or_target() {
        for (count, tile_width) in [(3, 20), (4, 38), (10, 40), (7, 31)] {
            let tiles: Vec<_> = (0..count).map(|_| solid_tile('m', tile_width, 40)).collect();
            let text_width = count * tile_width;
            for seed in 0..20 {
                let mut rng = StdRng::seed_from_u64(seed);
                let packed = pack_glyphs(&mut rng, white(160, 60), &tiles, 160, 60).unwrap();
                assert_eq!(packed.text_width, text_width);
                assert_eq!(packed.packed_width, text_width.max(160));
                assert_eq!(packed.bboxes.len(), count as usize);
                for bbox in &packed.bboxes {
                    assert!(bbox.right() <= 160, "{bbox:?}");
                }
            }
        }
    }

    #[test]
    fn narrow_text_is_never_rescaled() {
        // 4 × 38 = 152 < 160, even when jitter pushes the last glyph off the edge
        let tiles: Vec<_> = "abcd".chars().map(|c| solid_tile(c, 38, 40)).collect();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let packed = pack_glyphs(&mut rng, white(160, 60), &tiles, 160, 60).unwrap();
            assert_eq!(packed.packed_width, 160);
            // offset starts at int(0.1 * 38) = 3, unscaled
            assert_eq!(packed.bboxes[0].x, 3);
            assert_eq!(packed.bboxes[0].width, 38);
            for bbox in &packed.bboxes {
                assert!(bbox.width <= 38);
                assert!(bbox.right() <= 160, "{bbox:?}");
            }
        }
    }

    #[test]
    fn tall_glyphs_are_clipped_vertically() {
        let tiles = vec![solid_tile('X', 30, 80)];
        let mut rng = StdRng::seed_from_u64(0);
        let packed = pack_glyphs(&mut rng, white(160, 60), &tiles, 160, 60).unwrap();
        let bbox = packed.bboxes[0];
        assert_eq!(bbox.y, 0);
        assert_eq!(bbox.height, 60);
    }

    #[test]
    fn empty_input_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = pack_glyphs(&mut rng, white(160, 60), &[], 160, 60).unwrap_err();
        assert!(matches!(err, CaptchaError::InvalidInput { .. }));
    }
}
