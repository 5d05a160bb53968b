// this_file: crates/capgen-render/src/warp.rs

//! Quadrilateral glyph warping.
//!
//! The warp follows the classic QUAD image transform: every pixel of the
//! output rectangle is mapped back into an arbitrary source quadrilateral
//! with a bilinear corner interpolation
//!
//! ```text
//! x' = a0 + a1*x + a2*y + a3*x*y
//! y' = b0 + b1*x + b2*y + b3*x*y
//! ```
//!
//! and the source is resampled bilinearly in premultiplied space.

use capgen_core::utils::{opaque_bounds, uniform};
use capgen_core::{CaptchaError, Result};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use rand::Rng;

/// Rectangle ← quadrilateral mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadWarp {
    a: [f64; 4],
    b: [f64; 4],
    width: u32,
    height: u32,
}

impl QuadWarp {
    /// `quad` lists the source corners that land on the output's upper-left,
    /// lower-left, lower-right and upper-right corners, as `x, y` pairs.
    pub fn new(quad: [f64; 8], width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CaptchaError::geometry(format!(
                "quad target must be non-empty, got {width}x{height}"
            )));
        }
        if quad.iter().any(|v| !v.is_finite()) {
            return Err(CaptchaError::geometry("quad corners must be finite"));
        }

        let [x0, y0, x1, y1, x2, y2, x3, y3] = quad;
        let w = width as f64;
        let h = height as f64;
        Ok(Self {
            a: [x0, (x3 - x0) / w, (x1 - x0) / h, (x2 - x3 - x1 + x0) / (w * h)],
            b: [y0, (y3 - y0) / w, (y1 - y0) / h, (y2 - y3 - y1 + y0) / (w * h)],
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Source position for output position `(x, y)`.
    pub fn map(&self, x: f64, y: f64) -> (f64, f64) {
        let xy = x * y;
        (
            self.a[0] + self.a[1] * x + self.a[2] * y + self.a[3] * xy,
            self.b[0] + self.b[1] * x + self.b[2] * y + self.b[3] * xy,
        )
    }

    /// Resample `src` into a new `width × height` image.
    pub fn apply(&self, src: &RgbaImage) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let (sx, sy) = self.map(x as f64 + 0.5, y as f64 + 0.5);
            sample_bilinear(src, sx - 0.5, sy - 0.5)
        })
    }
}

fn sample_bilinear(src: &RgbaImage, fx: f64, fy: f64) -> Rgba<u8> {
    let (width, height) = (src.width() as f64, src.height() as f64);
    if fx <= -1.0 || fy <= -1.0 || fx >= width || fy >= height {
        return Rgba([0, 0, 0, 0]);
    }

    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;

    let mut acc = [0.0f64; 4];
    for (dy, wy) in [(0.0, 1.0 - ty), (1.0, ty)] {
        for (dx, wx) in [(0.0, 1.0 - tx), (1.0, tx)] {
            let weight = wx * wy;
            let (ix, iy) = (x0 + dx, y0 + dy);
            if weight <= 0.0 || ix < 0.0 || iy < 0.0 || ix >= width || iy >= height {
                continue;
            }
            let px = src.get_pixel(ix as u32, iy as u32);
            let alpha = px[3] as f64 * weight;
            acc[0] += px[0] as f64 * alpha;
            acc[1] += px[1] as f64 * alpha;
            acc[2] += px[2] as f64 * alpha;
            acc[3] += alpha;
        }
    }

    if acc[3] <= f64::EPSILON {
        return Rgba([0, 0, 0, 0]);
    }
    let channel = |sum: f64| (sum / acc[3]).round().clamp(0.0, 255.0) as u8;
    Rgba([
        channel(acc[0]),
        channel(acc[1]),
        channel(acc[2]),
        acc[3].round().clamp(0.0, 255.0) as u8,
    ])
}

/// Randomly shear `tile` by pulling its four corners by up to 10% of its size.
///
/// The tile is first stretched by the total corner offsets, then mapped back
/// onto its original extent, so the result has the input's dimensions.
pub fn warp_glyph<R: Rng + ?Sized>(rng: &mut R, tile: &RgbaImage) -> Result<RgbaImage> {
    let (w, h) = tile.dimensions();
    if w == 0 || h == 0 {
        return Err(CaptchaError::geometry(format!(
            "cannot warp an empty {w}x{h} tile"
        )));
    }

    let dx = w as f64 * uniform(rng, 0.0, 0.1);
    let dy = h as f64 * uniform(rng, 0.0, 0.1);
    let x1 = uniform(rng, -dx, dx) as i64;
    let y1 = uniform(rng, -dy, dy) as i64;
    let x2 = uniform(rng, -dx, dx) as i64;
    let y2 = uniform(rng, -dy, dy) as i64;

    let w2 = w as i64 + x1.abs() + x2.abs();
    let h2 = h as i64 + y1.abs() + y2.abs();
    let quad = [
        x1 as f64,
        y1 as f64,
        -x1 as f64,
        (h2 - y2) as f64,
        (w2 + x2) as f64,
        (h2 + y2) as f64,
        (w2 - x2) as f64,
        -y1 as f64,
    ];

    let stretched = imageops::resize(tile, w2 as u32, h2 as u32, FilterType::CatmullRom);
    Ok(QuadWarp::new(quad, w, h)?.apply(&stretched))
}

/// Crop to the bounding box of non-transparent pixels; `None` when fully transparent.
pub fn crop_to_content(image: &RgbaImage) -> Option<RgbaImage> {
    let (x, y, width, height) = opaque_bounds(image)?;
    Some(imageops::crop_imm(image, x, y, width, height).to_image())
}
