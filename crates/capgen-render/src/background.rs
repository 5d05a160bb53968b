// this_file: crates/capgen-render/src/background.rs

//! Horizontal two-color gradient backgrounds.

use capgen_core::{CaptchaError, Color, Result};
use image::{Rgba, RgbaImage};
use rand::Rng;

/// One gradient row of `width` samples from `color1` to `color2`.
///
/// Channels are interpolated independently and truncated toward zero,
/// the first sample is exactly `color1` and the last exactly `color2`.
pub fn gradient_row(color1: Color, color2: Color, width: u32) -> Vec<Rgba<u8>> {
    let from = color1.channels();
    let to = color2.channels();
    let span = width.saturating_sub(1) as f64;

    (0..width)
        .map(|i| {
            let mut px = [0u8, 0, 0, 255];
            for c in 0..3 {
                let delta = to[c] as f64 - from[c] as f64;
                let value = if span == 0.0 {
                    from[c] as f64
                } else {
                    from[c] as f64 + delta * i as f64 / span
                };
                px[c] = value.clamp(0.0, 255.0) as u8;
            }
            Rgba(px)
        })
        .collect()
}

/// Opaque `width × height` gradient; the two colors swap with probability 0.5.
pub fn generate_background<R: Rng + ?Sized>(
    rng: &mut R,
    color1: Color,
    color2: Color,
    width: u32,
    height: u32,
) -> Result<RgbaImage> {
    if width == 0 || height == 0 {
        return Err(CaptchaError::geometry(format!(
            "background must be non-empty, got {width}x{height}"
        )));
    }

    let (color1, color2) = if rng.gen::<f64>() > 0.5 {
        (color2, color1)
    } else {
        (color1, color2)
    };

    let row = gradient_row(color1, color2, width);
    Ok(RgbaImage::from_fn(width, height, |x, _| row[x as usize]))
}
