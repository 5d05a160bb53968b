// this_file: crates/capgen-render/src/filter.rs

//! Final smoothing pass.

use image::{Rgba, RgbaImage};

/// 3×3 smoothing kernel, row-major. Weights sum to [`SMOOTH_SCALE`].
pub const SMOOTH_KERNEL: [u32; 9] = [1, 1, 1, 1, 5, 1, 1, 1, 1];
pub const SMOOTH_SCALE: u32 = 13;

/// Convolve every channel with [`SMOOTH_KERNEL`].
///
/// Edge pixels reuse their nearest in-bounds neighbour. Results are rounded.
pub fn smooth(image: &RgbaImage) -> RgbaImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }

    let max_x = width as i64 - 1;
    let max_y = height as i64 - 1;

    RgbaImage::from_fn(width, height, |x, y| {
        let mut acc = [0u32; 4];
        for (k, weight) in SMOOTH_KERNEL.iter().enumerate() {
            let dx = (k % 3) as i64 - 1;
            let dy = (k / 3) as i64 - 1;
            let sx = (x as i64 + dx).clamp(0, max_x) as u32;
            let sy = (y as i64 + dy).clamp(0, max_y) as u32;
            let px = image.get_pixel(sx, sy);
            for (sum, channel) in acc.iter_mut().zip(px.0) {
                *sum += channel as u32 * weight;
            }
        }
        Rgba(acc.map(|sum| ((sum + SMOOTH_SCALE / 2) / SMOOTH_SCALE) as u8))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_is_normalised() {
        assert_eq!(SMOOTH_KERNEL.iter().sum::<u32>(), SMOOTH_SCALE);
    }

    #[test]
    fn uniform_image_is_unchanged() {
        let image = RgbaImage::from_pixel(9, 5, Rgba([120, 7, 255, 255]));
        assert_eq!(smooth(&image), image);
    }

    #[test]
    fn bright_pixel_spreads_to_neighbours() {
        let mut image = RgbaImage::from_pixel(5, 5, Rgba([0, 0, 0, 255]));
        image.put_pixel(2, 2, Rgba([130, 130, 130, 255]));
        let out = smooth(&image);

        // 130 * 5 / 13 = 50, 130 / 13 = 10
        assert_eq!(out.get_pixel(2, 2)[0], 50);
        assert_eq!(out.get_pixel(1, 1)[0], 10);
        assert_eq!(out.get_pixel(3, 2)[0], 10);
        assert_eq!(out.get_pixel(0, 0)[0], 0);
        assert!(out.pixels().all(|px| px[3] == 255));
    }

    #[test]
    fn corners_clamp_to_edge() {
        let mut image = RgbaImage::from_pixel(3, 3, Rgba([0, 0, 0, 255]));
        image.put_pixel(0, 0, Rgba([13, 0, 0, 255]));
        // clamped taps hit the corner three times at weight 1, once at weight 5
        assert_eq!(smooth(&image).get_pixel(0, 0)[0], 8);
    }

    #[test]
    fn single_pixel_image() {
        let image = RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 4]));
        assert_eq!(smooth(&image), image);
    }
}
