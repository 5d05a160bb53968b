// this_file: backends/capgen-core/src/utils.rs

//! Utility functions shared across capgen crates.

use crate::types::Color;
use image::RgbaImage;
use rand::Rng;

/// Inclusive random integer in `[a, b]`; the bounds may be given in either order.
pub fn randint<R: Rng + ?Sized>(rng: &mut R, a: i64, b: i64) -> i64 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    rng.gen_range(lo..=hi)
}

/// Uniform float in `[a, b]` (either order), never panics on empty ranges.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, a: f64, b: f64) -> f64 {
    a + (b - a) * rng.gen::<f64>()
}

/// Floor division for a positive divisor.
pub fn floor_div(value: i64, divisor: i64) -> i64 {
    value.div_euclid(divisor)
}

/// Opaque color with every channel drawn from `[start, end]`.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R, start: u8, end: u8) -> Color {
    let red = randint(rng, start as i64, end as i64) as u8;
    let green = randint(rng, start as i64, end as i64) as u8;
    let blue = randint(rng, start as i64, end as i64) as u8;
    Color::rgb(red, green, blue)
}

/// Color with channels drawn from `[start, end]` and a fixed opacity.
pub fn random_color_with_alpha<R: Rng + ?Sized>(
    rng: &mut R,
    start: u8,
    end: u8,
    alpha: u8,
) -> Color {
    let Color { r, g, b, .. } = random_color(rng, start, end);
    Color::rgba(r, g, b, alpha)
}

/// Dark, nearly opaque ink: channels in `[0, 200]`, alpha in `[220, 255]`.
///
/// The alpha is drawn before the channels.
pub fn near_opaque_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    let alpha = randint(rng, 220, 255) as u8;
    random_color_with_alpha(rng, 0, 200, alpha)
}

/// Bounding box `(x, y, width, height)` of pixels with non-zero alpha.
///
/// Returns `None` for a fully transparent image.
pub fn opaque_bounds(image: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let (width, height) = image.dimensions();
    let mut min_x = width;
    let mut min_y = height;
    let mut max_x = 0u32;
    let mut max_y = 0u32;

    for (x, y, px) in image.enumerate_pixels() {
        if px[3] > 0 {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    if min_x > max_x || min_y > max_y {
        return None;
    }

    Some((min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

/// System font directories for different platforms
pub fn system_font_dirs() -> Vec<String> {
    #[cfg(target_os = "macos")]
    {
        vec![
            "/System/Library/Fonts".to_string(),
            "/Library/Fonts".to_string(),
            "~/Library/Fonts".to_string(),
        ]
    }

    #[cfg(target_os = "windows")]
    {
        vec!["C:\\Windows\\Fonts".to_string()]
    }

    #[cfg(target_os = "linux")]
    {
        vec![
            "/usr/share/fonts".to_string(),
            "/usr/local/share/fonts".to_string(),
            "~/.fonts".to_string(),
            "~/.local/share/fonts".to_string(),
        ]
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
    {
        vec![]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_opaque_bounds_empty() {
        let image = RgbaImage::new(10, 5);
        assert_eq!(opaque_bounds(&image), None);
    }

    #[test]
    fn test_opaque_bounds_rectangle() {
        let mut image = RgbaImage::new(100, 50);
        for y in 10..15 {
            for x in 20..30 {
                image.put_pixel(x, y, Rgba([0, 0, 0, 1]));
            }
        }
        assert_eq!(opaque_bounds(&image), Some((20, 10, 10, 5)));
    }

    #[test]
    fn test_opaque_bounds_ignores_color_of_transparent_pixels() {
        let mut image = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 0]));
        image.put_pixel(3, 4, Rgba([0, 0, 0, 255]));
        assert_eq!(opaque_bounds(&image), Some((3, 4, 1, 1)));
    }

    #[test]
    fn test_near_opaque_color_ranges() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let color = near_opaque_color(&mut rng);
            assert!(color.a >= 220);
            assert!(color.channels().iter().all(|c| *c <= 200));
        }
    }

    #[test]
    fn test_random_color_is_opaque_and_bounded() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let color = random_color(&mut rng, 238, 255);
            assert_eq!(color.a, 255);
            assert!(color.channels().iter().all(|c| *c >= 238));
        }
    }

    #[test]
    fn test_randint_accepts_reversed_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let value = randint(&mut rng, 0, -1);
            assert!((-1..=0).contains(&value));
        }
    }

    #[test]
    fn test_floor_div_rounds_toward_negative_infinity() {
        assert_eq!(floor_div(-5, 2), -3);
        assert_eq!(floor_div(5, 2), 2);
        assert_eq!(floor_div(-1, 5), -1);
    }
}
