// this_file: backends/capgen-core/src/surface.rs

//! Conversions between straight-alpha images and premultiplied drawing surfaces.

use crate::{CaptchaError, Result};
use image::RgbaImage;

/// Raw RGBA pixels handed to or received from a vector rasterizer.
#[derive(Debug)]
pub struct RenderSurface {
    width: u32,
    height: u32,
    premultiplied: bool,
    data: Vec<u8>,
}

impl RenderSurface {
    /// Wrap an RGBA buffer, validating its length.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>, premultiplied: bool) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(CaptchaError::geometry(format!(
                "surface {width}x{height} needs {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            premultiplied,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_premultiplied(&self) -> bool {
        self.premultiplied
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Convert back into a straight-alpha image.
    pub fn into_image(mut self) -> Result<RgbaImage> {
        if self.premultiplied {
            unpremultiply(&mut self.data);
        }
        let (width, height) = (self.width, self.height);
        RgbaImage::from_raw(width, height, self.data).ok_or_else(|| {
            CaptchaError::geometry(format!("pixel buffer does not fit {width}x{height}"))
        })
    }
}

fn unpremultiply(data: &mut [u8]) {
    for chunk in data.chunks_exact_mut(4) {
        let alpha = chunk[3] as u32;
        if alpha == 0 || alpha == 255 {
            continue;
        }
        for channel in &mut chunk[..3] {
            let value = (*channel as u32 * 255 + alpha / 2) / alpha;
            *channel = value.min(255) as u8;
        }
    }
}

/// Composite `src` over `dst` with its top-left corner at `(x, y)`.
///
/// Straight-alpha "over" operator; pixels of `src` falling outside `dst`
/// are clipped and fully transparent source pixels leave `dst` untouched.
pub fn composite_over(dst: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64) {
    let (dst_w, dst_h) = (dst.width() as i64, dst.height() as i64);
    let left = x.max(0);
    let top = y.max(0);
    let right = (x + src.width() as i64).min(dst_w);
    let bottom = (y + src.height() as i64).min(dst_h);

    for py in top..bottom {
        for px in left..right {
            let s = src.get_pixel((px - x) as u32, (py - y) as u32);
            let src_a = s[3] as f32 / 255.0;
            if src_a <= 0.0 {
                continue;
            }
            let d = dst.get_pixel_mut(px as u32, py as u32);
            let dst_a = d[3] as f32 / 255.0;
            let out_a = src_a + dst_a * (1.0 - src_a);
            for c in 0..3 {
                let value =
                    (s[c] as f32 * src_a + d[c] as f32 * dst_a * (1.0 - src_a)) / out_a;
                d[c] = value.round().clamp(0.0, 255.0) as u8;
            }
            d[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Encode an image as an in-memory PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, image.width(), image.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|err| CaptchaError::encode(format!("PNG encoder error: {err}")))?;
        writer
            .write_image_data(image.as_raw())
            .map_err(|err| CaptchaError::encode(format!("PNG write error: {err}")))?;
    }
    Ok(png_data)
}
