// this_file: crates/capgen-render/src/captcha.rs

//! Top-level generator tying the pipeline stages together.

use crate::background;
use crate::filter::smooth;
use crate::glyph::draw_character;
use crate::layout::pack_glyphs;
use crate::noise::{create_noise_curve, create_noise_dots};
use crate::pool::RendererPool;
use capgen_core::utils::{near_opaque_color, random_color};
use capgen_core::{
    encode_png, BoundingBox, CaptchaConfig, CaptchaError, Color, GenerationDiagnostics, Result,
};
use capgen_skia::{load_fonts, FontFace};
use image::RgbaImage;
use log::debug;
use rand::Rng;
use std::path::Path;
use std::sync::Arc;

/// A generated image together with its label and per-character boxes.
#[derive(Debug, Clone)]
pub struct Captcha {
    pub text: String,
    pub image: RgbaImage,
    /// One box per character of `text`, in order
    pub bboxes: Vec<BoundingBox>,
}

impl Captcha {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Encode the image as PNG into memory.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        encode_png(&self.image)
    }
}

/// CAPTCHA generator bound to a renderer pool and fixed settings.
///
/// Immutable after construction; share it freely across threads and give
/// each call its own random source.
#[derive(Debug, Clone)]
pub struct ImageCaptcha {
    config: CaptchaConfig,
    pool: RendererPool,
}

impl ImageCaptcha {
    pub fn new(pool: RendererPool, config: CaptchaConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, pool })
    }

    /// Combine every font with every configured size.
    pub fn from_fonts(fonts: &[Arc<FontFace>], config: CaptchaConfig) -> Result<Self> {
        config.validate()?;
        let pool = RendererPool::from_fonts(fonts, &config.font_sizes)?;
        Ok(Self { config, pool })
    }

    pub fn from_font_paths<P: AsRef<Path>>(paths: &[P], config: CaptchaConfig) -> Result<Self> {
        if paths.is_empty() {
            return Err(CaptchaError::configuration("no font resources supplied"));
        }
        let fonts = load_fonts(paths)?;
        Self::from_fonts(&fonts, config)
    }

    pub fn config(&self) -> &CaptchaConfig {
        &self.config
    }

    pub fn pool(&self) -> &RendererPool {
        &self.pool
    }

    /// Horizontal gradient at the configured size.
    pub fn generate_background<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        color1: Color,
        color2: Color,
    ) -> Result<RgbaImage> {
        background::generate_background(rng, color1, color2, self.config.width, self.config.height)
    }

    /// Background plus packed glyphs, without noise or smoothing.
    pub fn create_captcha_image<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        chars: &str,
        background: (Color, Color),
    ) -> Result<Captcha> {
        if chars.is_empty() {
            return Err(CaptchaError::invalid_input("character string is empty"));
        }
        let (width, height) = (self.config.width, self.config.height);

        let canvas = self.generate_background(rng, background.0, background.1)?;
        let mut tiles = Vec::with_capacity(chars.chars().count());
        for ch in chars.chars() {
            tiles.push(draw_character(rng, &self.pool, ch)?);
        }

        let packed = pack_glyphs(rng, canvas, &tiles, width, height)?;

        GenerationDiagnostics::new(
            chars,
            tiles.iter().map(|tile| tile.renderer.as_str()).collect(),
            packed.text_width,
            packed.packed_width,
            (width, height),
            &packed.bboxes,
        )
        .log();

        Ok(Captcha {
            text: chars.to_string(),
            image: packed.image,
            bboxes: packed.bboxes,
        })
    }

    /// Full pipeline; see [`Self::generate_image_with_bboxes`].
    pub fn generate_image<R: Rng + ?Sized>(&self, rng: &mut R, chars: &str) -> Result<RgbaImage> {
        Ok(self.generate_image_with_bboxes(rng, chars)?.image)
    }

    /// Random background colors, glyphs, noise dots in one shared color,
    /// arcs in per-arc colors, then the smoothing pass.
    pub fn generate_image_with_bboxes<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        chars: &str,
    ) -> Result<Captcha> {
        let light = random_color(rng, 238, 255);
        let broad = random_color(rng, 50, 255);
        let noise_color = near_opaque_color(rng);

        let mut captcha = self.create_captcha_image(rng, chars, (light, broad))?;

        let noise = &self.config.noise;
        create_noise_dots(
            rng,
            &mut captcha.image,
            Some(noise_color),
            noise.dots.width,
            noise.dots.count,
        )?;
        create_noise_curve(
            rng,
            &mut captcha.image,
            None,
            noise.curves.count,
            noise.curves.max_thickness,
        )?;

        if self.config.smooth {
            captcha.image = smooth(&captcha.image);
        }
        debug!(
            target: "capgen::render",
            "generated {:?} at {}x{}",
            captcha.text,
            captcha.width(),
            captcha.height()
        );
        Ok(captcha)
    }

    /// [`Self::generate_image_with_bboxes`] with the thread-local random source.
    pub fn generate(&self, chars: &str) -> Result<Captcha> {
        self.generate_image_with_bboxes(&mut rand::thread_rng(), chars)
    }
}
