// this_file: src/lib.rs

//! capgen: synthetic CAPTCHA images with per-character bounding boxes.
//!
//! ```no_run
//! use capgen::{CaptchaConfig, ImageCaptcha};
//! use rand::SeedableRng;
//!
//! let fonts = capgen::discover_fonts("fonts")?;
//! let captcha = ImageCaptcha::from_font_paths(&fonts, CaptchaConfig::default())?;
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let sample = captcha.generate_image_with_bboxes(&mut rng, "7gF")?;
//! assert_eq!(sample.bboxes.len(), 3);
//! # Ok::<(), capgen::CaptchaError>(())
//! ```

pub use capgen_core::{
    composite_over, encode_png, BoundingBox, CaptchaConfig, CaptchaError, Color, CurveNoise,
    DotNoise, GlyphRenderer, GlyphTile, NoiseConfig, Result,
};
pub use capgen_render::{
    background, filter, glyph, layout, noise, warp, BatchGenerator, BatchItem, BatchResult,
    Captcha, Charset, ImageCaptcha, RendererPool,
};
pub use capgen_skia::{
    discover_fonts, discover_system_fonts, load_fonts, renderers_for, FontFace, SkiaGlyphRenderer,
};
