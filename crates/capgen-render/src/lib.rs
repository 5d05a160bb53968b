// this_file: crates/capgen-render/src/lib.rs

//! CAPTCHA synthesis pipeline.
//!
//! Stages run in order: background gradient, per-character rasterization
//! and quadrilateral warp, left-to-right packing, noise, smoothing.

pub mod background;
pub mod batch;
pub mod captcha;
pub mod charset;
pub mod filter;
pub mod glyph;
pub mod layout;
pub mod noise;
pub mod pool;
pub mod warp;

#[cfg(test)]
pub(crate) mod test_support;

pub use batch::{BatchGenerator, BatchItem, BatchResult};
pub use captcha::{Captcha, ImageCaptcha};
pub use charset::Charset;
pub use layout::Packed;
pub use pool::RendererPool;
pub use warp::QuadWarp;
