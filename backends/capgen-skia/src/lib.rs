// this_file: backends/capgen-skia/src/lib.rs

//! tiny-skia + ttf-parser glyph renderer backend for capgen.
//!
//! Fonts are parsed once with `owned_ttf_parser`, glyph outlines are turned
//! into `tiny_skia` paths and filled into transparent tiles.

pub mod fonts;
pub mod renderer;

pub use fonts::{discover_fonts, discover_system_fonts, load_fonts, FontFace};
pub use renderer::{renderers_for, SkiaGlyphRenderer};
