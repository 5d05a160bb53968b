// this_file: crates/capgen-render/src/noise.rs

//! Distractor noise: short diagonal dots and canvas-spanning arcs.

use capgen_core::utils::{near_opaque_color, randint};
use capgen_core::{composite_over, CaptchaError, Color, RenderSurface, Result};
use image::RgbaImage;
use log::trace;
use rand::Rng;
use tiny_skia::{LineCap, Paint, Path, PathBuilder, Pixmap, Stroke, Transform};

/// Draw `number` one-pixel diagonal strokes of the given `width` at random positions.
///
/// `color: None` draws every dot in its own random near-opaque color.
/// With `number == 0` the image is left untouched.
pub fn create_noise_dots<R: Rng + ?Sized>(
    rng: &mut R,
    image: &mut RgbaImage,
    color: Option<Color>,
    width: f32,
    number: u32,
) -> Result<()> {
    if number == 0 {
        return Ok(());
    }
    if !width.is_finite() || width <= 0.0 {
        return Err(CaptchaError::invalid_input(format!(
            "dot width must be positive, got {width}"
        )));
    }

    let (w, h) = (image.width() as i64, image.height() as i64);
    let stroke = Stroke {
        width,
        line_cap: LineCap::Butt,
        ..Stroke::default()
    };

    draw_layer(image, |pixmap| {
        for _ in 0..number {
            let x1 = randint(rng, 0, w) as f32;
            let y1 = randint(rng, 0, h) as f32;
            let ink = color.unwrap_or_else(|| near_opaque_color(rng));

            let mut builder = PathBuilder::new();
            builder.move_to(x1, y1);
            builder.line_to(x1 - 1.0, y1 - 1.0);
            if let Some(path) = builder.finish() {
                pixmap.stroke_path(&path, &paint(ink), &stroke, Transform::identity(), None);
            }
        }
    })
}

/// Draw `count` elliptical arcs whose bounding boxes start in the left half
/// and end in the right half of the image.
///
/// Angles are in degrees, clockwise from three o'clock; thickness is drawn
/// from `[1, max_thickness]`. `color: None` picks a fresh color per arc.
pub fn create_noise_curve<R: Rng + ?Sized>(
    rng: &mut R,
    image: &mut RgbaImage,
    color: Option<Color>,
    count: u32,
    max_thickness: u32,
) -> Result<()> {
    if count == 0 {
        return Ok(());
    }
    if max_thickness == 0 {
        return Err(CaptchaError::invalid_input(
            "arc max_thickness must be at least 1",
        ));
    }

    let (w, h) = (image.width() as i64, image.height() as i64);

    draw_layer(image, |pixmap| {
        for _ in 0..count {
            let ink = color.unwrap_or_else(|| near_opaque_color(rng));
            let x1 = randint(rng, 0, w / 2);
            let x2 = randint(rng, w / 2 + 1, w);
            let y1 = randint(rng, 0, h - 1);
            let y2 = randint(rng, y1 + 1, h);
            let thickness = randint(rng, 1, max_thickness as i64);
            let end = randint(rng, 0, 359);
            let start = randint(rng, 0, 359);

            let bounds = [x1 as f32, y1 as f32, x2 as f32, y2 as f32];
            trace!(
                target: "capgen::render",
                "arc {bounds:?} {start}..{end} deg, thickness {thickness}"
            );
            let Some(path) = arc_path(bounds, start as f32, end as f32) else {
                continue;
            };
            let stroke = Stroke {
                width: thickness as f32,
                ..Stroke::default()
            };
            pixmap.stroke_path(&path, &paint(ink), &stroke, Transform::identity(), None);
        }
    })
}

/// Polyline approximation of the arc of the ellipse inscribed in `bounds`.
///
/// Sweeps clockwise from `start` to `end` degrees; `end` is advanced by whole
/// turns until it is not before `start`. Equal angles draw nothing.
pub fn arc_path(bounds: [f32; 4], start: f32, end: f32) -> Option<Path> {
    let [x1, y1, x2, y2] = bounds;
    let (cx, cy) = ((x1 + x2) / 2.0, (y1 + y2) / 2.0);
    let (rx, ry) = ((x2 - x1).abs() / 2.0, (y2 - y1).abs() / 2.0);

    let mut end = end;
    while end < start {
        end += 360.0;
    }
    let sweep = (end - start).to_radians();
    if sweep <= 0.0 {
        return None;
    }

    let ra = (rx + ry) / 2.0;
    let step = if ra > 0.0 {
        (ra / (ra + 0.125)).acos() * 2.0
    } else {
        sweep
    };
    let steps = (sweep / step).ceil().max(1.0) as usize;
    let start = start.to_radians();

    let mut builder = PathBuilder::new();
    for i in 0..=steps {
        let angle = start + sweep * i as f32 / steps as f32;
        let (x, y) = (cx + rx * angle.cos(), cy + ry * angle.sin());
        if i == 0 {
            builder.move_to(x, y);
        } else {
            builder.line_to(x, y);
        }
    }
    builder.finish()
}

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

/// Run `draw` on a transparent layer and composite the layer over `image`.
///
/// Pixels the shapes leave uncovered are not touched.
fn draw_layer(image: &mut RgbaImage, draw: impl FnOnce(&mut Pixmap)) -> Result<()> {
    let (width, height) = image.dimensions();
    let mut layer = Pixmap::new(width, height).ok_or_else(|| {
        CaptchaError::geometry(format!("cannot draw on a {width}x{height} image"))
    })?;
    draw(&mut layer);

    let layer = RenderSurface::from_rgba(width, height, layer.take(), true)?.into_image()?;
    composite_over(image, &layer, 0, 0);
    Ok(())
}
