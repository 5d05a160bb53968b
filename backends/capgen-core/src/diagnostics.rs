// this_file: backends/capgen-core/src/diagnostics.rs

//! Generation diagnostics used for structured debug logging.

use crate::types::BoundingBox;
use log::{debug, log_enabled, Level};

/// Lightweight snapshot of one finished generation call.
#[derive(Debug)]
pub struct GenerationDiagnostics<'a> {
    chars: &'a str,
    renderers: Vec<&'a str>,
    text_width: u32,
    packed_width: u32,
    target_width: u32,
    target_height: u32,
    bboxes: &'a [BoundingBox],
}

impl<'a> GenerationDiagnostics<'a> {
    pub fn new(
        chars: &'a str,
        renderers: Vec<&'a str>,
        text_width: u32,
        packed_width: u32,
        (target_width, target_height): (u32, u32),
        bboxes: &'a [BoundingBox],
    ) -> Self {
        Self {
            chars,
            renderers,
            text_width,
            packed_width,
            target_width,
            target_height,
            bboxes,
        }
    }

    /// Horizontal factor applied to the packed canvas (1.0 when no rescale happened).
    pub fn rescale_ratio(&self) -> f64 {
        if self.packed_width > self.target_width {
            self.target_width as f64 / self.packed_width as f64
        } else {
            1.0
        }
    }

    /// Emit the snapshot at debug level when logging is enabled.
    pub fn log(&self) {
        if log_enabled!(Level::Debug) {
            debug!(
                target: "capgen::render",
                "chars={chars:?} glyphs={glyphs} renderers={renderers:?} text_width={text_width} packed_width={packed_width} target={tw}x{th} ratio={ratio:.3} bboxes={bboxes:?}",
                chars = self.chars,
                glyphs = self.bboxes.len(),
                renderers = self.renderers,
                text_width = self.text_width,
                packed_width = self.packed_width,
                tw = self.target_width,
                th = self.target_height,
                ratio = self.rescale_ratio(),
                bboxes = self.bboxes,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rescale_ratio() {
        let boxes = [BoundingBox::new(0, 0, 10, 10)];
        let wide = GenerationDiagnostics::new("AB", vec!["a", "b"], 300, 320, (160, 60), &boxes);
        assert!((wide.rescale_ratio() - 0.5).abs() < f64::EPSILON);

        let narrow = GenerationDiagnostics::new("AB", vec!["a", "b"], 90, 160, (160, 60), &boxes);
        assert_eq!(narrow.rescale_ratio(), 1.0);
        narrow.log();
    }
}
