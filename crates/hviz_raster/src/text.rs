//! Label rasterization through cosmic-text.
//!
//! System fonts are loaded the first time a label is drawn, so frames without
//! labels never pay for font discovery. If no font is available, labels are
//! silently skipped.

use cosmic_text::{Attrs, Buffer, Color, Family, FontSystem, Metrics, Shaping, SwashCache};

use crate::canvas::Canvas;
use crate::color::Rgba;

/// Line height relative to font size.
const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// Shapes and draws single-line labels onto a [`Canvas`].
#[derive(Default)]
pub struct TextRenderer {
    fonts: Option<(FontSystem, SwashCache)>,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn fonts(&mut self) -> &mut (FontSystem, SwashCache) {
        self.fonts.get_or_insert_with(|| {
            log::debug!("Loading system fonts for label rendering");
            (FontSystem::new(), SwashCache::new())
        })
    }

    /// Draw one line of text horizontally centered on `center_x` with its
    /// baseline at `baseline_y`.
    pub fn draw_centered(
        &mut self,
        canvas: &mut Canvas,
        text: &str,
        center_x: f32,
        baseline_y: f32,
        font_size: f32,
        color: Rgba,
    ) {
        if text.is_empty() || font_size <= 0.0 {
            return;
        }

        let (font_system, swash_cache) = self.fonts();
        let metrics = Metrics::new(font_size, font_size * LINE_HEIGHT_FACTOR);
        let mut buffer = Buffer::new(font_system, metrics);
        buffer.set_size(font_system, None, None);
        buffer.set_text(
            font_system,
            text,
            &Attrs::new().family(Family::SansSerif),
            Shaping::Advanced,
        );
        buffer.shape_until_scroll(font_system, false);

        let Some((line_w, line_y)) = buffer.layout_runs().next().map(|run| (run.line_w, run.line_y))
        else {
            log::trace!("No layout for label {:?}", text);
            return;
        };

        let origin_x = (center_x - line_w / 2.0).round() as i32;
        let origin_y = (baseline_y - line_y).round() as i32;
        let text_color = Color::rgba(color.r, color.g, color.b, color.a);

        buffer.draw(font_system, swash_cache, text_color, |x, y, w, h, c| {
            canvas.blend_rect(
                origin_x + x,
                origin_y + y,
                w,
                h,
                Rgba::new(c.r(), c.g(), c.b(), c.a()),
            );
        });
    }
}
