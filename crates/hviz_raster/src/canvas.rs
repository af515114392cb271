//! Drawing surface backed by a tiny-skia pixmap.
//!
//! Pixels are stored premultiplied, as tiny-skia expects. Conversion to
//! straight alpha only happens when reading pixels back or exporting.

use std::io::Cursor;
use std::path::Path;

use image::imageops::FilterType;
use image::RgbaImage;
use tiny_skia::{ColorU8, FillRule, Paint, Path as SkiaPath, PathBuilder, Pixmap, Rect, Stroke, Transform};

use crate::color::Rgba;
use crate::error::RasterError;

/// An RGBA drawing surface.
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    /// Create a transparent surface.
    pub fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        let pixmap = Pixmap::new(width, height).ok_or(RasterError::InvalidSize { width, height })?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Fill the whole surface with one color.
    pub fn clear(&mut self, color: Rgba) {
        self.pixmap.fill(color.to_skia());
    }

    /// Draw `image` stretched over the whole surface, replacing its contents.
    pub fn draw_image_fitted(&mut self, image: &RgbaImage) {
        let (width, height) = (self.width(), self.height());
        let resized;
        let source = if image.dimensions() == (width, height) {
            image
        } else {
            resized = image::imageops::resize(image, width, height, FilterType::Triangle);
            &resized
        };

        for (dst, src) in self.pixmap.pixels_mut().iter_mut().zip(source.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
    }

    /// Fill a closed polygon using the even-odd rule.
    ///
    /// Returns `false` if no path could be built from the outline (fewer than
    /// two points or no extent), in which case nothing is drawn.
    pub fn fill_polygon(&mut self, outline: &[(f32, f32)], color: Rgba) -> bool {
        let Some(path) = polygon_path(outline) else {
            return false;
        };
        let paint = solid_paint(color);
        self.pixmap
            .fill_path(&path, &paint, FillRule::EvenOdd, Transform::identity(), None);
        true
    }

    /// Stroke the closed outline of a polygon.
    pub fn stroke_polygon(&mut self, outline: &[(f32, f32)], color: Rgba, width: f32) -> bool {
        let Some(path) = polygon_path(outline) else {
            return false;
        };
        let paint = solid_paint(color);
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        true
    }

    /// Blend a solid rectangle over the surface. Used for glyph coverage.
    pub fn blend_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Rgba) {
        if color.a == 0 {
            return;
        }
        let Some(rect) = Rect::from_xywh(x as f32, y as f32, width as f32, height as f32) else {
            return;
        };
        let paint = solid_paint(color);
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
    }

    /// Read back a pixel as straight RGBA.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some(Rgba::new(c.red(), c.green(), c.blue(), c.alpha()))
    }

    /// Convert the surface to a straight-alpha `RgbaImage`.
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut out = RgbaImage::new(self.width(), self.height());
        for (dst, src) in out.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        out
    }

    /// Encode the surface as PNG bytes.
    pub fn encode_png(&self) -> Result<Vec<u8>, RasterError> {
        let mut bytes = Vec::new();
        self.to_rgba_image()
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Write the surface to `path` as a PNG file.
    pub fn save_png(&self, path: &Path) -> Result<(), RasterError> {
        let bytes = self.encode_png()?;
        std::fs::write(path, bytes)?;
        log::info!(
            "Exported {}x{} frame to {:?}",
            self.width(),
            self.height(),
            path
        );
        Ok(())
    }
}

fn polygon_path(outline: &[(f32, f32)]) -> Option<SkiaPath> {
    let (&(x0, y0), rest) = outline.split_first()?;
    let mut builder = PathBuilder::new();
    builder.move_to(x0, y0);
    for &(x, y) in rest {
        builder.line_to(x, y);
    }
    builder.close();
    builder.finish()
}

fn solid_paint(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}
