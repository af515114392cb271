//! CPU rasterization surface for hviz.
//!
//! Frames are painted into a premultiplied RGBA pixmap (tiny-skia), labels are
//! shaped and rasterized with cosmic-text, and finished frames are encoded to
//! PNG through the `image` crate.

mod canvas;
mod color;
mod error;
mod text;

pub use canvas::Canvas;
pub use color::Rgba;
pub use error::RasterError;
pub use text::TextRenderer;
