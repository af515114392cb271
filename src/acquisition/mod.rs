//! Photo acquisition: decoding uploaded bytes and detecting house elements.
//!
//! Both steps run on a background [`AcquisitionWorker`] thread. Every upload
//! carries a [`Generation`] so results from an upload that has since been
//! replaced can be recognized and dropped.

mod segmenter;
mod worker;

use std::sync::Arc;

use image::RgbaImage;
use thiserror::Error;

use crate::error::RegionError;
use crate::model::Region;

pub use segmenter::{FileSegmenter, MockSegmenter, Segmenter, mock_house_elements};
pub use worker::AcquisitionWorker;

/// Monotonic upload counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors from decoding a photo or detecting its regions.
#[derive(Error, Debug)]
pub enum AcquisitionError {
    /// Bytes are not a recognized image format
    #[error("Unsupported image format")]
    UnsupportedFormat,

    /// Recognized format but decoding failed
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// Image decoded to zero width or height
    #[error("Image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    /// Segmenter could not produce regions
    #[error("Segmentation failed: {0}")]
    Segmentation(String),

    /// Segmenter produced a region that cannot be used
    #[error("Invalid detected region: {0}")]
    Region(#[from] RegionError),

    #[error("Failed to parse region file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Background thread is gone
    #[error("Acquisition worker is not running")]
    WorkerUnavailable,
}

/// Result of one acquisition step, delivered to the session.
#[derive(Debug)]
pub enum AcquisitionEvent {
    /// The photo decoded; detection starts next
    ImageReady {
        generation: Generation,
        image: Arc<RgbaImage>,
    },
    /// Detection finished
    RegionsReady {
        generation: Generation,
        regions: Vec<Region>,
    },
    /// Decoding or detection failed; nothing else follows for this generation
    Failed {
        generation: Generation,
        error: AcquisitionError,
    },
}

impl AcquisitionEvent {
    pub fn generation(&self) -> Generation {
        match self {
            AcquisitionEvent::ImageReady { generation, .. }
            | AcquisitionEvent::RegionsReady { generation, .. }
            | AcquisitionEvent::Failed { generation, .. } => *generation,
        }
    }
}

/// Decode uploaded bytes into RGBA pixels.
///
/// The format is sniffed from the content, not from any file name.
pub fn decode_image(data: &[u8]) -> Result<RgbaImage, AcquisitionError> {
    let format = image::guess_format(data).map_err(|_| AcquisitionError::UnsupportedFormat)?;
    log::debug!("Decoding {:?} image ({} bytes)", format, data.len());

    let image = image::load_from_memory_with_format(data, format)?.to_rgba8();
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(AcquisitionError::EmptyImage { width, height });
    }
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_png() {
        let image = decode_image(&png_bytes(4, 3)).unwrap();
        assert_eq!(image.dimensions(), (4, 3));
        assert_eq!(image.get_pixel(0, 0).0, [10, 20, 30, 255]);
    }

    #[test]
    fn test_decode_rejects_non_image() {
        let result = decode_image(b"definitely not an image");
        assert!(matches!(result, Err(AcquisitionError::UnsupportedFormat)));
    }

    #[test]
    fn test_decode_truncated_png_fails() {
        let bytes = png_bytes(8, 8);
        let result = decode_image(&bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(AcquisitionError::Decode(_))));
    }

    #[test]
    fn test_generation_is_monotonic() {
        let g = Generation::default();
        assert!(g.next() > g);
        assert_eq!(g.next().next().value(), 2);
    }
}
