//! Error types for raster operations.

use thiserror::Error;

/// Errors that can occur while creating or exporting a surface.
#[derive(Error, Debug)]
pub enum RasterError {
    /// Surface dimensions are zero or too large to allocate
    #[error("Invalid surface size {width}x{height}")]
    InvalidSize {
        /// Requested width in pixels
        width: u32,
        /// Requested height in pixels
        height: u32,
    },

    /// PNG encoding failed
    #[error("Image encoding error: {0}")]
    Encode(#[from] image::ImageError),

    /// I/O error while writing an exported frame
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
