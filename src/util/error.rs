//! Error types for idiff.

use crate::context::ValidationErrors;
use thiserror::Error;

/// Result alias for idiff operations.
pub type IdiffResult<T> = std::result::Result<T, IdiffError>;

/// Errors that can occur when building buffers or running a search.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum IdiffError {
    /// Width or height is zero, or the pixel count overflows.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is shorter than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer is shorter than the declared layout requires.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Channel count is not one of 1, 3 or 4.
    #[error("unsupported channel count: {channels}")]
    InvalidChannels { channels: usize },
    /// Two images that must share a size do not.
    #[error("size mismatch: {left_width}x{left_height} vs {right_width}x{right_height}")]
    SizeMismatch {
        left_width: usize,
        left_height: usize,
        right_width: usize,
        right_height: usize,
    },
    /// A rectangle does not fit inside the image it addresses.
    #[error("rectangle ({x}, {y}, {width}x{height}) exceeds image {img_width}x{img_height}")]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// A region of interest could not be parsed or has zero area.
    #[error("invalid region of interest '{input}': {reason}")]
    InvalidRoi { input: String, reason: &'static str },
    /// A match method name is not recognised.
    #[error("unknown match method: {0}")]
    UnknownMethod(String),
    /// A search ran without one of its input images.
    #[error("missing image: {0}")]
    MissingImage(&'static str),
    /// A template search ran without a match method.
    #[error("missing match method")]
    MissingMethod,
    /// The match context violates one or more invariants.
    #[error("invalid match context:\n{0}")]
    InvalidContext(ValidationErrors),
    /// Image decoding or encoding failed.
    #[cfg(feature = "image-io")]
    #[error("image i/o error: {reason}")]
    ImageIo { reason: String },
}
