use crate::image::owned::checked_len;
use crate::image::OwnedImage;
use crate::util::{IdiffError, IdiffResult};

/// Owned interleaved image with 1 (gray), 3 (RGB) or 4 (RGBA) channels.
///
/// This is the format images arrive in before the search engines reduce them
/// to a single channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    data: Vec<u8>,
    width: usize,
    height: usize,
    channels: usize,
}

impl Raster {
    /// Wraps an interleaved row-major buffer of `width * height * channels` bytes.
    pub fn new(data: Vec<u8>, width: usize, height: usize, channels: usize) -> IdiffResult<Self> {
        if !matches!(channels, 1 | 3 | 4) {
            return Err(IdiffError::InvalidChannels { channels });
        }
        let needed = checked_len(width, height)?
            .checked_mul(channels)
            .ok_or(IdiffError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(IdiffError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(IdiffError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Single-channel raster from a gray buffer.
    pub fn gray(data: Vec<u8>, width: usize, height: usize) -> IdiffResult<Self> {
        Self::new(data, width, height, 1)
    }

    /// Three-channel raster from an RGB buffer.
    pub fn rgb(data: Vec<u8>, width: usize, height: usize) -> IdiffResult<Self> {
        Self::new(data, width, height, 3)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl From<OwnedImage> for Raster {
    fn from(value: OwnedImage) -> Self {
        let width = value.width();
        let height = value.height();
        Self {
            data: value.into_vec(),
            width,
            height,
            channels: 1,
        }
    }
}
