use crate::image::ImageView;
use crate::util::{IdiffError, IdiffResult};

/// Owned contiguous single-channel `u8` image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl OwnedImage {
    /// Wraps a row-major buffer of exactly `width * height` bytes.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> IdiffResult<Self> {
        let needed = checked_len(width, height)?;
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
        })
    }

    /// Creates an image filled with `value`.
    pub fn filled(width: usize, height: usize, value: u8) -> IdiffResult<Self> {
        let len = checked_len(width, height)?;
        Ok(Self {
            data: vec![value; len],
            width,
            height,
        })
    }

    /// Copies a possibly strided view into a contiguous buffer.
    pub fn from_view(view: ImageView<'_, u8>) -> IdiffResult<Self> {
        let width = view.width();
        let height = view.height();
        let mut data = Vec::with_capacity(checked_len(width, height)?);
        for y in 0..height {
            let row = view.row(y).ok_or(IdiffError::BufferTooSmall {
                needed: (y + 1) * view.stride(),
                got: view.as_slice().len(),
            })?;
            data.extend_from_slice(row);
        }
        Self::new(data, width, height)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the row-major pixel buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Returns the pixel at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// Writes the pixel at `(x, y)`; out-of-bounds writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = value;
        }
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_, u8> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }
}

pub(crate) fn checked_len(width: usize, height: usize) -> IdiffResult<usize> {
    if width == 0 || height == 0 {
        return Err(IdiffError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(IdiffError::InvalidDimensions { width, height })
}
