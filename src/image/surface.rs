use crate::geometry::Rect;
use crate::image::owned::checked_len;
use crate::util::{IdiffError, IdiffResult};
use image::Luma;
use imageproc::definitions::Image;

/// Owned single-channel `f32` image, used for correlation surfaces.
///
/// Backed by an `imageproc` buffer so the extremum search can run on it
/// directly.
#[derive(Clone, Debug, PartialEq)]
pub struct FloatImage {
    buffer: Image<Luma<f32>>,
    width: usize,
    height: usize,
}

impl FloatImage {
    /// Creates a surface with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: f32) -> IdiffResult<Self> {
        checked_len(width, height)?;
        let invalid = IdiffError::InvalidDimensions { width, height };
        let w = u32::try_from(width).map_err(|_| invalid.clone())?;
        let h = u32::try_from(height).map_err(|_| invalid)?;
        Ok(Self {
            buffer: Image::from_pixel(w, h, Luma([value])),
            width,
            height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[f32] {
        self.buffer.as_raw()
    }

    pub(crate) fn data_mut(&mut self) -> &mut [f32] {
        &mut self.buffer
    }

    /// Borrows the surface as an `imageproc` image.
    pub fn as_image(&self) -> &Image<Luma<f32>> {
        &self.buffer
    }

    /// Returns the value at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data().get(y * self.width + x).copied()
    }

    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        if x < self.width && y < self.height {
            let idx = y * self.width + x;
            self.data_mut()[idx] = value;
        }
    }

    /// Returns a mutable slice for row `y`.
    pub(crate) fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let start = y * self.width;
        let width = self.width;
        &mut self.data_mut()[start..start + width]
    }

    /// Sets every cell of `rect` (clipped to the surface) to `value`.
    pub fn fill_rect(&mut self, rect: Rect, value: f32) {
        let clipped = rect.intersection(&Rect::new(0, 0, self.width, self.height));
        if clipped.is_empty() {
            return;
        }
        let width = self.width;
        let data = self.data_mut();
        for y in clipped.y..clipped.bottom() {
            let start = y * width;
            data[start + clipped.x..start + clipped.right()].fill(value);
        }
    }
}
