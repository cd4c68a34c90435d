//! The image-operations contract consumed by the search engines.
//!
//! Engines never touch raw pixels themselves; everything they need from an
//! image goes through [`ImageOps`]. [`ScalarOps`] is the default backend,
//! built on the scalar correlation kernels.

mod regions;
mod scalar;

pub use regions::external_bounding_boxes;
pub use scalar::ScalarOps;

use crate::geometry::{Rect, Roi};
use crate::image::{FloatImage, OwnedImage, Raster};
use crate::model::{Polarity, TemplateMatchMethod};
use crate::util::IdiffResult;
use crate::ImageView;

/// Pixel value written by [`ImageOps::binary_threshold`] for "on" pixels.
pub const MASK_ON: u8 = 255;

/// Location and raw value of a surface extremum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extremum {
    pub x: usize,
    pub y: usize,
    pub value: f32,
}

/// Image primitives required by the template and difference engines.
///
/// Implementations must be deterministic: identical inputs give identical
/// outputs, including the order of [`ImageOps::bounding_boxes`].
pub trait ImageOps {
    /// Collapses a multi-channel raster to one channel; gray input is copied as is.
    fn to_grayscale(&self, image: &Raster) -> IdiffResult<OwnedImage>;

    /// Pixelwise `|a - b|` of two equally sized images.
    fn absolute_difference(
        &self,
        a: ImageView<'_, u8>,
        b: ImageView<'_, u8>,
    ) -> IdiffResult<OwnedImage>;

    /// Pixels strictly greater than `low_bound` become [`MASK_ON`], others 0.
    fn binary_threshold(&self, image: ImageView<'_, u8>, low_bound: u8) -> IdiffResult<OwnedImage>;

    /// Correlation surface of size `(sw - tw + 1, sh - th + 1)`.
    ///
    /// With a non-empty `rois` list only placements inside the usable regions
    /// (see [`roi_placements`]) are scored; every other cell holds
    /// `method.neutral()`.
    fn correlation_surface(
        &self,
        source: ImageView<'_, u8>,
        template: ImageView<'_, u8>,
        method: TemplateMatchMethod,
        rois: &[Roi],
    ) -> IdiffResult<FloatImage>;

    /// Bounding rectangles of the outermost connected "on" regions of `mask`.
    fn bounding_boxes(&self, mask: ImageView<'_, u8>) -> IdiffResult<Vec<Rect>>;

    /// Number of non-zero pixels of `mask` inside `rect`.
    fn count_non_zero(&self, mask: ImageView<'_, u8>, rect: Rect) -> IdiffResult<usize>;

    /// Position and value of the surface minimum or maximum.
    ///
    /// Ties resolve to the first cell in raster order. Surface values are
    /// finite; returns `None` only when a backend cannot produce a peak.
    fn global_extremum(&self, surface: &FloatImage, polarity: Polarity) -> Option<Extremum>;
}

/// Placement rectangles searched when a template scan is restricted to ROIs.
///
/// A region narrower or shorter than the template is skipped outright. The
/// rest are clipped to the source bounds; a clipped region that can no longer
/// hold the template is skipped as well. Each returned rectangle is in
/// surface coordinates (top-left placement offsets).
pub fn roi_placements(
    rois: &[Roi],
    source_width: usize,
    source_height: usize,
    template_width: usize,
    template_height: usize,
) -> Vec<Rect> {
    let bounds = Rect::new(0, 0, source_width, source_height);
    rois.iter()
        .filter(|roi| roi.width() >= template_width && roi.height() >= template_height)
        .map(|roi| roi.rect().intersection(&bounds))
        .filter(|clipped| clipped.width >= template_width && clipped.height >= template_height)
        .map(|clipped| {
            Rect::new(
                clipped.x,
                clipped.y,
                clipped.width - template_width + 1,
                clipped.height - template_height + 1,
            )
        })
        .collect()
}
