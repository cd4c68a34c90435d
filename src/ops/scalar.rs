//! Default CPU backend for the image-operations contract.

use crate::geometry::{Rect, Roi};
use crate::image::{FloatImage, OwnedImage, Raster};
use crate::kernel::{fill_surface, surface_size};
use crate::model::{Polarity, TemplateMatchMethod};
use crate::ops::{external_bounding_boxes, roi_placements, Extremum, ImageOps, MASK_ON};
use crate::template::TemplatePlan;
use crate::trace::{trace_event, trace_span};
use crate::util::{IdiffError, IdiffResult};
use crate::ImageView;
use imageproc::template_matching::find_extremes;

/// Scalar implementation of [`ImageOps`].
///
/// With the `rayon` feature, `parallel(true)` fills correlation surfaces
/// row-parallel; without the feature the flag is ignored.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScalarOps {
    parallel: bool,
}

impl ScalarOps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables row-parallel surface computation.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    fn fill(
        &self,
        source: ImageView<'_, u8>,
        plan: &TemplatePlan,
        method: TemplateMatchMethod,
        surface: &mut FloatImage,
        placements: Rect,
    ) -> IdiffResult<()> {
        if self.parallel {
            #[cfg(feature = "rayon")]
            return crate::kernel::rayon::fill_surface_par(source, plan, method, surface, placements);
        }
        fill_surface(source, plan, method, surface, placements)
    }
}

impl ImageOps for ScalarOps {
    fn to_grayscale(&self, image: &Raster) -> IdiffResult<OwnedImage> {
        let (width, height) = image.dimensions();
        let data = image.data();
        let gray = match image.channels() {
            1 => data.to_vec(),
            channels @ (3 | 4) => data
                .chunks_exact(channels)
                .map(|px| luma(px[0], px[1], px[2]))
                .collect(),
            channels => return Err(IdiffError::InvalidChannels { channels }),
        };
        OwnedImage::new(gray, width, height)
    }

    fn absolute_difference(
        &self,
        a: ImageView<'_, u8>,
        b: ImageView<'_, u8>,
    ) -> IdiffResult<OwnedImage> {
        if a.width() != b.width() || a.height() != b.height() {
            return Err(IdiffError::SizeMismatch {
                left_width: a.width(),
                left_height: a.height(),
                right_width: b.width(),
                right_height: b.height(),
            });
        }
        let mut out = OwnedImage::filled(a.width(), a.height(), 0)?;
        let width = a.width();
        for y in 0..a.height() {
            let (Some(row_a), Some(row_b)) = (a.row(y), b.row(y)) else {
                continue;
            };
            let dst = &mut out.data_mut()[y * width..(y + 1) * width];
            for ((d, &pa), &pb) in dst.iter_mut().zip(row_a).zip(row_b) {
                *d = pa.abs_diff(pb);
            }
        }
        Ok(out)
    }

    fn binary_threshold(&self, image: ImageView<'_, u8>, low_bound: u8) -> IdiffResult<OwnedImage> {
        let mut out = OwnedImage::filled(image.width(), image.height(), 0)?;
        let width = image.width();
        for y in 0..image.height() {
            let Some(row) = image.row(y) else {
                continue;
            };
            let dst = &mut out.data_mut()[y * width..(y + 1) * width];
            for (d, &v) in dst.iter_mut().zip(row) {
                *d = if v > low_bound { MASK_ON } else { 0 };
            }
        }
        Ok(out)
    }

    fn correlation_surface(
        &self,
        source: ImageView<'_, u8>,
        template: ImageView<'_, u8>,
        method: TemplateMatchMethod,
        rois: &[Roi],
    ) -> IdiffResult<FloatImage> {
        let plan = TemplatePlan::from_view(template)?;
        let (width, height) = surface_size(source, &plan)?;
        let _span = trace_span!(
            "correlation_surface",
            method = method.name(),
            width = width,
            height = height,
            rois = rois.len()
        )
        .entered();

        let mut surface = FloatImage::filled(width, height, method.neutral())?;
        if rois.is_empty() {
            self.fill(source, &plan, method, &mut surface, Rect::new(0, 0, width, height))?;
            return Ok(surface);
        }

        let placements = roi_placements(
            rois,
            source.width(),
            source.height(),
            plan.width(),
            plan.height(),
        );
        trace_event!("roi_placements", usable = placements.len());
        for region in placements {
            self.fill(source, &plan, method, &mut surface, region)?;
        }
        Ok(surface)
    }

    fn bounding_boxes(&self, mask: ImageView<'_, u8>) -> IdiffResult<Vec<Rect>> {
        external_bounding_boxes(mask)
    }

    fn count_non_zero(&self, mask: ImageView<'_, u8>, rect: Rect) -> IdiffResult<usize> {
        let window = mask.roi(rect)?;
        let mut count = 0usize;
        for y in 0..window.height() {
            if let Some(row) = window.row(y) {
                count += row.iter().filter(|&&v| v != 0).count();
            }
        }
        Ok(count)
    }

    fn global_extremum(&self, surface: &FloatImage, polarity: Polarity) -> Option<Extremum> {
        let extremes = find_extremes(surface.as_image());
        let ((x, y), value) = match polarity {
            Polarity::Minimum => (extremes.min_value_location, extremes.min_value),
            Polarity::Maximum => (extremes.max_value_location, extremes.max_value),
        };
        Some(Extremum {
            x: x as usize,
            y: y as usize,
            value,
        })
    }
}

/// BT.601 luma with integer rounding.
fn luma(r: u8, g: u8, b: u8) -> u8 {
    let weighted = 299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b);
    ((weighted + 500) / 1000) as u8
}
