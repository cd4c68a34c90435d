//! Correlation kernel implementations.
//!
//! A kernel scores one template placement. Surfaces are filled placement by
//! placement over a rectangle of top-left offsets; the scalar path is the
//! reference and the `rayon` path must reproduce it exactly.

use crate::geometry::Rect;
use crate::image::FloatImage;
use crate::model::TemplateMatchMethod;
use crate::template::TemplatePlan;
use crate::util::{IdiffError, IdiffResult};
use crate::ImageView;

pub mod scalar;

#[cfg(feature = "rayon")]
pub mod rayon;

pub use scalar::{window_stats, WindowStats};

/// Kernel trait for scoring template placements.
pub trait Kernel {
    /// Method this kernel evaluates.
    const METHOD: TemplateMatchMethod;

    /// Converts accumulated window statistics into a raw surface value.
    fn score(stats: WindowStats, plan: &TemplatePlan) -> f32;

    /// Writes scores for every placement in `placements` into `surface`.
    fn fill_region(
        image: ImageView<'_, u8>,
        plan: &TemplatePlan,
        surface: &mut FloatImage,
        placements: Rect,
    ) -> IdiffResult<()> {
        check_placements(image, plan, surface, placements)?;
        for y in placements.y..placements.bottom() {
            let row = surface.row_mut(y);
            for x in placements.x..placements.right() {
                row[x] = Self::score(window_stats(image, plan, x, y), plan);
            }
        }
        Ok(())
    }
}

/// Size of the full placement surface for an image/template pair.
pub fn surface_size(image: ImageView<'_, u8>, plan: &TemplatePlan) -> IdiffResult<(usize, usize)> {
    if image.width() < plan.width() || image.height() < plan.height() {
        return Err(IdiffError::RoiOutOfBounds {
            x: 0,
            y: 0,
            width: plan.width(),
            height: plan.height(),
            img_width: image.width(),
            img_height: image.height(),
        });
    }
    Ok((
        image.width() - plan.width() + 1,
        image.height() - plan.height() + 1,
    ))
}

/// Fills `placements` of `surface` with scores for `method`.
pub fn fill_surface(
    image: ImageView<'_, u8>,
    plan: &TemplatePlan,
    method: TemplateMatchMethod,
    surface: &mut FloatImage,
    placements: Rect,
) -> IdiffResult<()> {
    match method {
        TemplateMatchMethod::SqdiffNormed => {
            scalar::SqdiffNormedScalar::fill_region(image, plan, surface, placements)
        }
        TemplateMatchMethod::CcorrNormed => {
            scalar::CcorrNormedScalar::fill_region(image, plan, surface, placements)
        }
        TemplateMatchMethod::CcoeffNormed => {
            scalar::CcoeffNormedScalar::fill_region(image, plan, surface, placements)
        }
    }
}

pub(crate) fn check_placements(
    image: ImageView<'_, u8>,
    plan: &TemplatePlan,
    surface: &FloatImage,
    placements: Rect,
) -> IdiffResult<()> {
    let (width, height) = surface_size(image, plan)?;
    if surface.width() != width || surface.height() != height {
        return Err(IdiffError::SizeMismatch {
            left_width: surface.width(),
            left_height: surface.height(),
            right_width: width,
            right_height: height,
        });
    }
    if placements.right() > width || placements.bottom() > height {
        return Err(IdiffError::RoiOutOfBounds {
            x: placements.x,
            y: placements.y,
            width: placements.width,
            height: placements.height,
            img_width: width,
            img_height: height,
        });
    }
    Ok(())
}
