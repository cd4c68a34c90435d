//! Rayon-parallel surface fill (feature-gated).
//!
//! Parallelizes over surface rows; each task scores every placement of its
//! row with the same scalar formula, so results are identical to the
//! sequential path.

use crate::geometry::Rect;
use crate::image::FloatImage;
use crate::kernel::check_placements;
use crate::kernel::scalar::{score_for, window_stats};
use crate::model::TemplateMatchMethod;
use crate::template::TemplatePlan;
use crate::util::IdiffResult;
use crate::ImageView;
use rayon::prelude::*;

/// Row-parallel equivalent of [`crate::kernel::fill_surface`].
pub fn fill_surface_par(
    image: ImageView<'_, u8>,
    plan: &TemplatePlan,
    method: TemplateMatchMethod,
    surface: &mut FloatImage,
    placements: Rect,
) -> IdiffResult<()> {
    check_placements(image, plan, surface, placements)?;
    if placements.is_empty() {
        return Ok(());
    }

    let width = surface.width();
    surface
        .data_mut()
        .par_chunks_mut(width)
        .enumerate()
        .skip(placements.y)
        .take(placements.height)
        .for_each(|(y, row)| {
            for x in placements.x..placements.right() {
                row[x] = score_for(method, window_stats(image, plan, x, y), plan);
            }
        });
    Ok(())
}
