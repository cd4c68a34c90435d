//! Difference search: connected regions of a binary change mask.

use crate::context::MatchContext;
use crate::geometry::Rect;
use crate::model::Match;
use crate::ops::ImageOps;
use crate::trace::{trace_event, trace_span};
use crate::util::{IdiffError, IdiffResult};

/// Regions smaller than this on both axes are ignored.
pub const MIN_REGION_SIZE: usize = 5;

/// Finds regions where two equally sized images differ.
#[derive(Clone, Copy, Debug)]
pub struct DifferenceSearch<'a, O: ?Sized> {
    ops: &'a O,
}

impl<'a, O: ImageOps + ?Sized> DifferenceSearch<'a, O> {
    pub fn new(ops: &'a O) -> Self {
        Self { ops }
    }

    /// Runs the search and returns matches in region order.
    ///
    /// A region's score is the fraction of changed pixels inside its bounding
    /// box. Regions are kept when that fraction is below the similarity
    /// threshold and, if ROIs are set, the box overlaps at least one of them.
    pub fn find(&self, ctx: &MatchContext) -> IdiffResult<Vec<Match>> {
        let first = ctx
            .source_image()
            .ok_or(IdiffError::MissingImage("first"))?;
        let second = ctx
            .target_image()
            .ok_or(IdiffError::MissingImage("second"))?;
        let _span = trace_span!(
            "difference_search",
            width = first.width(),
            height = first.height()
        )
        .entered();

        let first = self.ops.to_grayscale(first)?;
        let second = self.ops.to_grayscale(second)?;
        let diff = self.ops.absolute_difference(first.view(), second.view())?;
        let mask = self.ops.binary_threshold(diff.view(), 0)?;
        let regions = self.ops.bounding_boxes(mask.view())?;
        trace_event!("difference_regions", count = regions.len());

        let similarity = ctx.match_similarity();
        let limit = ctx.limit();
        let mut matches = Vec::new();
        for rect in regions {
            if rect.width < MIN_REGION_SIZE && rect.height < MIN_REGION_SIZE {
                continue;
            }
            if matches.len() >= limit {
                break;
            }
            let changed = self.ops.count_non_zero(mask.view(), rect)?;
            let score = changed as f64 / rect.area() as f64;
            if score < similarity && overlaps_any(ctx, &rect) {
                matches.push(Match::from_rect(score, rect));
            }
        }
        trace_event!("difference_matches", count = matches.len());
        Ok(matches)
    }
}

fn overlaps_any(ctx: &MatchContext, rect: &Rect) -> bool {
    ctx.rois().is_empty() || ctx.rois().iter().any(|roi| roi.rect().overlaps(rect))
}
