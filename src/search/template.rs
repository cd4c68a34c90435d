//! Template search: repeated peak picking on one correlation surface.

use crate::context::MatchContext;
use crate::image::FloatImage;
use crate::model::{Match, TemplateMatchMethod};
use crate::ops::ImageOps;
use crate::search::suppress::suppression_rect;
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{IdiffError, IdiffResult};

/// Finds placements of the second image inside the first.
///
/// The engine reads the images, method, similarity, limit and ROIs from the
/// context and does not modify it.
#[derive(Clone, Copy, Debug)]
pub struct TemplateSearch<'a, O: ?Sized> {
    ops: &'a O,
}

impl<'a, O: ImageOps + ?Sized> TemplateSearch<'a, O> {
    pub fn new(ops: &'a O) -> Self {
        Self { ops }
    }

    /// Runs the search and returns matches in discovery order.
    ///
    /// Every returned match scores strictly above the similarity threshold and
    /// has the template's size. At most `limit` matches are returned. A source
    /// smaller than the template yields no matches.
    pub fn find(&self, ctx: &MatchContext) -> IdiffResult<Vec<Match>> {
        let source = ctx
            .source_image()
            .ok_or(IdiffError::MissingImage("source"))?;
        let template = ctx
            .target_image()
            .ok_or(IdiffError::MissingImage("template"))?;
        let method = ctx.match_method().ok_or(IdiffError::MissingMethod)?;
        let (sw, sh) = source.dimensions();
        let (tw, th) = template.dimensions();

        let _span = trace_span!(
            "template_search",
            method = method.name(),
            source_width = sw,
            source_height = sh,
            template_width = tw,
            template_height = th
        )
        .entered();

        if sw < tw || sh < th {
            trace_warn!(
                source_width = sw,
                source_height = sh,
                template_width = tw,
                template_height = th,
                "source is smaller than the template"
            );
            return Ok(Vec::new());
        }

        let gray_source = self.ops.to_grayscale(source)?;
        let gray_template = self.ops.to_grayscale(template)?;
        let surface = self.ops.correlation_surface(
            gray_source.view(),
            gray_template.view(),
            method,
            ctx.rois(),
        )?;

        let matches = self.pick_peaks(
            surface,
            method,
            tw,
            th,
            ctx.match_similarity(),
            ctx.limit(),
        );
        trace_event!("template_matches", count = matches.len());
        Ok(matches)
    }

    fn pick_peaks(
        &self,
        mut surface: FloatImage,
        method: TemplateMatchMethod,
        template_width: usize,
        template_height: usize,
        similarity: f64,
        limit: usize,
    ) -> Vec<Match> {
        let polarity = method.polarity();
        let neutral = method.neutral();
        let mut matches = Vec::new();
        let mut previous: Option<Match> = None;
        let mut score = 1.0;

        // Each iteration neutralises at least the peak cell, so the surface
        // eventually drops below any positive threshold.
        while score > similarity {
            let Some(peak) = self.ops.global_extremum(&surface, polarity) else {
                break;
            };
            let candidate = Match::new(
                method.score(peak.value),
                peak.x,
                peak.y,
                template_width,
                template_height,
            );
            surface.fill_rect(
                suppression_rect(peak.x, peak.y, template_width, template_height),
                neutral,
            );
            if previous == Some(candidate) || matches.len() >= limit {
                break;
            }
            score = candidate.score();
            if score > similarity {
                matches.push(candidate);
            }
            previous = Some(candidate);
        }
        matches
    }
}
