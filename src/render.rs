//! Annotated result images.
//!
//! Matches are outlined in red with their truncated score ("87%") written
//! inside, regions of interest in green. Available when the `image-io`
//! feature is enabled.

use crate::context::{MatchContext, SearchMode};
use crate::geometry::{Rect, Roi};
use crate::image::io::{rgb_from_raster, save_rgb};
use crate::image::Raster;
use crate::model::Match;
use crate::util::{IdiffError, IdiffResult};
use ab_glyph::{Font, FontRef, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};

pub const MATCH_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const ROI_COLOR: Rgb<u8> = Rgb([0, 200, 0]);

/// Pixel height of score labels.
pub const LABEL_SCALE: f32 = 14.0;

static LABEL_FONT: &[u8] = include_bytes!("../assets/fonts/DejaVuSansMono.ttf");

fn label_font() -> IdiffResult<FontRef<'static>> {
    FontRef::try_from_slice(LABEL_FONT).map_err(|err| IdiffError::ImageIo {
        reason: format!("label font: {err}"),
    })
}

/// Outlines `rect` on `canvas`; rectangles that miss the canvas are skipped.
pub fn outline(canvas: &mut RgbImage, rect: Rect, color: Rgb<u8>) {
    let (cw, ch) = (canvas.width() as usize, canvas.height() as usize);
    if !rect.overlaps(&Rect::new(0, 0, cw, ch)) {
        return;
    }
    // Edges past the canvas stay one pixel off it, so they are not drawn.
    let width = rect.right().min(cw + 1) - rect.x;
    let height = rect.bottom().min(ch + 1) - rect.y;
    let (Ok(x), Ok(y), Ok(w), Ok(h)) = (
        i32::try_from(rect.x),
        i32::try_from(rect.y),
        u32::try_from(width),
        u32::try_from(height),
    ) else {
        return;
    };
    draw_hollow_rect_mut(canvas, imageproc::rect::Rect::at(x, y).of_size(w, h), color);
}

/// Writes the truncated score of `m` inside its rectangle, one pixel from the
/// left edge with the baseline on the vertical centre.
fn label(canvas: &mut RgbImage, font: &FontRef<'_>, m: &Match, color: Rgb<u8>) {
    let scale = PxScale::from(LABEL_SCALE);
    let ascent = font.as_scaled(scale).ascent();
    let rect = m.rect();
    let (Ok(x), Ok(baseline)) = (
        i32::try_from(rect.x + 1),
        i32::try_from(rect.y + rect.height / 2),
    ) else {
        return;
    };
    let text = format!("{}%", m.percent());
    draw_text_mut(canvas, color, x, baseline - ascent.round() as i32, scale, font, &text);
}

/// Copy of the source with ROIs and template matches outlined.
pub fn annotate_find(source: &Raster, matches: &[Match], rois: &[Roi]) -> IdiffResult<RgbImage> {
    let font = label_font()?;
    let mut canvas = rgb_from_raster(source)?;
    for roi in rois {
        outline(&mut canvas, roi.rect(), ROI_COLOR);
    }
    for m in matches {
        outline(&mut canvas, m.rect(), MATCH_COLOR);
        label(&mut canvas, &font, m, MATCH_COLOR);
    }
    Ok(canvas)
}

/// Copies of both compared images with differing regions outlined.
///
/// Returns `(annotated second image, annotated first image)`, matching the
/// result-image and result-source-image outputs.
pub fn annotate_diff(
    first: &Raster,
    second: &Raster,
    matches: &[Match],
    rois: &[Roi],
) -> IdiffResult<(RgbImage, RgbImage)> {
    let font = label_font()?;
    let mut result = rgb_from_raster(second)?;
    let mut result_source = rgb_from_raster(first)?;
    for roi in rois {
        outline(&mut result, roi.rect(), ROI_COLOR);
    }
    for m in matches {
        outline(&mut result, m.rect(), MATCH_COLOR);
        label(&mut result, &font, m, MATCH_COLOR);
        outline(&mut result_source, m.rect(), MATCH_COLOR);
        label(&mut result_source, &font, m, MATCH_COLOR);
    }
    Ok((result, result_source))
}

/// Renders and writes the result images of a finished search.
pub fn write_results(ctx: &MatchContext) -> IdiffResult<()> {
    let first = ctx
        .source_image()
        .ok_or(IdiffError::MissingImage("source"))?;
    let second = ctx
        .target_image()
        .ok_or(IdiffError::MissingImage("target"))?;
    match ctx.mode() {
        Some(SearchMode::Template) => {
            let canvas = annotate_find(first, ctx.matches(), ctx.rois())?;
            save_rgb(&canvas, ctx.result_image())
        }
        Some(SearchMode::Difference) => {
            let (result, result_source) = annotate_diff(first, second, ctx.matches(), ctx.rois())?;
            save_rgb(&result, ctx.result_image())?;
            save_rgb(&result_source, ctx.result_source_image())
        }
        None => Ok(()),
    }
}
