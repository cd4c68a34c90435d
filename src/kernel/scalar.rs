//! Scalar reference kernels for score evaluation.
//!
//! Formulas follow the usual normalised definitions, with `T` the template,
//! `I` the image window and `n` the pixel count:
//!
//! - SQDIFF_NORMED: `sum((T - I)^2) / sqrt(sum(T^2) * sum(I^2))`
//! - CCORR_NORMED: `sum(T * I) / sqrt(sum(T^2) * sum(I^2))`
//! - CCOEFF_NORMED: `sum(T' * I') / sqrt(sum(T'^2) * sum(I'^2))` with `'`
//!   denoting mean removal.
//!
//! A vanishing denominator yields the method's neutral value, except for a
//! flat template under CCOEFF_NORMED, which scores 1 everywhere.

use crate::kernel::Kernel;
use crate::model::TemplateMatchMethod;
use crate::template::TemplatePlan;
use crate::ImageView;

const DENOM_EPS: f64 = 1e-12;

/// Sums accumulated over one template-sized image window.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WindowStats {
    /// `sum(T * I)`.
    pub dot: f64,
    /// `sum(I)`.
    pub sum: f64,
    /// `sum(I^2)`.
    pub sum_sq: f64,
}

/// Accumulates window statistics for the placement at `(x, y)`.
///
/// The caller guarantees the placement fits inside the image.
pub fn window_stats(
    image: ImageView<'_, u8>,
    plan: &TemplatePlan,
    x: usize,
    y: usize,
) -> WindowStats {
    let tpl_width = plan.width();
    let values = plan.values();
    let mut stats = WindowStats::default();
    for ty in 0..plan.height() {
        let Some(img_row) = image.row(y + ty) else {
            break;
        };
        let base = ty * tpl_width;
        for (tx, &t) in values[base..base + tpl_width].iter().enumerate() {
            let value = f64::from(img_row[x + tx]);
            stats.dot += f64::from(t) * value;
            stats.sum += value;
            stats.sum_sq += value * value;
        }
    }
    stats
}

/// Scalar normalised squared-difference kernel.
pub struct SqdiffNormedScalar;

/// Scalar normalised cross-correlation kernel.
pub struct CcorrNormedScalar;

/// Scalar normalised correlation-coefficient (ZNCC) kernel.
pub struct CcoeffNormedScalar;

impl Kernel for SqdiffNormedScalar {
    const METHOD: TemplateMatchMethod = TemplateMatchMethod::SqdiffNormed;

    fn score(stats: WindowStats, plan: &TemplatePlan) -> f32 {
        let denom = (plan.energy() * stats.sum_sq).sqrt();
        if denom <= DENOM_EPS {
            return Self::METHOD.neutral();
        }
        let sse = plan.energy() - 2.0 * stats.dot + stats.sum_sq;
        (sse / denom).clamp(0.0, 1.0) as f32
    }
}

impl Kernel for CcorrNormedScalar {
    const METHOD: TemplateMatchMethod = TemplateMatchMethod::CcorrNormed;

    fn score(stats: WindowStats, plan: &TemplatePlan) -> f32 {
        let denom = (plan.energy() * stats.sum_sq).sqrt();
        if denom <= DENOM_EPS {
            return Self::METHOD.neutral();
        }
        (stats.dot / denom).clamp(-1.0, 1.0) as f32
    }
}

impl Kernel for CcoeffNormedScalar {
    const METHOD: TemplateMatchMethod = TemplateMatchMethod::CcoeffNormed;

    fn score(stats: WindowStats, plan: &TemplatePlan) -> f32 {
        if plan.is_flat() {
            return 1.0;
        }
        let n = plan.len() as f64;
        let var_i = stats.sum_sq - stats.sum * stats.sum / n;
        let denom = (plan.var_t() * var_i.max(0.0)).sqrt();
        if denom <= DENOM_EPS {
            return Self::METHOD.neutral();
        }
        let cov = stats.dot - plan.sum() * stats.sum / n;
        (cov / denom).clamp(-1.0, 1.0) as f32
    }
}

/// Scores `stats` with the kernel for `method`.
pub fn score_for(method: TemplateMatchMethod, stats: WindowStats, plan: &TemplatePlan) -> f32 {
    match method {
        TemplateMatchMethod::SqdiffNormed => SqdiffNormedScalar::score(stats, plan),
        TemplateMatchMethod::CcorrNormed => CcorrNormedScalar::score(stats, plan),
        TemplateMatchMethod::CcoeffNormed => CcoeffNormedScalar::score(stats, plan),
    }
}
