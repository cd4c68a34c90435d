//! Template plan precomputation for normalised correlation metrics.

use crate::image::ImageView;
use crate::util::{IdiffError, IdiffResult};

/// Variance below which a template is treated as flat.
pub(crate) const FLAT_VARIANCE_EPS: f64 = 1e-8;

/// Precomputed statistics and value buffers for one template.
pub struct TemplatePlan {
    width: usize,
    height: usize,
    values: Vec<f32>,
    sum: f64,
    energy: f64,
    var_t: f64,
}

impl TemplatePlan {
    /// Builds a plan from a template view.
    pub fn from_view(tpl: ImageView<'_, u8>) -> IdiffResult<Self> {
        let width = tpl.width();
        let height = tpl.height();
        let count = width
            .checked_mul(height)
            .ok_or(IdiffError::InvalidDimensions { width, height })?;

        let mut values = Vec::with_capacity(count);
        let mut sum = 0.0f64;
        let mut sum_sq = 0.0f64;
        for y in 0..height {
            let row = tpl.row(y).ok_or(IdiffError::BufferTooSmall {
                needed: (y + 1) * tpl.stride(),
                got: tpl.as_slice().len(),
            })?;
            for &value in row {
                let v = f64::from(value);
                sum += v;
                sum_sq += v * v;
                values.push(value as f32);
            }
        }

        let var_t = (sum_sq - sum * sum / count as f64).max(0.0);

        Ok(Self {
            width,
            height,
            values,
            sum,
            energy: sum_sq,
            var_t,
        })
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of template pixels.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Template pixel values in row-major order.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Sum of template values.
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Sum of squared template values.
    pub fn energy(&self) -> f64 {
        self.energy
    }

    /// Sum of squared deviations from the mean.
    pub fn var_t(&self) -> f64 {
        self.var_t
    }

    /// True when the template has (numerically) no variance.
    pub fn is_flat(&self) -> bool {
        self.var_t <= FLAT_VARIANCE_EPS
    }
}

#[cfg(test)]
mod tests {
    use super::TemplatePlan;
    use crate::ImageView;

    #[test]
    fn plan_matches_known_stats() {
        let data = [0u8, 1, 2, 3];
        let plan = TemplatePlan::from_view(ImageView::from_slice(&data, 2, 2).unwrap()).unwrap();

        assert_eq!(plan.width(), 2);
        assert_eq!(plan.height(), 2);
        assert_eq!(plan.len(), 4);
        assert!((plan.sum() - 6.0).abs() < 1e-12);
        assert!((plan.energy() - 14.0).abs() < 1e-12);
        assert!((plan.var_t() - 5.0).abs() < 1e-6);
        assert_eq!(plan.values(), &[0.0, 1.0, 2.0, 3.0]);
        assert!(!plan.is_flat());
    }

    #[test]
    fn constant_template_is_flat() {
        let data = [7u8; 9];
        let plan = TemplatePlan::from_view(ImageView::from_slice(&data, 3, 3).unwrap()).unwrap();
        assert!(plan.is_flat());
    }
}
