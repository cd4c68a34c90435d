//! Low-level building blocks for custom image-operations backends.
//!
//! These expose template plans, window statistics, the scalar kernels, and the
//! region helpers used by [`ScalarOps`](crate::ScalarOps). Most users should
//! prefer [`Finder`](crate::Finder) and [`MatchContext`](crate::MatchContext).

pub use crate::kernel::scalar::{
    score_for, CcoeffNormedScalar, CcorrNormedScalar, SqdiffNormedScalar,
};
pub use crate::kernel::{fill_surface, surface_size, window_stats, Kernel, WindowStats};
pub use crate::ops::{external_bounding_boxes, roi_placements, Extremum, MASK_ON};
pub use crate::template::TemplatePlan;
