//! idiff locates a template inside an image, or the regions where two images
//! differ, and reports each hit as a scored rectangle.
//!
//! A search is described by a [`MatchContext`], checked with [`validate`], and
//! run by a [`Finder`]. Pixel work goes through the [`ImageOps`] contract;
//! [`ScalarOps`] is the built-in backend, optionally row-parallel via the
//! `rayon` feature. The `image-io` feature adds file loading and result
//! rendering.

pub mod context;
pub mod geometry;
pub mod image;
pub mod kernel;
pub mod lowlevel;
pub mod model;
pub mod ops;
#[cfg(feature = "image-io")]
pub mod render;
pub mod search;
pub mod template;
mod trace;
pub mod util;

pub use context::{
    validate, ErrorKind, ErrorMessage, ImageSlot, MatchContext, MatchContextBuilder, SearchMode,
    ValidationErrors,
};
pub use geometry::{parse_rois, Rect, Roi};
#[cfg(feature = "image-io")]
pub use crate::image::io;
pub use crate::image::{FloatImage, ImageView, OwnedImage, Raster};
pub use model::{Match, Polarity, TemplateMatchMethod};
pub use ops::{ImageOps, ScalarOps};
pub use search::{DifferenceSearch, Finder, TemplateSearch};
pub use util::{IdiffError, IdiffResult};
