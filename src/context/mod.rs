//! Search configuration and accumulated results.
//!
//! A `MatchContext` is assembled once per invocation through
//! [`MatchContextBuilder`], checked with [`validate`], handed to a search, and
//! afterwards only grows by appending matches. Building never fails: every
//! problem is reported together by the validator.

mod validate;

pub use validate::{validate, ErrorKind, ErrorMessage, ValidationErrors};

use crate::geometry::Roi;
use crate::image::Raster;
use crate::model::{Match, TemplateMatchMethod};
use std::path::{Path, PathBuf};

/// Default similarity threshold.
pub const DEFAULT_MATCH_SIMILARITY: f64 = 0.8;
/// Default maximum number of results.
pub const DEFAULT_LIMIT: usize = 100;
/// Default path of the annotated result image.
pub const DEFAULT_RESULT_IMAGE: &str = "output/result_image.png";
/// Default path of the annotated source image (diff mode).
pub const DEFAULT_RESULT_SOURCE_IMAGE: &str = "output/result_source_image.png";

/// Which search a context asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchMode {
    /// Locate placements of the second image inside the first.
    Template,
    /// Locate regions where two equally sized images differ.
    Difference,
}

/// State of one input image slot.
#[derive(Clone, Debug, PartialEq)]
pub enum ImageSlot {
    /// No image was supplied.
    Missing,
    /// A path was supplied but nothing exists there.
    NotFound { path: PathBuf },
    /// The file exists but could not be decoded.
    Unreadable { path: PathBuf, reason: String },
    /// A decoded image.
    Loaded(Raster),
}

impl ImageSlot {
    /// Loads an image from disk, recording failures instead of returning them.
    #[cfg(feature = "image-io")]
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return ImageSlot::NotFound {
                path: path.to_path_buf(),
            };
        }
        match crate::image::io::load_raster(path) {
            Ok(raster) => ImageSlot::Loaded(raster),
            Err(err) => ImageSlot::Unreadable {
                path: path.to_path_buf(),
                reason: err.to_string(),
            },
        }
    }

    /// Returns the decoded image, if any.
    pub fn raster(&self) -> Option<&Raster> {
        match self {
            ImageSlot::Loaded(raster) => Some(raster),
            _ => None,
        }
    }
}

/// Configuration of one search plus the matches it produced.
#[derive(Clone, Debug)]
pub struct MatchContext {
    title: String,
    show_result: bool,
    source: ImageSlot,
    target: ImageSlot,
    result_image: PathBuf,
    result_source_image: PathBuf,
    find_specified: bool,
    diff_specified: bool,
    match_method: Option<TemplateMatchMethod>,
    match_similarity: f64,
    limit: usize,
    rois: Vec<Roi>,
    matches: Vec<Match>,
}

impl MatchContext {
    pub fn builder() -> MatchContextBuilder {
        MatchContextBuilder::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn show_result(&self) -> bool {
        self.show_result
    }

    /// First image: the source in template mode, the reference in diff mode.
    pub fn source(&self) -> &ImageSlot {
        &self.source
    }

    /// Second image: the template in template mode, the candidate in diff mode.
    pub fn target(&self) -> &ImageSlot {
        &self.target
    }

    pub fn source_image(&self) -> Option<&Raster> {
        self.source.raster()
    }

    pub fn target_image(&self) -> Option<&Raster> {
        self.target.raster()
    }

    pub fn result_image(&self) -> &Path {
        &self.result_image
    }

    pub fn result_source_image(&self) -> &Path {
        &self.result_source_image
    }

    pub fn is_find_specified(&self) -> bool {
        self.find_specified
    }

    pub fn is_diff_specified(&self) -> bool {
        self.diff_specified
    }

    /// The requested search, or `None` unless exactly one mode was chosen.
    pub fn mode(&self) -> Option<SearchMode> {
        match (self.find_specified, self.diff_specified) {
            (true, false) => Some(SearchMode::Template),
            (false, true) => Some(SearchMode::Difference),
            _ => None,
        }
    }

    pub fn match_method(&self) -> Option<TemplateMatchMethod> {
        self.match_method
    }

    pub fn match_similarity(&self) -> f64 {
        self.match_similarity
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Regions of interest; empty means the whole image is searched.
    pub fn rois(&self) -> &[Roi] {
        &self.rois
    }

    /// Matches accumulated by completed searches, in discovery order.
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// Appends search results.
    pub fn add_matches<I: IntoIterator<Item = Match>>(&mut self, matches: I) {
        self.matches.extend(matches);
    }
}

/// Fluent builder for [`MatchContext`].
#[derive(Clone, Debug)]
pub struct MatchContextBuilder {
    title: String,
    show_result: bool,
    source: ImageSlot,
    target: ImageSlot,
    result_image: PathBuf,
    result_source_image: PathBuf,
    find_specified: bool,
    diff_specified: bool,
    match_method: Option<TemplateMatchMethod>,
    match_similarity: f64,
    limit: usize,
    rois: Vec<Roi>,
}

impl Default for MatchContextBuilder {
    fn default() -> Self {
        Self {
            title: String::new(),
            show_result: false,
            source: ImageSlot::Missing,
            target: ImageSlot::Missing,
            result_image: PathBuf::from(DEFAULT_RESULT_IMAGE),
            result_source_image: PathBuf::from(DEFAULT_RESULT_SOURCE_IMAGE),
            find_specified: false,
            diff_specified: false,
            match_method: Some(TemplateMatchMethod::default()),
            match_similarity: DEFAULT_MATCH_SIMILARITY,
            limit: DEFAULT_LIMIT,
            rois: Vec::new(),
        }
    }
}

impl MatchContextBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn show_result(mut self, show_result: bool) -> Self {
        self.show_result = show_result;
        self
    }

    /// Sets the first image from a decoded raster.
    pub fn source(mut self, image: Raster) -> Self {
        self.source = ImageSlot::Loaded(image);
        self
    }

    /// Sets the second image from a decoded raster.
    pub fn target(mut self, image: Raster) -> Self {
        self.target = ImageSlot::Loaded(image);
        self
    }

    pub fn source_slot(mut self, slot: ImageSlot) -> Self {
        self.source = slot;
        self
    }

    pub fn target_slot(mut self, slot: ImageSlot) -> Self {
        self.target = slot;
        self
    }

    /// Loads the first image from disk.
    #[cfg(feature = "image-io")]
    pub fn source_path<P: AsRef<Path>>(self, path: P) -> Self {
        self.source_slot(ImageSlot::load(path))
    }

    /// Loads the second image from disk.
    #[cfg(feature = "image-io")]
    pub fn target_path<P: AsRef<Path>>(self, path: P) -> Self {
        self.target_slot(ImageSlot::load(path))
    }

    pub fn result_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.result_image = path.into();
        self
    }

    pub fn result_source_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.result_source_image = path.into();
        self
    }

    /// Requests a template search.
    pub fn find(self) -> Self {
        self.find_specified(true)
    }

    /// Requests a difference search.
    pub fn diff(self) -> Self {
        self.diff_specified(true)
    }

    pub fn find_specified(mut self, specified: bool) -> Self {
        self.find_specified = specified;
        self
    }

    pub fn diff_specified(mut self, specified: bool) -> Self {
        self.diff_specified = specified;
        self
    }

    /// Selects exactly `mode`, clearing the other one.
    pub fn mode(self, mode: SearchMode) -> Self {
        self.find_specified(mode == SearchMode::Template)
            .diff_specified(mode == SearchMode::Difference)
    }

    pub fn match_method(mut self, method: impl Into<Option<TemplateMatchMethod>>) -> Self {
        self.match_method = method.into();
        self
    }

    pub fn match_similarity(mut self, similarity: f64) -> Self {
        self.match_similarity = similarity;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn roi(mut self, roi: Roi) -> Self {
        self.rois.push(roi);
        self
    }

    pub fn rois<I: IntoIterator<Item = Roi>>(mut self, rois: I) -> Self {
        self.rois.extend(rois);
        self
    }

    pub fn build(self) -> MatchContext {
        MatchContext {
            title: self.title,
            show_result: self.show_result,
            source: self.source,
            target: self.target,
            result_image: self.result_image,
            result_source_image: self.result_source_image,
            find_specified: self.find_specified,
            diff_specified: self.diff_specified,
            match_method: self.match_method,
            match_similarity: self.match_similarity,
            limit: self.limit,
            rois: self.rois,
            matches: Vec::new(),
        }
    }
}
