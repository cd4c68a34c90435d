use crate::context::{ImageSlot, MatchContext, SearchMode};
use crate::image::Raster;
use std::fmt;

/// Which part of a context a validation message refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Mode,
    SourceImage,
    TargetImage,
    Dimensions,
    MatchSimilarity,
    MatchMethod,
    Limit,
}

/// One human-readable validation failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorMessage {
    kind: ErrorKind,
    message: String,
}

impl ErrorMessage {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Non-empty list of validation failures, carried by `IdiffError::InvalidContext`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ErrorMessage>);

impl ValidationErrors {
    /// Wraps the messages, returning `None` when there are none.
    pub fn from_messages(messages: Vec<ErrorMessage>) -> Option<Self> {
        if messages.is_empty() {
            None
        } else {
            Some(Self(messages))
        }
    }

    pub fn messages(&self) -> &[ErrorMessage] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if any message has the given kind.
    pub fn contains(&self, kind: ErrorKind) -> bool {
        self.0.iter().any(|msg| msg.kind == kind)
    }

    pub fn into_vec(self) -> Vec<ErrorMessage> {
        self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, msg) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{msg}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Checks a context and returns every problem found.
///
/// An empty result means the context can be searched. The checks are
/// independent, so a context with several mistakes reports all of them.
pub fn validate(ctx: &MatchContext) -> Vec<ErrorMessage> {
    let mut errors = Vec::new();

    match (ctx.is_find_specified(), ctx.is_diff_specified()) {
        (false, false) => errors.push(ErrorMessage::new(
            ErrorKind::Mode,
            "Find or Diff mode should be used",
        )),
        (true, true) => errors.push(ErrorMessage::new(
            ErrorKind::Mode,
            "Find and Diff modes are mutually exclusive",
        )),
        _ => {}
    }

    let second = match ctx.mode() {
        Some(SearchMode::Difference) => "Second image (to compare)",
        _ => "Second image (the template)",
    };
    check_slot(
        ctx.source(),
        ErrorKind::SourceImage,
        "First image (the source)",
        &mut errors,
    );
    check_slot(ctx.target(), ErrorKind::TargetImage, second, &mut errors);

    if let (Some(mode), Some(source), Some(target)) =
        (ctx.mode(), ctx.source_image(), ctx.target_image())
    {
        check_dimensions(mode, source, target, &mut errors);
    }

    let similarity = ctx.match_similarity();
    if !(similarity > 0.0 && similarity < 1.0) {
        errors.push(ErrorMessage::new(
            ErrorKind::MatchSimilarity,
            "Expected matching similarity should be from 0..1 (both exclusive).",
        ));
    }
    if ctx.match_method().is_none() {
        errors.push(ErrorMessage::new(
            ErrorKind::MatchMethod,
            "Please set match method.",
        ));
    }
    if ctx.limit() == 0 {
        errors.push(ErrorMessage::new(
            ErrorKind::Limit,
            "Expected limit of results should be > 0.",
        ));
    }

    errors
}

fn check_slot(slot: &ImageSlot, kind: ErrorKind, label: &str, errors: &mut Vec<ErrorMessage>) {
    let message = match slot {
        ImageSlot::Loaded(_) => return,
        ImageSlot::Missing => format!("{label} argument expected"),
        ImageSlot::NotFound { path } => format!("{label} does not exist: {}", path.display()),
        ImageSlot::Unreadable { path, reason } => {
            format!("Could not read {}: {} ({reason})", lowercase_first(label), path.display())
        }
    };
    errors.push(ErrorMessage::new(kind, message));
}

fn check_dimensions(mode: SearchMode, source: &Raster, target: &Raster, errors: &mut Vec<ErrorMessage>) {
    let (sw, sh) = source.dimensions();
    let (tw, th) = target.dimensions();
    match mode {
        SearchMode::Template if sw < tw || sh < th => errors.push(ErrorMessage::new(
            ErrorKind::Dimensions,
            format!(
                "First image (the source) must be greater than second image (the template): {sw}x{sh} vs {tw}x{th}"
            ),
        )),
        SearchMode::Difference if (sw, sh) != (tw, th) => errors.push(ErrorMessage::new(
            ErrorKind::Dimensions,
            format!("Images must have equal sizes to compare: {sw}x{sh} vs {tw}x{th}"),
        )),
        _ => {}
    }
}

fn lowercase_first(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
