//! Search engines and the [`Finder`] entry point.
//!
//! [`TemplateSearch`] and [`DifferenceSearch`] are the two engines. A
//! [`Finder`] validates a [`MatchContext`], picks the engine named by its
//! [`SearchMode`], and appends the results to the context.

mod difference;
mod suppress;
mod template;

pub use difference::{DifferenceSearch, MIN_REGION_SIZE};
pub use template::TemplateSearch;

use crate::context::{validate, MatchContext, SearchMode, ValidationErrors};
use crate::model::Match;
use crate::ops::{ImageOps, ScalarOps};
use crate::util::{IdiffError, IdiffResult};

impl SearchMode {
    /// Runs the engine for this mode without validating or touching `ctx`.
    pub fn run<O: ImageOps + ?Sized>(self, ops: &O, ctx: &MatchContext) -> IdiffResult<Vec<Match>> {
        match self {
            SearchMode::Template => TemplateSearch::new(ops).find(ctx),
            SearchMode::Difference => DifferenceSearch::new(ops).find(ctx),
        }
    }
}

/// Validates contexts and dispatches them to the matching engine.
#[derive(Clone, Debug, Default)]
pub struct Finder<O = ScalarOps> {
    ops: O,
}

impl Finder<ScalarOps> {
    /// Creates a finder backed by [`ScalarOps`].
    pub fn new() -> Self {
        Self::default()
    }
}

impl<O: ImageOps> Finder<O> {
    /// Creates a finder backed by a custom image-operations implementation.
    pub fn with_ops(ops: O) -> Self {
        Self { ops }
    }

    pub fn ops(&self) -> &O {
        &self.ops
    }

    /// Validates `ctx` and runs its search without recording the results.
    pub fn search(&self, ctx: &MatchContext) -> IdiffResult<Vec<Match>> {
        match (ctx.mode(), ValidationErrors::from_messages(validate(ctx))) {
            (_, Some(errors)) => Err(IdiffError::InvalidContext(errors)),
            (Some(mode), None) => mode.run(&self.ops, ctx),
            // validate() always reports a missing or ambiguous mode.
            (None, None) => Ok(Vec::new()),
        }
    }

    /// Validates `ctx`, runs its search, and appends the results to it.
    ///
    /// Returns the matches found by this call.
    pub fn find(&self, ctx: &mut MatchContext) -> IdiffResult<Vec<Match>> {
        let matches = self.search(ctx)?;
        ctx.add_matches(matches.iter().copied());
        Ok(matches)
    }
}
