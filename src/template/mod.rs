//! Template planning utilities.
//!
//! A `TemplatePlan` holds the per-template statistics every correlation
//! kernel needs, computed once per search instead of once per placement.

mod plan;

pub use plan::TemplatePlan;
