//! Declarative filter pipelines.
//!
//! Each resource owns a fixed, ordered table of `FilterStage`s. A pipeline
//! folds its stages over a base `SqlQuery`; a stage whose parameter is
//! missing, empty or `"null"` leaves the query untouched.

mod params;
mod pipeline;
pub mod resources;

pub use params::FilterParams;
pub use pipeline::{FilterPipeline, FilterStage};
pub use resources::Resource;
