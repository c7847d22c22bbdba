//! postprep aggregate: one document per author, optionally bounded.

pub mod aggregator;
pub mod bounder;
pub mod pipeline;

pub use aggregator::AuthorAggregator;
pub use bounder::{bound, LengthBounder};
pub use pipeline::{aggregate_and_bound, AggregateReport};
