//! postprep core: record types, pipeline configuration, error type.

pub mod config;
pub mod error;
pub mod types;

pub use config::{AuthorOrder, ColumnNames, PipelineConfig, RepairMode, Sentinels};
pub use error::{Error, Result};
pub use types::{
    AuthorDocument, CleanOutcome, CleanedBatch, CleanedPost, DocumentBatch, PostBatch, RawPost,
    RejectReason,
};
