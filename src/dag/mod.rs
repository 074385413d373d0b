// src/dag/mod.rs

//! Pipeline graph validation.
//!
//! - [`payload`] classifies raw JSON rows into valid ids / skipped rows.
//! - [`graph`] holds the deduplicated id set and the adjacency + indegree
//!   view used for cycle detection.
//! - [`validator`] ties both together and produces the counts and DAG flag.

pub mod graph;
pub mod payload;
pub mod validator;

pub use graph::{NodeIdSet, PipelineGraph};
pub use payload::{
    EdgeRow, NodeId, NodeRow, SkipReason, classify_edge, classify_node, split_payload,
};
pub use validator::{Diagnostics, GraphValidator, ValidationReport, ValidationResult, validate};
