//! Error types for graph construction and solver setup.
//!
//! The shortest-path algorithms themselves never fail; everything here is
//! raised while validating inputs before a run starts.

use thiserror::Error;

use crate::graph::VertexId;

/// Raised while building or loading a [`crate::Graph`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GraphError {
    /// CSR offsets must contain at least the leading zero.
    #[error("offsets must have n + 1 entries starting at 0")]
    MissingOffsets,
    /// Offsets were not non-decreasing or did not start at zero.
    #[error("offsets are not monotone at index {index}")]
    NonMonotoneOffsets { index: usize },
    /// The final offset disagrees with the number of stored edges.
    #[error("final offset {last} does not match edge count {edges}")]
    EdgeCountMismatch { last: usize, edges: usize },
    /// Targets and weights arrays differ in length.
    #[error("targets has {targets} entries but weights has {weights}")]
    WeightCountMismatch { targets: usize, weights: usize },
    /// An edge points outside the vertex range.
    #[error("edge target {target} is out of range for {vertex_count} vertices")]
    TargetOutOfRange { target: VertexId, vertex_count: usize },
    /// Weights must be finite and non-negative.
    #[error("edge {from} -> {to} has invalid weight {weight}")]
    InvalidWeight { from: VertexId, to: VertexId, weight: f64 },
    /// An edge-list line could not be parsed.
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
    /// Reading the edge list failed.
    #[error("failed to read edge list: {0}")]
    Io(String),
}

impl GraphError {
    /// Stable machine-readable code for logs and the C ABI.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingOffsets => "GRAPH_MISSING_OFFSETS",
            Self::NonMonotoneOffsets { .. } => "GRAPH_NON_MONOTONE_OFFSETS",
            Self::EdgeCountMismatch { .. } => "GRAPH_EDGE_COUNT_MISMATCH",
            Self::WeightCountMismatch { .. } => "GRAPH_WEIGHT_COUNT_MISMATCH",
            Self::TargetOutOfRange { .. } => "GRAPH_TARGET_OUT_OF_RANGE",
            Self::InvalidWeight { .. } => "GRAPH_INVALID_WEIGHT",
            Self::Parse { .. } => "GRAPH_PARSE",
            Self::Io(_) => "GRAPH_IO",
        }
    }
}

impl From<std::io::Error> for GraphError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Raised when a solver cannot be constructed for the given inputs.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SsspError {
    /// Shortest paths over zero vertices are undefined.
    #[error("graph has no vertices")]
    EmptyGraph,
    /// The requested source vertex does not exist.
    #[error("source {vertex} is out of range for {vertex_count} vertices")]
    SourceOutOfRange { vertex: VertexId, vertex_count: usize },
    /// A tuning parameter was zero or failed to parse.
    #[error("invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: String },
    /// The underlying graph was rejected.
    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl SsspError {
    /// Stable machine-readable code for logs and the C ABI.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyGraph => "SSSP_EMPTY_GRAPH",
            Self::SourceOutOfRange { .. } => "SSSP_SOURCE_OUT_OF_RANGE",
            Self::InvalidParameter { .. } => "SSSP_INVALID_PARAMETER",
            Self::Graph(err) => err.code(),
        }
    }
}

pub type Result<T, E = SsspError> = std::result::Result<T, E>;
