//! Error types for the traversal engine and its file loaders.

use thiserror::Error;

/// Errors that can occur while loading inputs or running a traversal.
///
/// Failing to reach the query node is not an error; it is reported through
/// [`Termination`](crate::beam::search::Termination).
#[derive(Debug, Error)]
pub enum BeamError {
    /// A node id outside `[0, len)`: a start, query, or neighbor id.
    #[error("node {node} out of bounds for {len} nodes")]
    NodeOutOfBounds {
        /// The offending node id.
        node: u32,
        /// Number of nodes in the graph or vector table.
        len: usize,
    },

    /// Two vectors of different dimension were scored against each other.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The expected dimension.
        expected: usize,
        /// The actual dimension.
        actual: usize,
    },

    /// Zero or oversized vector dimension.
    #[error("invalid dimension {0}")]
    InvalidDimension(usize),

    /// A traversal limit of zero.
    #[error("limit must be at least 1")]
    InvalidLimit,

    /// Graph and vector table disagree on the number of nodes.
    #[error("graph has {graph} nodes but vector table has {vectors}")]
    SizeMismatch {
        /// Node count of the graph.
        graph: usize,
        /// Row count of the vector table.
        vectors: usize,
    },

    /// Malformed vector or graph file.
    #[error("malformed file: {0}")]
    Format(String),

    /// Underlying I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BeamError>;
