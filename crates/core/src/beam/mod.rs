//! Beam traversal over a directed proximity graph.
//!
//! Given an immutable adjacency structure, a vector table aligned with it, an entry
//! node, and a query node, the engine walks the graph best-first toward the node
//! closest to the query while bounding the number of settled nodes. Two expansion
//! policies are provided: standard (expand all neighbors) and eager (stop expanding
//! at the first strictly closer neighbor and requeue the node).

/// Compared set: nodes whose distance to the query has been computed.
pub mod compared;
/// Distance metrics: negative dot product, cosine, and squared euclidean.
pub mod distance;
/// The beam: min-ordered frontier of `(score, node)` candidates.
pub mod frontier;
/// Proximity graph and vector table structures.
pub mod graph;
/// Standard and eager beam search.
pub mod search;

pub use distance::DistanceMetric;
pub use graph::{DegreeStats, ProximityGraph, VectorTable};
pub use search::{
    beam_search, eager_beam_search, run, SearchParams, SearchTrace, Strategy, Termination,
};
