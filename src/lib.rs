//! # beamwalk
//!
//! Approximate nearest-neighbor graph traversal. Given a directed proximity graph
//! over a set of vectors and a query node, walk from an entry node toward the query
//! with a bounded amount of work, and measure how often and how cheaply such walks
//! converge.
//!
//! ## Features
//!
//! - **Standard beam search**: best-first expansion of every neighbor
//! - **Eager beam search**: stop expanding at the first strictly closer neighbor
//! - **Distance metrics**: negative inner product (default), cosine, squared euclidean
//! - **Batch evaluation** in parallel with convergence rate and compared-count cost
//! - **File loaders** for `.fbin` vectors and ParlayANN graph files
//!
//! ## Architecture
//!
//! ```text
//! .fbin → VectorTable ┐
//!                     ├→ beam_search / eager_beam_search → SearchTrace → EvalReport
//! graph → ProximityGraph ┘
//! ```

pub use beamwalk_core::{beam, config, eval, storage, BeamError, Result};
