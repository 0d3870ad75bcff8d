//! # beamwalk-core
//!
//! Approximate nearest-neighbor graph traversal: given a directed proximity graph
//! over a set of vectors and a query node, find a short path from a start node to
//! the query while bounding the amount of work done.
//!
//! This is the core library crate with zero async dependencies. The graph itself is
//! built elsewhere; this crate loads it, walks it, and measures how well walks
//! converge.

/// Beam traversal: distance metrics, graph and vector storage, and the search strategies.
pub mod beam;
/// Global configuration constants: defaults and validation limits.
pub mod config;
/// Error type shared by the engine and its loaders.
pub mod error;
/// Batch evaluation: run many traversals and summarize convergence and cost.
pub mod eval;
/// File formats: `.fbin` vector tables, ParlayANN graph files, and vocabularies.
pub mod storage;

pub use error::{BeamError, Result};
