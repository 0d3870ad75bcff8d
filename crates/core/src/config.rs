//! Global configuration constants for beamwalk.
//!
//! All traversal defaults, input validation limits, and file format constants are
//! defined here. These are compile-time constants; runtime configuration is
//! handled via `SearchParams` and CLI arguments in `beamwalk-cli`.

/// Default cap on the number of nodes a single traversal may settle.
///
/// Bounds work, not beam width. A traversal that settles this many nodes without
/// reaching its query is reported as non-converged.
pub const DEFAULT_LIMIT: usize = 1000;

/// Default entry node for traversals.
pub const DEFAULT_START: u32 = 0;

/// Default convergence rate a batch evaluation must reach to be accepted.
///
/// A graph whose traversals converge for fewer than 99.5% of queries is treated
/// as unusable regardless of how cheap its searches are.
pub const DEFAULT_CONVERGENCE_TARGET: f64 = 0.995;

/// Maximum allowed vector dimension.
pub const MAX_DIMENSION: usize = 4096;

/// Size in bytes of the `.fbin` header (`i32` count, `i32` dimension).
pub const FBIN_HEADER_BYTES: usize = 8;

/// Size in bytes of the graph file header (`i32` point count, `i32` max degree).
pub const GRAPH_HEADER_BYTES: usize = 8;

/// Percentiles reported by graph degree statistics.
pub const DEGREE_PERCENTILES: [u8; 8] = [0, 25, 50, 75, 90, 95, 99, 100];
