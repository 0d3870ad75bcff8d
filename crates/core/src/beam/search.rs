//! Beam traversal: standard and eager best-first search toward a query node.
//!
//! Both strategies start from a single entry node and repeatedly pop the closest
//! candidate from the [`Beam`]. They stop when the query node is popped, when the
//! beam runs dry, or when `limit` nodes have been settled. None of these outcomes is
//! an error; the returned [`SearchTrace`] records which one happened.
//!
//! All per-search state (beam, visited, compared) is created inside the call, so any
//! number of searches may run concurrently over the same graph and vector table.

use crate::beam::compared::ComparedSet;
use crate::beam::distance::DistanceMetric;
use crate::beam::frontier::Beam;
use crate::beam::graph::{ProximityGraph, VectorTable};
use crate::config;
use crate::error::{BeamError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Expansion policy used by [`run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Expand every neighbor of the popped node before popping again.
    #[default]
    Standard,
    /// Abandon a node's expansion as soon as a strictly closer neighbor turns up.
    Eager,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Standard => f.write_str("standard"),
            Strategy::Eager => f.write_str("eager"),
        }
    }
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "standard" | "beam" => Ok(Strategy::Standard),
            "eager" => Ok(Strategy::Eager),
            other => Err(format!(
                "unknown strategy: '{other}' (use 'standard' or 'eager')"
            )),
        }
    }
}

/// Per-call traversal parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Entry node.
    pub start: u32,
    /// Maximum number of nodes to settle. Must be at least 1.
    pub limit: usize,
    /// Scoring function; lower = closer.
    pub metric: DistanceMetric,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            start: config::DEFAULT_START,
            limit: config::DEFAULT_LIMIT,
            metric: DistanceMetric::default(),
        }
    }
}

impl SearchParams {
    pub fn with_start(mut self, start: u32) -> Self {
        self.start = start;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Checks the graph-independent preconditions (`limit >= 1`).
    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            return Err(BeamError::InvalidLimit);
        }
        Ok(())
    }
}

/// Why a traversal stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The query node was popped from the beam.
    Found,
    /// The beam emptied before the query was reached.
    Exhausted,
    /// `limit` nodes were settled before the query was reached.
    LimitReached,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Found => f.write_str("found"),
            Termination::Exhausted => f.write_str("exhausted"),
            Termination::LimitReached => f.write_str("limit_reached"),
        }
    }
}

/// Result of one traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTrace {
    /// Settled nodes in the order they were settled.
    pub visited: Vec<u32>,
    /// Nodes whose distance to the query was computed, in first-scored order.
    /// The start node is scored to seed the beam but is not listed here.
    pub compared: Vec<u32>,
    pub termination: Termination,
}

impl SearchTrace {
    fn empty() -> Self {
        Self {
            visited: Vec::new(),
            compared: Vec::new(),
            termination: Termination::Exhausted,
        }
    }

    /// `true` when the traversal reached the query node.
    pub fn found(&self) -> bool {
        self.termination == Termination::Found
    }

    /// `true` when fewer than `limit` nodes were settled.
    ///
    /// This is the convergence signal batch evaluation counts. A standard search that
    /// finds its query on the `limit`-th settle is found but not converged.
    pub fn converged_within(&self, limit: usize) -> bool {
        self.visited.len() < limit
    }

    /// Consumes the trace into the `(visited, compared)` pair.
    pub fn into_parts(self) -> (Vec<u32>, Vec<u32>) {
        (self.visited, self.compared)
    }
}

/// Runs the traversal selected by `strategy`.
pub fn run(
    strategy: Strategy,
    graph: &ProximityGraph,
    vectors: &VectorTable,
    query: u32,
    params: &SearchParams,
) -> Result<SearchTrace> {
    match strategy {
        Strategy::Standard => beam_search(graph, vectors, query, params),
        Strategy::Eager => eager_beam_search(graph, vectors, query, params),
    }
}

/// Shared traversal state: the frontier, the settled path, and the compared set.
struct Traversal<'a> {
    graph: &'a ProximityGraph,
    vectors: &'a VectorTable,
    query_vec: &'a [f32],
    metric: DistanceMetric,
    beam: Beam,
    visited: Vec<u32>,
    compared: ComparedSet,
}

impl<'a> Traversal<'a> {
    /// Validates inputs and seeds the beam with `(distance(start, query), start)`.
    /// Returns `Ok(None)` for an empty graph.
    fn begin(
        graph: &'a ProximityGraph,
        vectors: &'a VectorTable,
        query: u32,
        params: &SearchParams,
    ) -> Result<Option<Self>> {
        params.validate()?;
        if graph.is_empty() {
            return Ok(None);
        }
        if graph.len() != vectors.len() {
            return Err(BeamError::SizeMismatch {
                graph: graph.len(),
                vectors: vectors.len(),
            });
        }
        let len = graph.len();
        for node in [params.start, query] {
            if node as usize >= len {
                return Err(BeamError::NodeOutOfBounds { node, len });
            }
        }

        let query_vec = vectors.row(query);
        let mut compared = ComparedSet::new(len);
        // The start node is already in the beam; keep it from being enqueued twice.
        compared.mark_seed(params.start);

        let seed = params
            .metric
            .distance_unchecked(vectors.row(params.start), query_vec);

        Ok(Some(Self {
            graph,
            vectors,
            query_vec,
            metric: params.metric,
            beam: Beam::seeded(seed, params.start),
            visited: Vec::new(),
            compared,
        }))
    }

    #[inline]
    fn score(&self, node: u32) -> f32 {
        self.metric
            .distance_unchecked(self.vectors.row(node), self.query_vec)
    }

    fn finish(self, termination: Termination, strategy: Strategy) -> SearchTrace {
        tracing::trace!(
            %strategy,
            %termination,
            visited = self.visited.len(),
            compared = self.compared.len(),
            frontier = self.beam.len(),
            "Traversal finished"
        );
        SearchTrace {
            visited: self.visited,
            compared: self.compared.into_vec(),
            termination,
        }
    }
}

/// Standard beam search.
///
/// Pops the closest candidate, settles it, and enqueues every neighbor that has not
/// been compared yet. Stops when the query node is popped (it is the last entry of
/// `visited`), when the beam is exhausted, or once `limit` nodes are settled.
pub fn beam_search(
    graph: &ProximityGraph,
    vectors: &VectorTable,
    query: u32,
    params: &SearchParams,
) -> Result<SearchTrace> {
    let Some(mut t) = Traversal::begin(graph, vectors, query, params)? else {
        return Ok(SearchTrace::empty());
    };

    while t.visited.len() < params.limit {
        let Some(best) = t.beam.pop() else {
            return Ok(t.finish(Termination::Exhausted, Strategy::Standard));
        };
        t.visited.push(best.node);
        if best.node == query {
            return Ok(t.finish(Termination::Found, Strategy::Standard));
        }
        for &neighbor in t.graph.neighbors(best.node) {
            if t.compared.insert(neighbor) {
                let score = t.score(neighbor);
                t.beam.push(score, neighbor);
            }
        }
    }

    Ok(t.finish(Termination::LimitReached, Strategy::Standard))
}

/// Eager beam search.
///
/// Like [`beam_search`], but while expanding a node it stops at the first newly
/// compared neighbor that scores strictly lower than the node itself. The node is
/// then pushed back onto the beam with its own score and is only settled (appended to
/// `visited`) once a later pop expands its whole neighbor list without interruption.
/// Re-expansion rescans the full list; the compared set skips what was already scored.
///
/// When the query node is popped the search stops without settling it, so `visited`
/// never contains the query.
pub fn eager_beam_search(
    graph: &ProximityGraph,
    vectors: &VectorTable,
    query: u32,
    params: &SearchParams,
) -> Result<SearchTrace> {
    let Some(mut t) = Traversal::begin(graph, vectors, query, params)? else {
        return Ok(SearchTrace::empty());
    };

    while t.visited.len() < params.limit {
        let Some(best) = t.beam.pop() else {
            return Ok(t.finish(Termination::Exhausted, Strategy::Eager));
        };
        if best.node == query {
            return Ok(t.finish(Termination::Found, Strategy::Eager));
        }

        let mut interrupted = false;
        for &neighbor in t.graph.neighbors(best.node) {
            if !t.compared.insert(neighbor) {
                continue;
            }
            let score = t.score(neighbor);
            t.beam.push(score, neighbor);
            if score < best.score.0 {
                t.beam.push(best.score.0, best.node);
                interrupted = true;
                break;
            }
        }
        if !interrupted {
            t.visited.push(best.node);
        }
    }

    Ok(t.finish(Termination::LimitReached, Strategy::Eager))
}
