//! Batch evaluation of traversal strategies.
//!
//! Runs one traversal per query node and summarizes how many converged and how much
//! work they did. Queries run in parallel on the rayon pool; each traversal owns its
//! own beam and compared set, so the graph and vector table are shared read-only.

use crate::beam::graph::{ProximityGraph, VectorTable};
use crate::beam::search::{run, SearchParams, SearchTrace, Strategy};
use crate::error::Result;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Summary of a batch of traversals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalReport {
    pub strategy: Strategy,
    pub params: SearchParams,
    /// Number of queries run.
    pub queries: usize,
    /// Queries that settled fewer than `params.limit` nodes.
    pub converged: usize,
    /// `converged / queries` (0 when there are no queries).
    pub convergence_rate: f64,
    /// Mean length of the visited sequence.
    pub mean_visited: f64,
    /// Mean size of the compared set: the per-query distance computation cost.
    pub mean_compared: f64,
    /// Largest compared set across all queries.
    pub max_compared: usize,
}

impl EvalReport {
    /// `true` if the convergence rate is strictly above `target`.
    pub fn meets(&self, target: f64) -> bool {
        self.convergence_rate > target
    }

    /// Summarizes already-computed traces.
    ///
    /// A trace counts as converged when `visited.len() < params.limit`, whatever its
    /// [`Termination`](crate::beam::Termination).
    pub fn from_traces(strategy: Strategy, params: SearchParams, traces: &[SearchTrace]) -> Self {
        let queries = traces.len();
        let converged = traces
            .iter()
            .filter(|t| t.converged_within(params.limit))
            .count();
        let total_visited: usize = traces.iter().map(|t| t.visited.len()).sum();
        let total_compared: usize = traces.iter().map(|t| t.compared.len()).sum();
        let max_compared = traces.iter().map(|t| t.compared.len()).max().unwrap_or(0);
        let mean = |total: usize| {
            if queries == 0 {
                0.0
            } else {
                total as f64 / queries as f64
            }
        };

        Self {
            strategy,
            params,
            queries,
            converged,
            convergence_rate: mean(converged),
            mean_visited: mean(total_visited),
            mean_compared: mean(total_compared),
            max_compared,
        }
    }
}

/// Runs `strategy` once per query node and summarizes the results.
///
/// The first invalid query id aborts the batch with its error.
pub fn evaluate(
    graph: &ProximityGraph,
    vectors: &VectorTable,
    queries: &[u32],
    params: &SearchParams,
    strategy: Strategy,
) -> Result<EvalReport> {
    let traces = queries
        .par_iter()
        .map(|&query| run(strategy, graph, vectors, query, params))
        .collect::<Result<Vec<_>>>()?;

    let report = EvalReport::from_traces(strategy, *params, &traces);
    tracing::info!(
        %strategy,
        queries = report.queries,
        convergence_rate = report.convergence_rate,
        mean_visited = report.mean_visited,
        mean_compared = report.mean_compared,
        "Evaluation completed"
    );
    Ok(report)
}
