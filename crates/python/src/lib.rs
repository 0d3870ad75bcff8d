//! Python bindings for beamwalk via PyO3.
//!
//! Exposes `beam_search`, `eager_beam_search`, and a `Traversal` class in a
//! `_beamwalk` Python module.

use pyo3::exceptions::{PyIndexError, PyOSError, PyValueError};
use pyo3::prelude::*;

use beamwalk_core::beam::{
    self, DistanceMetric, ProximityGraph, SearchParams, SearchTrace, Strategy, VectorTable,
};
use beamwalk_core::eval::{evaluate, EvalReport};
use beamwalk_core::storage::{read_fbin, read_graph};
use beamwalk_core::{config, BeamError};

// ---------------------------------------------------------------------------
// Helper: BeamError → Python exception
// ---------------------------------------------------------------------------

fn to_py_err(err: BeamError) -> PyErr {
    match err {
        BeamError::NodeOutOfBounds { .. } => PyIndexError::new_err(err.to_string()),
        BeamError::Io(_) => PyOSError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Helper: Python lists → graph / vector table
// ---------------------------------------------------------------------------

fn graph_from_lists(graph: Vec<Vec<i64>>) -> PyResult<ProximityGraph> {
    let len = graph.len();
    let mut neighbors = Vec::with_capacity(len);
    for list in graph {
        let mut ids = Vec::with_capacity(list.len());
        for id in list {
            let id = u32::try_from(id).map_err(|_| {
                PyIndexError::new_err(format!("neighbor id {id} out of bounds for {len} nodes"))
            })?;
            ids.push(id);
        }
        neighbors.push(ids);
    }
    ProximityGraph::new(neighbors).map_err(to_py_err)
}

fn parse_metric(metric: Option<&str>) -> PyResult<DistanceMetric> {
    match metric {
        None => Ok(DistanceMetric::default()),
        Some(m) => m.parse().map_err(PyValueError::new_err),
    }
}

fn params(start: u32, limit: usize, metric: Option<&str>) -> PyResult<SearchParams> {
    Ok(SearchParams::default()
        .with_start(start)
        .with_limit(limit)
        .with_metric(parse_metric(metric)?))
}

fn run_lists(
    strategy: Strategy,
    graph: Vec<Vec<i64>>,
    vectors: Vec<Vec<f32>>,
    start: u32,
    query: u32,
    limit: usize,
    metric: Option<&str>,
) -> PyResult<(Vec<u32>, Vec<u32>)> {
    let params = params(start, limit, metric)?;
    params.validate().map_err(to_py_err)?;
    let graph = graph_from_lists(graph)?;
    // An empty vector list has no dimension to build a table from.
    if graph.is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }
    let vectors = VectorTable::from_rows(&vectors).map_err(to_py_err)?;
    beam::run(strategy, &graph, &vectors, query, &params)
        .map(SearchTrace::into_parts)
        .map_err(to_py_err)
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Standard beam search from `start` toward `query`.
///
/// Args:
///     graph: Out-neighborhood list per node.
///     vectors: One vector per node, all of the same dimension.
///     start: Entry node id.
///     query: Target node id.
///     limit: Maximum number of settled nodes (default 1000).
///     metric: "dot_product" (default), "cosine", or "euclidean".
///
/// Returns:
///     (visited, compared) lists of node ids.
#[pyfunction]
#[pyo3(signature = (graph, vectors, start, query, limit=config::DEFAULT_LIMIT, metric=None))]
fn beam_search(
    graph: Vec<Vec<i64>>,
    vectors: Vec<Vec<f32>>,
    start: u32,
    query: u32,
    limit: usize,
    metric: Option<&str>,
) -> PyResult<(Vec<u32>, Vec<u32>)> {
    run_lists(Strategy::Standard, graph, vectors, start, query, limit, metric)
}

/// Eager beam search: stops expanding a node at the first strictly closer neighbor.
///
/// Same arguments and return value as `beam_search`.
#[pyfunction]
#[pyo3(signature = (graph, vectors, start, query, limit=config::DEFAULT_LIMIT, metric=None))]
fn eager_beam_search(
    graph: Vec<Vec<i64>>,
    vectors: Vec<Vec<f32>>,
    start: u32,
    query: u32,
    limit: usize,
    metric: Option<&str>,
) -> PyResult<(Vec<u32>, Vec<u32>)> {
    run_lists(Strategy::Eager, graph, vectors, start, query, limit, metric)
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// Summary of a batch evaluation.
#[pyclass(frozen)]
struct Report {
    #[pyo3(get)]
    strategy: String,
    #[pyo3(get)]
    queries: usize,
    #[pyo3(get)]
    converged: usize,
    #[pyo3(get)]
    convergence_rate: f64,
    #[pyo3(get)]
    mean_visited: f64,
    #[pyo3(get)]
    mean_compared: f64,
    #[pyo3(get)]
    max_compared: usize,
}

impl From<EvalReport> for Report {
    fn from(r: EvalReport) -> Self {
        Self {
            strategy: r.strategy.to_string(),
            queries: r.queries,
            converged: r.converged,
            convergence_rate: r.convergence_rate,
            mean_visited: r.mean_visited,
            mean_compared: r.mean_compared,
            max_compared: r.max_compared,
        }
    }
}

#[pymethods]
impl Report {
    /// True if the convergence rate is strictly above `target`.
    #[pyo3(signature = (target=config::DEFAULT_CONVERGENCE_TARGET))]
    fn meets(&self, target: f64) -> bool {
        self.convergence_rate > target
    }

    fn __repr__(&self) -> String {
        format!(
            "Report(strategy='{}', queries={}, convergence_rate={:.4}, mean_compared={:.2})",
            self.strategy, self.queries, self.convergence_rate, self.mean_compared
        )
    }
}

// ---------------------------------------------------------------------------
// Traversal
// ---------------------------------------------------------------------------

/// A loaded graph and vector table, reusable across many searches.
///
///     t = Traversal.from_files("base.fbin", "outputs/vamana")
///     visited, compared = t.search(42, strategy="eager")
#[pyclass(frozen)]
struct Traversal {
    graph: ProximityGraph,
    vectors: VectorTable,
}

#[pymethods]
impl Traversal {
    #[new]
    fn new(graph: Vec<Vec<i64>>, vectors: Vec<Vec<f32>>) -> PyResult<Self> {
        Ok(Self {
            graph: graph_from_lists(graph)?,
            vectors: VectorTable::from_rows(&vectors).map_err(to_py_err)?,
        })
    }

    /// Load a `.fbin` vector file and a ParlayANN graph file.
    #[staticmethod]
    fn from_files(vectors_path: &str, graph_path: &str) -> PyResult<Self> {
        Ok(Self {
            vectors: read_fbin(vectors_path).map_err(to_py_err)?,
            graph: read_graph(graph_path).map_err(to_py_err)?,
        })
    }

    /// Run one traversal; returns `(visited, compared)`.
    #[pyo3(signature = (query, start=config::DEFAULT_START, limit=config::DEFAULT_LIMIT, strategy="standard", metric=None))]
    fn search(
        &self,
        py: Python<'_>,
        query: u32,
        start: u32,
        limit: usize,
        strategy: &str,
        metric: Option<&str>,
    ) -> PyResult<(Vec<u32>, Vec<u32>)> {
        let strategy: Strategy = strategy.parse().map_err(PyValueError::new_err)?;
        let params = params(start, limit, metric)?;
        py.allow_threads(|| beam::run(strategy, &self.graph, &self.vectors, query, &params))
            .map(SearchTrace::into_parts)
            .map_err(to_py_err)
    }

    /// Run one traversal per query id and summarize convergence and cost.
    #[pyo3(signature = (queries, start=config::DEFAULT_START, limit=config::DEFAULT_LIMIT, strategy="standard", metric=None))]
    fn evaluate(
        &self,
        py: Python<'_>,
        queries: Vec<u32>,
        start: u32,
        limit: usize,
        strategy: &str,
        metric: Option<&str>,
    ) -> PyResult<Report> {
        let strategy: Strategy = strategy.parse().map_err(PyValueError::new_err)?;
        let params = params(start, limit, metric)?;
        py.allow_threads(|| evaluate(&self.graph, &self.vectors, &queries, &params, strategy))
            .map(Report::from)
            .map_err(to_py_err)
    }

    /// Number of nodes.
    fn __len__(&self) -> usize {
        self.graph.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "Traversal(nodes={}, edges={}, dimension={})",
            self.graph.len(),
            self.graph.edge_count(),
            self.vectors.dimension()
        )
    }
}

// ---------------------------------------------------------------------------
// Module
// ---------------------------------------------------------------------------

#[pymodule]
fn _beamwalk(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(beam_search, m)?)?;
    m.add_function(wrap_pyfunction!(eager_beam_search, m)?)?;
    m.add_class::<Traversal>()?;
    m.add_class::<Report>()?;
    Ok(())
}
