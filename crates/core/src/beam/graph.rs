//! Proximity graph and vector table consumed by the traversal engine.
//!
//! [`ProximityGraph`] stores each node's ordered out-neighborhood. [`VectorTable`]
//! stores all vectors contiguously in a single arena (`node_id * dimension` offsets).
//! Both are immutable once handed to a search.

use crate::config;
use crate::error::{BeamError, Result};
use serde::{Deserialize, Serialize};

/// Dense table of fixed-dimension f32 vectors indexed by node id.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorTable {
    data: Vec<f32>,
    dimension: usize,
}

impl VectorTable {
    /// Creates an empty table for vectors of the given dimension.
    pub fn new(dimension: usize) -> Result<Self> {
        check_dimension(dimension)?;
        Ok(Self {
            data: Vec::new(),
            dimension,
        })
    }

    /// Wraps a row-major arena of `len * dimension` floats.
    pub fn from_flat(data: Vec<f32>, dimension: usize) -> Result<Self> {
        check_dimension(dimension)?;
        if data.len() % dimension != 0 {
            return Err(BeamError::DimensionMismatch {
                expected: dimension,
                actual: data.len() % dimension,
            });
        }
        Ok(Self { data, dimension })
    }

    /// Builds a table from individual rows. All rows must share the first row's dimension.
    pub fn from_rows<R: AsRef<[f32]>>(rows: &[R]) -> Result<Self> {
        let dimension = rows.first().map_or(0, |r| r.as_ref().len());
        let mut table = Self::new(dimension)?;
        table.data.reserve(rows.len() * dimension);
        for row in rows {
            table.push(row.as_ref())?;
        }
        Ok(table)
    }

    /// Appends a vector, returning its node id.
    pub fn push(&mut self, vector: &[f32]) -> Result<u32> {
        if vector.len() != self.dimension {
            return Err(BeamError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        let id = self.len() as u32;
        self.data.extend_from_slice(vector);
        Ok(id)
    }

    /// Number of vectors in the table.
    pub fn len(&self) -> usize {
        self.data.len() / self.dimension
    }

    /// Returns `true` if the table holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Dimension shared by every vector in the table.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// The vector for `id`, or `None` when out of range.
    pub fn get(&self, id: u32) -> Option<&[f32]> {
        let start = (id as usize).checked_mul(self.dimension)?;
        self.data.get(start..start + self.dimension)
    }

    /// O(1) slice into the arena. Panics on an out-of-range id.
    #[inline]
    pub(crate) fn row(&self, id: u32) -> &[f32] {
        let start = id as usize * self.dimension;
        &self.data[start..start + self.dimension]
    }

    /// The raw row-major arena.
    pub fn as_flat(&self) -> &[f32] {
        &self.data
    }

    /// Iterates vectors in node id order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[f32]> + '_ {
        self.data.chunks_exact(self.dimension)
    }
}

fn check_dimension(dimension: usize) -> Result<()> {
    if dimension == 0 || dimension > config::MAX_DIMENSION {
        return Err(BeamError::InvalidDimension(dimension));
    }
    Ok(())
}

/// Directed proximity graph: node id → ordered out-neighborhood.
///
/// Neighbor lists may contain duplicates and self-references. Every neighbor id is
/// checked against the node count at construction, so traversal never indexes out
/// of bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProximityGraph {
    neighbors: Vec<Vec<u32>>,
}

impl ProximityGraph {
    /// Builds a graph from per-node neighbor lists, validating every neighbor id.
    pub fn new(neighbors: Vec<Vec<u32>>) -> Result<Self> {
        let len = neighbors.len();
        for list in &neighbors {
            if let Some(&bad) = list.iter().find(|&&n| n as usize >= len) {
                return Err(BeamError::NodeOutOfBounds { node: bad, len });
            }
        }
        Ok(Self { neighbors })
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// Returns `true` if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Out-neighborhood of `id`, or `None` when out of range.
    pub fn get(&self, id: u32) -> Option<&[u32]> {
        self.neighbors.get(id as usize).map(Vec::as_slice)
    }

    #[inline]
    pub(crate) fn neighbors(&self, id: u32) -> &[u32] {
        &self.neighbors[id as usize]
    }

    /// Total number of directed edges.
    pub fn edge_count(&self) -> usize {
        self.neighbors.iter().map(Vec::len).sum()
    }

    /// Largest out-degree in the graph.
    pub fn max_degree(&self) -> usize {
        self.neighbors.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// All neighbor lists in node id order.
    pub fn adjacency(&self) -> &[Vec<u32>] {
        &self.neighbors
    }

    /// Summary of the out-degree distribution.
    pub fn degree_stats(&self) -> DegreeStats {
        let mut degrees: Vec<usize> = self.neighbors.iter().map(Vec::len).collect();
        degrees.sort_unstable();

        let nodes = degrees.len();
        let edges: usize = degrees.iter().sum();
        let mean_degree = if nodes == 0 {
            0.0
        } else {
            edges as f64 / nodes as f64
        };
        let percentiles = config::DEGREE_PERCENTILES
            .iter()
            .map(|&p| (p, percentile(&degrees, p)))
            .collect();

        DegreeStats {
            nodes,
            edges,
            mean_degree,
            percentiles,
        }
    }
}

/// Out-degree distribution of a [`ProximityGraph`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegreeStats {
    /// Number of nodes.
    pub nodes: usize,
    /// Number of directed edges.
    pub edges: usize,
    /// Mean out-degree.
    pub mean_degree: f64,
    /// `(percentile, degree)` pairs, linearly interpolated between ranks.
    pub percentiles: Vec<(u8, f64)>,
}

/// Linear-interpolated percentile over an ascending slice.
fn percentile(sorted: &[usize], p: u8) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = f64::from(p.min(100)) / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] as f64 + (sorted[hi] as f64 - sorted[lo] as f64) * frac
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_table_rows() {
        let table = VectorTable::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.dimension(), 2);
        assert_eq!(table.get(1), Some(&[3.0, 4.0][..]));
        assert_eq!(table.get(2), None);
        assert_eq!(table.iter().count(), 2);
    }

    #[test]
    fn test_vector_table_rejects_ragged_rows() {
        let err = VectorTable::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(
            err,
            BeamError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_vector_table_rejects_bad_dimension() {
        let empty: [Vec<f32>; 0] = [];
        assert!(matches!(
            VectorTable::from_rows(&empty),
            Err(BeamError::InvalidDimension(0))
        ));
        assert!(matches!(
            VectorTable::new(config::MAX_DIMENSION + 1),
            Err(BeamError::InvalidDimension(_))
        ));
        assert!(VectorTable::from_flat(vec![0.0; 5], 2).is_err());
    }

    #[test]
    fn test_graph_rejects_out_of_range_neighbor() {
        let err = ProximityGraph::new(vec![vec![1], vec![2]]).unwrap_err();
        assert!(matches!(err, BeamError::NodeOutOfBounds { node: 2, len: 2 }));
    }

    #[test]
    fn test_graph_allows_duplicates_and_self_loops() {
        let graph = ProximityGraph::new(vec![vec![0, 1, 1], vec![0]]).unwrap();
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.max_degree(), 3);
        assert_eq!(graph.get(0), Some(&[0, 1, 1][..]));
        assert_eq!(graph.get(5), None);
    }

    #[test]
    fn test_degree_stats() {
        let graph = ProximityGraph::new(vec![vec![], vec![0], vec![0, 1], vec![0, 1, 2]]).unwrap();
        let stats = graph.degree_stats();
        assert_eq!(stats.nodes, 4);
        assert_eq!(stats.edges, 6);
        assert!((stats.mean_degree - 1.5).abs() < 1e-9);
        assert_eq!(stats.percentiles.first(), Some(&(0, 0.0)));
        assert_eq!(stats.percentiles.last(), Some(&(100, 3.0)));
        let median = stats.percentiles.iter().find(|(p, _)| *p == 50).unwrap().1;
        assert!((median - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_degree_stats_empty_graph() {
        let stats = ProximityGraph::default().degree_stats();
        assert_eq!(stats.nodes, 0);
        assert_eq!(stats.mean_degree, 0.0);
        assert!(stats.percentiles.iter().all(|&(_, d)| d == 0.0));
    }
}
