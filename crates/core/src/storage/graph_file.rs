//! ParlayANN graph files.
//!
//! Layout (all little-endian `i32`):
//! `num_points`, `max_degree`, then `num_points` degrees, then every node's
//! neighbor list back to back. Nothing may follow the last list.

use crate::beam::graph::ProximityGraph;
use crate::config;
use crate::error::{BeamError, Result};
use crate::storage::{write_atomic, I32Reader};
use std::fs;
use std::path::Path;

/// Parses an in-memory graph file image.
pub fn decode_graph(bytes: &[u8]) -> Result<ProximityGraph> {
    let mut reader = I32Reader::new(bytes);
    let num_points = reader.read_count("point count")?;
    let max_degree = reader.read_count("max degree")?;

    // Each point needs at least its 4-byte degree entry.
    if num_points > reader.remaining() / 4 {
        return Err(BeamError::Format(format!(
            "{num_points} points declared but only {} bytes follow",
            reader.remaining()
        )));
    }
    let mut degrees = Vec::with_capacity(num_points);
    for _ in 0..num_points {
        let degree = reader.read_count("degree")?;
        if degree > max_degree {
            return Err(BeamError::Format(format!(
                "degree {degree} exceeds declared max degree {max_degree}"
            )));
        }
        degrees.push(degree);
    }

    // The lists must fill the rest of the file exactly; checked before allocating them.
    let expected = degrees
        .iter()
        .try_fold(0usize, |acc, &d| acc.checked_add(d))
        .and_then(|total| total.checked_mul(4))
        .ok_or_else(|| BeamError::Format("neighbor list lengths overflow".into()))?;
    if expected != reader.remaining() {
        return Err(BeamError::Format(format!(
            "degrees declare {expected} bytes of neighbor ids but {} bytes follow",
            reader.remaining()
        )));
    }

    let mut neighbors = Vec::with_capacity(num_points);
    for degree in degrees {
        let mut list = Vec::with_capacity(degree);
        for _ in 0..degree {
            let id = reader.read_i32("neighbor id")?;
            let id = u32::try_from(id)
                .map_err(|_| BeamError::Format(format!("negative neighbor id {id}")))?;
            list.push(id);
        }
        neighbors.push(list);
    }
    ProximityGraph::new(neighbors)
}

/// Serializes a graph into ParlayANN file bytes.
pub fn encode_graph(graph: &ProximityGraph) -> Vec<u8> {
    let adjacency = graph.adjacency();
    let mut out =
        Vec::with_capacity(config::GRAPH_HEADER_BYTES + (adjacency.len() + graph.edge_count()) * 4);
    out.extend_from_slice(&(adjacency.len() as i32).to_le_bytes());
    out.extend_from_slice(&(graph.max_degree() as i32).to_le_bytes());
    for list in adjacency {
        out.extend_from_slice(&(list.len() as i32).to_le_bytes());
    }
    for &id in adjacency.iter().flatten() {
        out.extend_from_slice(&(id as i32).to_le_bytes());
    }
    out
}

/// Loads a graph file into a [`ProximityGraph`].
pub fn read_graph(path: impl AsRef<Path>) -> Result<ProximityGraph> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let graph = decode_graph(&bytes)?;
    tracing::info!(
        path = %path.display(),
        points = graph.len(),
        edges = graph.edge_count(),
        max_degree = graph.max_degree(),
        "Loaded graph"
    );
    Ok(graph)
}

/// Writes a [`ProximityGraph`] to `path` in ParlayANN format.
pub fn write_graph(path: impl AsRef<Path>, graph: &ProximityGraph) -> Result<()> {
    write_atomic(path.as_ref(), &encode_graph(graph))
}
