//! The beam: a priority frontier of scored candidates.
//!
//! Backed by a `BinaryHeap` with reversed ordering so the lowest score pops first.
//! Ties on score fall back to the lower node id, giving the same order as sorting
//! `(score, id)` pairs ascending.

use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A scored candidate: `(score, node id)`. Lower score = closer to the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeamEntry {
    pub score: OrderedFloat<f32>,
    pub node: u32,
}

impl BeamEntry {
    pub fn new(score: f32, node: u32) -> Self {
        Self {
            score: OrderedFloat(score),
            node,
        }
    }
}

// BinaryHeap is a max-heap; invert so the smallest (score, node) is on top.
impl Ord for BeamEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .cmp(&self.score)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for BeamEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Unbounded min-frontier of [`BeamEntry`] values.
#[derive(Debug, Default)]
pub struct Beam {
    heap: BinaryHeap<BeamEntry>,
}

impl Beam {
    pub fn new() -> Self {
        Self::default()
    }

    /// A beam holding a single seed entry.
    pub fn seeded(score: f32, node: u32) -> Self {
        let mut beam = Self::new();
        beam.push(score, node);
        beam
    }

    #[inline]
    pub fn push(&mut self, score: f32, node: u32) {
        self.heap.push(BeamEntry::new(score, node));
    }

    /// Removes and returns the lowest-score entry.
    #[inline]
    pub fn pop(&mut self) -> Option<BeamEntry> {
        self.heap.pop()
    }

    /// The entry the next `pop` would return.
    #[cfg(test)]
    pub fn peek(&self) -> Option<&BeamEntry> {
        self.heap.peek()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drains the beam in pop order.
    #[cfg(test)]
    pub fn into_sorted_vec(self) -> Vec<BeamEntry> {
        // into_sorted_vec is ascending by Ord, which is descending by score here
        let mut entries = self.heap.into_sorted_vec();
        entries.reverse();
        entries
    }
}
