//! Compared set for beam traversal.
//!
//! Tracks every node whose distance to the query has been computed. Membership is an
//! O(1) array lookup instead of a `HashSet<u32>`; insertion order is kept alongside
//! so the set can be returned as a sequence.

/// Set of node ids that have been scored and enqueued, in first-scored order.
#[derive(Debug)]
pub struct ComparedSet {
    marks: Vec<bool>,
    order: Vec<u32>,
}

impl ComparedSet {
    /// Creates an empty set able to hold ids in `[0, capacity)`.
    pub fn new(capacity: usize) -> Self {
        Self {
            marks: vec![false; capacity],
            order: Vec::new(),
        }
    }

    /// Marks `id` as compared. Returns `true` if it was NOT previously compared.
    #[inline]
    pub fn insert(&mut self, id: u32) -> bool {
        let idx = id as usize;
        if self.marks[idx] {
            false
        } else {
            self.marks[idx] = true;
            self.order.push(id);
            true
        }
    }

    /// Marks the seed node so it is never enqueued again, without listing it as compared.
    pub fn mark_seed(&mut self, id: u32) {
        self.marks[id as usize] = true;
    }

    #[cfg(test)]
    pub fn contains(&self, id: u32) -> bool {
        self.marks.get(id as usize).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Consumes the set, yielding ids in the order they were first compared.
    pub fn into_vec(self) -> Vec<u32> {
        self.order
    }
}
