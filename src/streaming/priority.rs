//! Nearest-first ordering of pending chunk rebuilds

use crate::terrain::coord::ChunkId;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A chunk whose target tier differs from its current one
#[derive(Clone, Copy, Debug)]
pub struct RebuildRequest {
    pub id: ChunkId,
    pub target_lod: u32,
    pub distance: f32, // Horizontal distance from camera
}

// Implement Ord/PartialOrd for BinaryHeap (max-heap by default)
impl Eq for RebuildRequest {}

impl PartialEq for RebuildRequest {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Ord for RebuildRequest {
    fn cmp(&self, other: &Self) -> Ordering {
        // Closer chunks rank higher; ties broken by arena order for determinism
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for RebuildRequest {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority queue of rebuilds for one frame
#[derive(Default)]
pub struct RebuildQueue {
    heap: BinaryHeap<RebuildRequest>,
}

impl RebuildQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all queued rebuilds
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    pub fn push(&mut self, request: RebuildRequest) {
        self.heap.push(request);
    }

    /// Get the nearest pending rebuild
    pub fn pop(&mut self) -> Option<RebuildRequest> {
        self.heap.pop()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(id: usize, distance: f32) -> RebuildRequest {
        RebuildRequest {
            id: ChunkId(id),
            target_lod: 0,
            distance,
        }
    }

    #[test]
    fn test_nearest_pops_first() {
        let mut queue = RebuildQueue::new();
        assert!(queue.is_empty());

        queue.push(request(0, 900.0));
        queue.push(request(1, 50.0));
        queue.push(request(2, 400.0));
        assert_eq!(queue.len(), 3);

        assert_eq!(queue.pop().unwrap().id, ChunkId(1));
        assert_eq!(queue.pop().unwrap().id, ChunkId(2));
        assert_eq!(queue.pop().unwrap().id, ChunkId(0));
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_ties_break_by_arena_order() {
        let mut queue = RebuildQueue::new();
        queue.push(request(7, 100.0));
        queue.push(request(3, 100.0));
        queue.push(request(5, 100.0));

        assert_eq!(queue.pop().unwrap().id, ChunkId(3));
        assert_eq!(queue.pop().unwrap().id, ChunkId(5));
        assert_eq!(queue.pop().unwrap().id, ChunkId(7));
    }

    #[test]
    fn test_nan_distance_sorts_last() {
        let mut queue = RebuildQueue::new();
        queue.push(request(0, f32::NAN));
        queue.push(request(1, 10.0));
        assert_eq!(queue.pop().unwrap().id, ChunkId(1));
    }

    #[test]
    fn test_clear() {
        let mut queue = RebuildQueue::new();
        queue.push(request(0, 1.0));
        queue.clear();
        assert!(queue.is_empty());
    }
}
