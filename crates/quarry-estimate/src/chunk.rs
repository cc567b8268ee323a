//! Size-bounded chunk planning.

/// Default chunk size threshold: 25 MiB.
pub const DEFAULT_CHUNK_SIZE_BYTES: u64 = 25 * 1024 * 1024;

/// A group of work items transferred together.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk<T> {
    /// The items in walk order.
    pub items: Vec<T>,
    /// Sum of the items' estimated sizes, in bytes.
    pub estimated_bytes: f64,
}

impl<T> Chunk<T> {
    const fn new() -> Self {
        Self {
            items: Vec::new(),
            estimated_bytes: 0.0,
        }
    }

    /// Returns the number of items in the chunk.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the chunk has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Splits a stream of sized items into chunks bounded by a threshold.
///
/// Items keep their input order. Every produced chunk has an estimated size
/// of at most the threshold, except a chunk holding a single item that is
/// larger than the threshold on its own. Such an item always gets a chunk
/// of its own and is never dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkPlanner {
    threshold_bytes: f64,
}

impl ChunkPlanner {
    /// Creates a planner closing chunks at `threshold_bytes`.
    #[must_use]
    pub const fn new(threshold_bytes: u64) -> Self {
        Self {
            threshold_bytes: threshold_bytes as f64,
        }
    }

    /// Returns the threshold in bytes.
    #[must_use]
    pub const fn threshold_bytes(&self) -> f64 {
        self.threshold_bytes
    }

    /// Plans chunks for `(item, estimated_bytes)` pairs.
    pub fn plan<T, I>(&self, items: I) -> Vec<Chunk<T>>
    where
        I: IntoIterator<Item = (T, f64)>,
    {
        let mut chunks = Vec::new();
        let mut current = Chunk::new();

        for (item, size) in items {
            let size = size.max(0.0);
            // Close the running chunk before it would cross the threshold.
            if !current.is_empty() && current.estimated_bytes + size > self.threshold_bytes {
                chunks.push(std::mem::replace(&mut current, Chunk::new()));
            }

            current.items.push(item);
            current.estimated_bytes += size;

            if current.estimated_bytes >= self.threshold_bytes {
                chunks.push(std::mem::replace(&mut current, Chunk::new()));
            }
        }

        if !current.is_empty() {
            chunks.push(current);
        }
        chunks
    }
}

impl Default for ChunkPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE_BYTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_bounded<T>(planner: &ChunkPlanner, chunks: &[Chunk<T>]) {
        for chunk in chunks {
            assert!(!chunk.is_empty());
            assert!(
                chunk.estimated_bytes <= planner.threshold_bytes() || chunk.len() == 1,
                "chunk of {} items estimated at {} bytes",
                chunk.len(),
                chunk.estimated_bytes
            );
        }
    }

    #[test]
    fn test_empty_input() {
        let chunks = ChunkPlanner::new(100).plan(Vec::<(u32, f64)>::new());
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_small_items_share_chunk() {
        let chunks = ChunkPlanner::new(100).plan([(1, 10.0), (2, 20.0), (3, 30.0)]);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].items, vec![1, 2, 3]);
        assert_relative_eq!(chunks[0].estimated_bytes, 60.0);
    }

    #[test]
    fn test_closes_before_crossing_threshold() {
        let planner = ChunkPlanner::new(100);
        let chunks = planner.plan([(1, 60.0), (2, 50.0), (3, 40.0), (4, 10.0)]);

        let items: Vec<_> = chunks.iter().map(|c| c.items.clone()).collect();
        assert_eq!(items, vec![vec![1], vec![2, 3, 4]]);
        assert_bounded(&planner, &chunks);
    }

    #[test]
    fn test_closes_when_threshold_reached() {
        let planner = ChunkPlanner::new(100);
        let chunks = planner.plan([(1, 50.0), (2, 50.0), (3, 1.0)]);

        let items: Vec<_> = chunks.iter().map(|c| c.items.clone()).collect();
        assert_eq!(items, vec![vec![1, 2], vec![3]]);
    }

    #[test]
    fn test_oversized_item_gets_own_chunk() {
        let planner = ChunkPlanner::new(100);
        let chunks = planner.plan([(1, 30.0), (2, 500.0), (3, 30.0)]);

        let items: Vec<_> = chunks.iter().map(|c| c.items.clone()).collect();
        assert_eq!(items, vec![vec![1], vec![2], vec![3]]);
        assert_relative_eq!(chunks[1].estimated_bytes, 500.0);
        assert_bounded(&planner, &chunks);
    }

    #[test]
    fn test_many_items_all_bounded() {
        let planner = ChunkPlanner::new(1000);
        let sizes = (0..500).map(|i| (i, f64::from((i * 37) % 450)));
        let chunks = planner.plan(sizes);

        let total: usize = chunks.iter().map(Chunk::len).sum();
        assert_eq!(total, 500);
        assert_bounded(&planner, &chunks);

        let order: Vec<_> = chunks.iter().flat_map(|c| c.items.iter().copied()).collect();
        assert_eq!(order, (0..500).collect::<Vec<_>>());
    }

    #[test]
    fn test_default_threshold() {
        assert_relative_eq!(
            ChunkPlanner::default().threshold_bytes(),
            25.0 * 1024.0 * 1024.0
        );
    }
}
