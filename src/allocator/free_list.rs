use parking_lot::Mutex;

use crate::tree::imp::node::Node;

/// Default bound on the number of nodes a [`FreeList`] retains, matching the
/// distilled design's default pool capacity.
pub const DEFAULT_CAPACITY: usize = 32;

struct Pool<K, V> {
    nodes: Vec<Node<K, V>>,
}

/// A bounded pool of reusable [`Node`] allocations, shared by any number of
/// [`crate::Tree`] instances.
///
/// This plays the role `src/allocator/worst_fit_list.rs` plays for on-disk
/// segments in the teacher crate — a plain, list-backed bookkeeping
/// structure — but pools whole in-memory node allocations instead of disk
/// byte ranges, and is best-effort rather than exhaustive: there is no
/// requirement to ever satisfy every request from the pool, only to avoid
/// retaining more than `capacity` nodes.
///
/// The internal list is guarded by a `parking_lot::Mutex` so a single free
/// list can back trees mutated from different threads (never the same tree
/// concurrently, see the crate-level concurrency notes); contention is not
/// expected to be on the hot path.
pub struct FreeList<K, V> {
    pool: Mutex<Pool<K, V>>,
    capacity: usize,
}

impl<K, V> FreeList<K, V> {
    /// Creates an empty pool bounded to `capacity` retained nodes.
    pub fn new(capacity: usize) -> Self {
        FreeList {
            pool: Mutex::new(Pool { nodes: Vec::new() }),
            capacity,
        }
    }

    /// Returns a previously released node with empty sequences, or a fresh
    /// allocation if the pool is empty.
    pub fn acquire(&self) -> Node<K, V> {
        let mut pool = self.pool.lock();
        pool.nodes.pop().unwrap_or_else(Node::empty_leaf)
    }

    /// Stores `node` (whose sequences must already be empty) if the pool has
    /// spare capacity, returning whether it was kept. The caller drops the
    /// node itself when this returns `false`.
    pub fn release(&self, mut node: Node<K, V>) -> bool {
        node.reset();
        let mut pool = self.pool.lock();
        if pool.nodes.len() < self.capacity {
            pool.nodes.push(node);
            true
        } else {
            false
        }
    }

    /// Number of nodes currently retained in the pool.
    pub fn len(&self) -> usize {
        self.pool.lock().nodes.len()
    }

    /// Whether the pool has no spare capacity left.
    pub fn is_full(&self) -> bool {
        self.pool.lock().nodes.len() >= self.capacity
    }

    /// Configured retention bound.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<K, V> Default for FreeList<K, V> {
    fn default() -> Self {
        FreeList::new(DEFAULT_CAPACITY)
    }
}
