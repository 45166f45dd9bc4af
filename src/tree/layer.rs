//! Read-mostly and mutating contracts implemented by [`Tree`].
//!
//! Grounded on the `TreeBaseLayer`/`TreeLayer` split of the teacher crate: a
//! base trait exposing point reads plus a richer trait built atop it for
//! everything else, so callers can be generic over "something ordered-map
//! shaped" the same way the teacher's database layer is generic over
//! `TreeLayer<M>`. The teacher's traits are keyed to on-disk synced trees
//! (`Result<_, Error>`, a `sync`/`Pointer` associated machinery); this split
//! keeps the shape but drops the persistence-specific members, since
//! persistence of tree contents is explicitly out of scope.

use super::imp::node::Item;
use super::imp::Tree;

/// The read contract: point lookups, extremes, and visitor-based iteration.
pub trait OrderedMap<K, V> {
    /// Looks up `key`, returning a reference to its item if present.
    fn get(&self, key: &K) -> Option<&Item<K, V>>;

    /// Whether `key` is present.
    fn has(&self, key: &K) -> bool;

    /// The smallest item, if any.
    fn min(&self) -> Option<&Item<K, V>>;

    /// The largest item, if any.
    fn max(&self) -> Option<&Item<K, V>>;

    /// Number of items stored.
    fn len(&self) -> usize;

    /// Whether the map holds no items.
    fn is_empty(&self) -> bool;

    /// Visits every item in ascending order, stopping early if `visit`
    /// returns `false`.
    fn ascend(&self, visit: impl FnMut(&Item<K, V>) -> bool);

    /// Visits every item in descending order, stopping early if `visit`
    /// returns `false`.
    fn descend(&self, visit: impl FnMut(&Item<K, V>) -> bool);
}

/// The mutating contract built atop [`OrderedMap`].
pub trait OrderedMapMut<K, V>: OrderedMap<K, V> {
    /// Inserts `item`, or replaces the existing item sharing its key,
    /// returning the displaced item when one existed.
    fn replace_or_insert(&mut self, item: Item<K, V>) -> Option<Item<K, V>>;

    /// Removes and returns the item keyed by `key`, if present.
    fn delete(&mut self, key: &K) -> Option<Item<K, V>>;

    /// Removes and returns the smallest item, if any.
    fn delete_min(&mut self) -> Option<Item<K, V>>;

    /// Removes and returns the largest item, if any.
    fn delete_max(&mut self) -> Option<Item<K, V>>;

    /// Drops all items, optionally returning reachable nodes to the free
    /// list first.
    fn clear(&mut self, release_nodes: bool);
}

impl<K: Ord + Clone, V: Clone> OrderedMap<K, V> for Tree<K, V> {
    fn get(&self, key: &K) -> Option<&Item<K, V>> {
        Tree::get(self, key)
    }

    fn has(&self, key: &K) -> bool {
        Tree::has(self, key)
    }

    fn min(&self) -> Option<&Item<K, V>> {
        Tree::min(self)
    }

    fn max(&self) -> Option<&Item<K, V>> {
        Tree::max(self)
    }

    fn len(&self) -> usize {
        Tree::len(self)
    }

    fn is_empty(&self) -> bool {
        Tree::is_empty(self)
    }

    fn ascend(&self, visit: impl FnMut(&Item<K, V>) -> bool) {
        Tree::ascend(self, visit)
    }

    fn descend(&self, visit: impl FnMut(&Item<K, V>) -> bool) {
        Tree::descend(self, visit)
    }
}

impl<K: Ord + Clone, V: Clone> OrderedMapMut<K, V> for Tree<K, V> {
    fn replace_or_insert(&mut self, item: Item<K, V>) -> Option<Item<K, V>> {
        Tree::replace_or_insert(self, item)
    }

    fn delete(&mut self, key: &K) -> Option<Item<K, V>> {
        Tree::delete(self, key)
    }

    fn delete_min(&mut self) -> Option<Item<K, V>> {
        Tree::delete_min(self)
    }

    fn delete_max(&mut self) -> Option<Item<K, V>> {
        Tree::delete_max(self)
    }

    fn clear(&mut self, release_nodes: bool) {
        Tree::clear(self, release_nodes)
    }
}
