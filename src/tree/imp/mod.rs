//! The public tree handle: root management, the mutating entry points, and
//! root creation/splitting/collapsing.
//!
//! Grounded on the `Tree`/`Inner` split of `src/tree/imp/mod.rs` in the
//! teacher crate — there a thin, cheaply cloned handle (`Tree<B, R, E>`)
//! wraps an `Arc<Mutex<Inner<...>>>` holding the actual storage state; here
//! the handle owns its root directly (no shared inner mutex — a single
//! `Tree` is not `Sync` for mutation, matching the crate-level concurrency
//! notes) but keeps the same "handle is cheap, state is the real payload"
//! shape, with `clone_tree` playing the role the teacher's `Arc`-sharing
//! constructor plays for cheap duplication.

pub(crate) mod iter;
pub(crate) mod node;

use std::ops::Bound;
use std::sync::Arc;

use log::{debug, trace};

use crate::allocator::FreeList;
use crate::cow::CowToken;
use iter::{AscendIter, DescendIter, Dir};
use node::{Ctx, Item, Node};

/// An in-memory, copy-on-write B-tree ordered by `K`.
///
/// See the crate documentation for the overall design; in short, cloning a
/// `Tree` is O(1) (`clone_tree`) and produces a fully independent logical
/// copy thanks to the per-node copy-on-write discipline implemented in
/// [`node`].
pub struct Tree<K, V> {
    root: Option<Arc<Node<K, V>>>,
    degree: usize,
    length: usize,
    cow: CowToken,
    free_list: Arc<FreeList<K, V>>,
}

impl<K, V> Tree<K, V> {
    /// Creates an empty tree of the given degree, backed by a private free
    /// list of default capacity.
    ///
    /// # Panics
    /// Panics if `degree < 2`, matching the teacher's use of `assert!` for
    /// programmer-error conditions rather than a `Result`.
    pub fn new(degree: usize) -> Self {
        Tree::with_free_list(degree, Arc::new(FreeList::default()))
    }

    /// Creates an empty tree of the given degree, sharing `free_list` with
    /// any other tree constructed against the same handle.
    ///
    /// # Panics
    /// Panics if `degree < 2`.
    pub fn with_free_list(degree: usize, free_list: Arc<FreeList<K, V>>) -> Self {
        assert!(degree >= 2, "degree must be at least 2, got {degree}");
        Tree {
            root: None,
            degree,
            length: 0,
            cow: CowToken::new(),
            free_list,
        }
    }

    /// Number of items stored.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Whether the tree holds no items.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The structural degree this tree was constructed with.
    pub fn degree(&self) -> usize {
        self.degree
    }

    fn ctx(&self) -> Ctx<'_, K, V> {
        Ctx {
            degree: self.degree,
            cow: &self.cow,
            free_list: &self.free_list,
        }
    }
}

impl<K: Ord, V> Tree<K, V> {
    /// Looks up `key`, returning a reference to its item if present.
    pub fn get(&self, key: &K) -> Option<&Item<K, V>> {
        let mut node = self.root.as_deref()?;
        loop {
            let (idx, found) = node.search(key);
            if found {
                return Some(&node.items[idx]);
            }
            if node.is_leaf() {
                return None;
            }
            node = &node.children[idx];
        }
    }

    /// Whether `key` is present.
    pub fn has(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// The smallest item, if any.
    pub fn min(&self) -> Option<&Item<K, V>> {
        let mut node = self.root.as_deref()?;
        while !node.is_leaf() {
            node = &node.children[0];
        }
        node.items.first()
    }

    /// The largest item, if any.
    pub fn max(&self) -> Option<&Item<K, V>> {
        let mut node = self.root.as_deref()?;
        while !node.is_leaf() {
            node = node.children.last().expect("internal node has children");
        }
        node.items.last()
    }
}

impl<K: Ord + Clone, V: Clone> Tree<K, V> {
    /// Inserts `item`, or replaces the existing item sharing its key,
    /// returning the displaced item when one existed.
    pub fn replace_or_insert(&mut self, item: Item<K, V>) -> Option<Item<K, V>> {
        match &mut self.root {
            None => {
                trace!("creating root for first insertion");
                let mut leaf = self.free_list.acquire();
                leaf.items.push(item);
                leaf.cow = self.cow.clone();
                self.root = Some(Arc::new(leaf));
                self.length += 1;
                None
            }
            Some(root_arc) => {
                let ctx = self.ctx();
                if root_arc.len() == ctx.max_items() {
                    debug!("root full at {} items, splitting before insertion", root_arc.len());
                    let old_root = Arc::clone(root_arc);
                    let mut new_root = self.free_list.acquire();
                    new_root.children.push(old_root);
                    new_root.cow = self.cow.clone();
                    *root_arc = Arc::new(new_root);
                    let root = Arc::get_mut(root_arc).expect("freshly allocated, uniquely owned");
                    node::split_child(root, 0, &ctx);
                }
                let displaced = node::insert_into(root_arc, item, &ctx);
                if displaced.is_none() {
                    self.length += 1;
                }
                displaced
            }
        }
    }

    /// Removes and returns the item keyed by `key`, if present.
    pub fn delete(&mut self, key: &K) -> Option<Item<K, V>> {
        let root_arc = self.root.as_mut()?;
        let ctx = self.ctx();
        let removed = node::remove_key(root_arc, key, &ctx);
        if removed.is_some() {
            self.length -= 1;
            self.collapse_root();
        }
        removed
    }

    /// Removes and returns the smallest item, if any.
    pub fn delete_min(&mut self) -> Option<Item<K, V>> {
        let root_arc = self.root.as_mut()?;
        let ctx = self.ctx();
        let removed = node::remove_min(root_arc, &ctx);
        if removed.is_some() {
            self.length -= 1;
            self.collapse_root();
        }
        removed
    }

    /// Removes and returns the largest item, if any.
    pub fn delete_max(&mut self) -> Option<Item<K, V>> {
        let root_arc = self.root.as_mut()?;
        let ctx = self.ctx();
        let removed = node::remove_max(root_arc, &ctx);
        if removed.is_some() {
            self.length -= 1;
            self.collapse_root();
        }
        removed
    }

    /// Collapses an internal root with zero items down to its sole child,
    /// and clears the root entirely once it becomes a childless empty leaf.
    fn collapse_root(&mut self) {
        let collapse_to_child = matches!(&self.root, Some(r) if r.len() == 0 && !r.is_leaf());
        if collapse_to_child {
            let ctx = self.ctx();
            let old_root = self.root.take().expect("checked Some above");
            let new_root = match Arc::try_unwrap(old_root) {
                Ok(mut owned) => {
                    let child = owned.children.pop().expect("checked exactly one child above");
                    owned.reset();
                    ctx.free_list.release(owned);
                    child
                }
                Err(shared) => Arc::clone(&shared.children[0]),
            };
            debug!("root collapsed to its sole child");
            self.root = Some(new_root);
            return;
        }
        if matches!(&self.root, Some(r) if r.len() == 0 && r.is_leaf()) {
            self.root = None;
        }
    }

    /// Produces an independent logical copy of this tree in O(1): both
    /// trees receive fresh generation tokens, so any subsequent mutation to
    /// either materializes its own copy of whatever shared structure it
    /// touches rather than disturbing the other.
    pub fn clone_tree(&mut self) -> Tree<K, V> {
        debug!("cloning tree of {} items", self.length);
        self.cow = CowToken::new();
        Tree {
            root: self.root.clone(),
            degree: self.degree,
            length: self.length,
            cow: CowToken::new(),
            free_list: Arc::clone(&self.free_list),
        }
    }

    /// Drops the root. When `release_nodes` is true, first walks the tree
    /// releasing reachable nodes to the free list (up to its capacity)
    /// before dropping whatever remains.
    pub fn clear(&mut self, release_nodes: bool) {
        if let Some(root) = self.root.take() {
            if release_nodes {
                let ctx = self.ctx();
                node::release_subtree(root, &ctx);
            }
        }
        self.length = 0;
        self.cow = CowToken::new();
    }
}

impl<K: Ord + Clone, V: Clone> Tree<K, V> {
    /// Visits every item in ascending order, stopping early if `visit`
    /// returns `false`.
    pub fn ascend(&self, visit: impl FnMut(&Item<K, V>) -> bool) {
        iter::walk(self.root.as_ref(), Dir::Ascending, Bound::Unbounded, Bound::Unbounded, visit);
    }

    /// Visits every item in `[start, stop)` ascending order.
    pub fn ascend_range(&self, start: &K, stop: &K, visit: impl FnMut(&Item<K, V>) -> bool) {
        iter::walk(self.root.as_ref(), Dir::Ascending, Bound::Included(start), Bound::Excluded(stop), visit);
    }

    /// Visits every item with key `>= start` in ascending order.
    pub fn ascend_ge(&self, start: &K, visit: impl FnMut(&Item<K, V>) -> bool) {
        iter::walk(self.root.as_ref(), Dir::Ascending, Bound::Included(start), Bound::Unbounded, visit);
    }

    /// Visits every item with key `< stop` in ascending order.
    pub fn ascend_lt(&self, stop: &K, visit: impl FnMut(&Item<K, V>) -> bool) {
        iter::walk(self.root.as_ref(), Dir::Ascending, Bound::Unbounded, Bound::Excluded(stop), visit);
    }

    /// Visits every item in descending order, stopping early if `visit`
    /// returns `false`.
    pub fn descend(&self, visit: impl FnMut(&Item<K, V>) -> bool) {
        iter::walk(self.root.as_ref(), Dir::Descending, Bound::Unbounded, Bound::Unbounded, visit);
    }

    /// Visits every item in `(lo, hi]` descending order.
    pub fn descend_range(&self, hi: &K, lo: &K, visit: impl FnMut(&Item<K, V>) -> bool) {
        iter::walk(self.root.as_ref(), Dir::Descending, Bound::Included(hi), Bound::Excluded(lo), visit);
    }

    /// Visits every item with key `<= hi` in descending order.
    pub fn descend_le(&self, hi: &K, visit: impl FnMut(&Item<K, V>) -> bool) {
        iter::walk(self.root.as_ref(), Dir::Descending, Bound::Included(hi), Bound::Unbounded, visit);
    }

    /// Visits every item with key `> lo` in descending order.
    pub fn descend_gt(&self, lo: &K, visit: impl FnMut(&Item<K, V>) -> bool) {
        iter::walk(self.root.as_ref(), Dir::Descending, Bound::Unbounded, Bound::Excluded(lo), visit);
    }

    /// An ascending `Iterator` over every item.
    pub fn iter_ascend(&self) -> impl Iterator<Item = Item<K, V>> {
        AscendIter::new(self.root.clone(), Bound::Unbounded, Bound::Unbounded)
    }

    /// An ascending `Iterator` over `[start, stop)`.
    pub fn iter_ascend_range(&self, start: K, stop: K) -> impl Iterator<Item = Item<K, V>> {
        AscendIter::new(self.root.clone(), Bound::Included(&start), Bound::Excluded(stop))
    }

    /// A descending `Iterator` over every item.
    pub fn iter_descend(&self) -> impl Iterator<Item = Item<K, V>> {
        DescendIter::new(self.root.clone(), Bound::Unbounded, Bound::Unbounded)
    }

    /// A descending `Iterator` over `(lo, hi]`.
    pub fn iter_descend_range(&self, hi: K, lo: K) -> impl Iterator<Item = Item<K, V>> {
        DescendIter::new(self.root.clone(), Bound::Included(&hi), Bound::Excluded(lo))
    }
}

#[cfg(debug_assertions)]
impl<K: Ord + std::fmt::Debug, V> Tree<K, V> {
    /// Asserts every shape invariant described in the crate documentation,
    /// for use from tests.
    pub fn check_invariants(&self) {
        node::check::check_invariants(self.root.as_ref(), self.degree);
    }
}
