//! B-tree node shape and the recursive split/insert/remove algorithms that
//! keep it balanced.
//!
//! Grounded on the splitting/merging/rebalancing machinery in
//! `src/tree/imp/mod.rs` and `src/tree/imp/flush.rs` of the teacher crate
//! (`FillUpResult`, `rebalance_tree`, `TakeChildBuffer`), re-targeted from an
//! on-disk B-epsilon tree with message buffers to a plain in-memory B-tree.

use std::mem;
use std::sync::Arc;

use crate::allocator::FreeList;
use crate::cow::CowToken;

/// A key/value pair stored in the tree, ordered strictly by `key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> Item<K, V> {
    /// Builds a new item.
    pub fn new(key: K, value: V) -> Self {
        Item { key, value }
    }
}

impl<K: Ord> Item<K, ()> {
    /// Convenience constructor for set-like usage (`Item<K, ()>`).
    pub fn set(key: K) -> Self {
        Item { key, value: () }
    }
}

/// A B-tree node: a sorted run of items and, for internal nodes, one more
/// child than it has items.
#[derive(Debug)]
pub struct Node<K, V> {
    pub(crate) items: Vec<Item<K, V>>,
    pub(crate) children: Vec<Arc<Node<K, V>>>,
    pub(crate) cow: CowToken,
}

impl<K, V> Node<K, V> {
    /// An empty leaf stamped with a throwaway generation; callers
    /// materializing a node immediately overwrite `cow`.
    pub(crate) fn empty_leaf() -> Self {
        Node {
            items: Vec::new(),
            children: Vec::new(),
            cow: CowToken::new(),
        }
    }

    /// Truncates this node back to the state the free list hands out,
    /// dropping any child `Arc`s it held (and so their refcounts).
    pub(crate) fn reset(&mut self) {
        self.items.clear();
        self.children.clear();
        self.cow = CowToken::new();
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }
}

impl<K: Ord, V> Node<K, V> {
    /// Binary search for `key` among this node's items.
    pub(crate) fn search(&self, key: &K) -> (usize, bool) {
        match self.items.binary_search_by(|it| it.key.cmp(key)) {
            Ok(idx) => (idx, true),
            Err(idx) => (idx, false),
        }
    }
}

/// Per-call context bundling the parameters every recursive operation needs:
/// the structural degree, the mutating tree's generation token, and the
/// shared node pool.
pub(crate) struct Ctx<'a, K, V> {
    pub(crate) degree: usize,
    pub(crate) cow: &'a CowToken,
    pub(crate) free_list: &'a FreeList<K, V>,
}

impl<'a, K, V> Ctx<'a, K, V> {
    pub(crate) fn max_items(&self) -> usize {
        2 * self.degree - 1
    }
}

/// Materializes `slot` against `ctx.cow`: if its generation already matches,
/// returns a mutable borrow directly; otherwise shallow-copies it (via a
/// node drawn from the free list) and stamps the copy with `ctx.cow` before
/// returning a mutable borrow of the copy. This is the sole mechanism behind
/// snapshot semantics across clones.
pub(crate) fn materialize<'s, K, V>(
    slot: &'s mut Arc<Node<K, V>>,
    ctx: &Ctx<K, V>,
) -> &'s mut Node<K, V>
where
    K: Clone,
    V: Clone,
{
    if !slot.cow.same(ctx.cow) {
        let mut fresh = ctx.free_list.acquire();
        fresh.items = slot.items.clone();
        fresh.children = slot.children.clone();
        fresh.cow = ctx.cow.clone();
        *slot = Arc::new(fresh);
    }
    Arc::get_mut(slot).expect(
        "a node whose cow token matches the mutating tree's is never referenced by another tree",
    )
}

/// Splits the full child at `child_idx` of `parent` (which must already be
/// materialized), promoting its median item into `parent` and inserting a
/// freshly allocated right sibling at `child_idx + 1`.
pub(crate) fn split_child<K, V>(parent: &mut Node<K, V>, child_idx: usize, ctx: &Ctx<K, V>)
where
    K: Ord + Clone,
    V: Clone,
{
    let degree = ctx.degree;
    let child = materialize(&mut parent.children[child_idx], ctx);
    debug_assert_eq!(
        child.items.len(),
        ctx.max_items(),
        "split_child called on a node that is not full"
    );

    let was_leaf = child.is_leaf();
    let mut tail = child.items.split_off(degree - 1);
    let median = tail.remove(0);
    let right_items = tail;
    let right_children = if was_leaf {
        Vec::new()
    } else {
        child.children.split_off(degree)
    };

    let mut right = ctx.free_list.acquire();
    right.items = right_items;
    right.children = right_children;
    right.cow = ctx.cow.clone();

    parent.items.insert(child_idx, median);
    parent.children.insert(child_idx + 1, Arc::new(right));
}

/// Inserts `item` into the subtree rooted at `slot`, returning the item it
/// displaced (`Some`, length unchanged) or `None` (newly inserted, length
/// grows by one).
pub(crate) fn insert_into<K, V>(
    slot: &mut Arc<Node<K, V>>,
    item: Item<K, V>,
    ctx: &Ctx<K, V>,
) -> Option<Item<K, V>>
where
    K: Ord + Clone,
    V: Clone,
{
    let node = materialize(slot, ctx);
    let (idx, found) = node.search(&item.key);

    if found {
        return Some(mem::replace(&mut node.items[idx], item));
    }

    if node.is_leaf() {
        node.items.insert(idx, item);
        return None;
    }

    let mut child_idx = idx;
    if node.children[child_idx].len() == ctx.max_items() {
        split_child(node, child_idx, ctx);
        match item.key.cmp(&node.items[child_idx].key) {
            std::cmp::Ordering::Equal => {
                return Some(mem::replace(&mut node.items[child_idx], item));
            }
            std::cmp::Ordering::Greater => child_idx += 1,
            std::cmp::Ordering::Less => {}
        }
    }
    insert_into(&mut node.children[child_idx], item, ctx)
}

/// Ensures `node.children[child_idx]` holds at least `ctx.degree` items
/// before it is descended into for a deletion, stealing from a lendable
/// sibling or merging otherwise. Returns the (possibly shifted, when a
/// left-merge occurred) index of the now-fat child.
fn ensure_child_fat<K, V>(node: &mut Node<K, V>, child_idx: usize, ctx: &Ctx<K, V>) -> usize
where
    K: Ord + Clone,
    V: Clone,
{
    if node.children[child_idx].len() >= ctx.degree {
        return child_idx;
    }

    let have_left = child_idx > 0 && node.children[child_idx - 1].len() >= ctx.degree;
    let have_right =
        child_idx + 1 < node.children.len() && node.children[child_idx + 1].len() >= ctx.degree;

    if have_left {
        steal_from_left(node, child_idx, ctx);
        child_idx
    } else if have_right {
        steal_from_right(node, child_idx, ctx);
        child_idx
    } else if child_idx > 0 {
        merge_children(node, child_idx - 1, ctx);
        child_idx - 1
    } else {
        merge_children(node, child_idx, ctx);
        child_idx
    }
}

/// Rotates the parent's pivot at `child_idx - 1` down into the head of
/// `children[child_idx]`, replacing it with the tail of the left sibling.
fn steal_from_left<K, V>(node: &mut Node<K, V>, child_idx: usize, ctx: &Ctx<K, V>)
where
    K: Ord + Clone,
    V: Clone,
{
    let left = materialize(&mut node.children[child_idx - 1], ctx);
    let moved_item = left
        .items
        .pop()
        .expect("a lendable sibling has spare items to steal");
    let moved_child = if !left.is_leaf() {
        left.children.pop()
    } else {
        None
    };

    let pivot = mem::replace(&mut node.items[child_idx - 1], moved_item);

    let child = materialize(&mut node.children[child_idx], ctx);
    child.items.insert(0, pivot);
    if let Some(c) = moved_child {
        child.children.insert(0, c);
    }
}

/// Symmetric to [`steal_from_left`]: rotates the pivot at `child_idx` up
/// from the head of the right sibling.
fn steal_from_right<K, V>(node: &mut Node<K, V>, child_idx: usize, ctx: &Ctx<K, V>)
where
    K: Ord + Clone,
    V: Clone,
{
    let right = materialize(&mut node.children[child_idx + 1], ctx);
    let moved_item = right.items.remove(0);
    let moved_child = if !right.is_leaf() {
        Some(right.children.remove(0))
    } else {
        None
    };

    let pivot = mem::replace(&mut node.items[child_idx], moved_item);

    let child = materialize(&mut node.children[child_idx], ctx);
    child.items.push(pivot);
    if let Some(c) = moved_child {
        child.children.push(c);
    }
}

/// Folds `node.items[left_idx]` and `node.children[left_idx + 1]` into
/// `node.children[left_idx]`, releasing the absorbed sibling to the free
/// list when no other tree still references it.
fn merge_children<K, V>(node: &mut Node<K, V>, left_idx: usize, ctx: &Ctx<K, V>)
where
    K: Ord + Clone,
    V: Clone,
{
    let pivot = node.items.remove(left_idx);
    let right_arc = node.children.remove(left_idx + 1);

    let left = materialize(&mut node.children[left_idx], ctx);
    left.items.push(pivot);

    match Arc::try_unwrap(right_arc) {
        Ok(mut right) => {
            left.items.append(&mut right.items);
            left.children.append(&mut right.children);
            right.reset();
            ctx.free_list.release(right);
        }
        Err(shared) => {
            left.items.extend(shared.items.iter().cloned());
            left.children.extend(shared.children.iter().cloned());
        }
    }
}

/// Removes the item keyed by `key` from the subtree rooted at `slot`.
pub(crate) fn remove_key<K, V>(
    slot: &mut Arc<Node<K, V>>,
    key: &K,
    ctx: &Ctx<K, V>,
) -> Option<Item<K, V>>
where
    K: Ord + Clone,
    V: Clone,
{
    let node = materialize(slot, ctx);
    let (idx, found) = node.search(key);

    if node.is_leaf() {
        return if found {
            Some(node.items.remove(idx))
        } else {
            None
        };
    }

    if found {
        ensure_child_fat(node, idx, ctx);
        // `ensure_child_fat` may steal from the right sibling or merge across
        // this exact pivot to fatten `children[idx]`, both of which push the
        // key we just found down into that child instead of leaving it in
        // `node.items`. Re-search rather than trusting the pre-rebalance
        // `idx`/`found`, mirroring the restart a reference B-tree's delete
        // takes after fattening a child it's about to recurse into.
        return match node.search(key) {
            (idx, true) => {
                let predecessor = remove_max(&mut node.children[idx], ctx)
                    .expect("a child fattened to >= degree items is never empty");
                Some(mem::replace(&mut node.items[idx], predecessor))
            }
            (idx, false) => remove_key(&mut node.children[idx], key, ctx),
        };
    }

    let idx = ensure_child_fat(node, idx, ctx);
    remove_key(&mut node.children[idx], key, ctx)
}

/// Removes and returns the smallest item in the subtree rooted at `slot`.
pub(crate) fn remove_min<K, V>(slot: &mut Arc<Node<K, V>>, ctx: &Ctx<K, V>) -> Option<Item<K, V>>
where
    K: Ord + Clone,
    V: Clone,
{
    let node = materialize(slot, ctx);
    if node.is_leaf() {
        return if node.items.is_empty() {
            None
        } else {
            Some(node.items.remove(0))
        };
    }
    let idx = ensure_child_fat(node, 0, ctx);
    remove_min(&mut node.children[idx], ctx)
}

/// Removes and returns the largest item in the subtree rooted at `slot`.
pub(crate) fn remove_max<K, V>(slot: &mut Arc<Node<K, V>>, ctx: &Ctx<K, V>) -> Option<Item<K, V>>
where
    K: Ord + Clone,
    V: Clone,
{
    let node = materialize(slot, ctx);
    if node.is_leaf() {
        return node.items.pop();
    }
    let last = node.children.len() - 1;
    let idx = ensure_child_fat(node, last, ctx);
    remove_max(&mut node.children[idx], ctx)
}

/// Walks the subtree rooted at `node`, releasing every node reachable from
/// it to the free list once no other tree still shares it, stopping early
/// once the pool has no spare capacity left. Used by `Tree::clear(true)`.
pub(crate) fn release_subtree<K, V>(node: Arc<Node<K, V>>, ctx: &Ctx<K, V>)
where
    K: Clone,
    V: Clone,
{
    if ctx.free_list.is_full() {
        return;
    }
    if let Ok(mut owned) = Arc::try_unwrap(node) {
        for child in mem::take(&mut owned.children) {
            release_subtree(child, ctx);
        }
        owned.reset();
        ctx.free_list.release(owned);
    }
}

#[cfg(debug_assertions)]
pub(crate) mod check {
    use super::*;

    /// Recursively asserts the shape invariants of §3: item counts within
    /// bounds, child counts consistent with item counts, equal leaf depth,
    /// and strictly sorted, correctly bounded keys. Intended for use from
    /// tests, mirroring `tests/src/pivot_key.rs`'s recursive structural
    /// walk in the teacher crate.
    pub fn check_invariants<K: Ord + std::fmt::Debug, V>(root: Option<&Arc<Node<K, V>>>, degree: usize) {
        if let Some(root) = root {
            let depth = leaf_depth(root, 0);
            check_node(root, degree, true, None, None, 0, depth);
        }
    }

    fn leaf_depth<K, V>(node: &Node<K, V>, depth: usize) -> usize {
        if node.is_leaf() {
            depth
        } else {
            leaf_depth(&node.children[0], depth + 1)
        }
    }

    fn check_node<K: Ord + std::fmt::Debug, V>(
        node: &Node<K, V>,
        degree: usize,
        is_root: bool,
        lower: Option<&K>,
        upper: Option<&K>,
        depth: usize,
        expected_leaf_depth: usize,
    ) {
        let min_items = if is_root { 0 } else { degree - 1 };
        assert!(
            node.items.len() >= min_items && node.items.len() <= 2 * degree - 1,
            "node item count {} out of bounds [{}, {}]",
            node.items.len(),
            min_items,
            2 * degree - 1
        );
        if !node.is_leaf() {
            assert_eq!(node.children.len(), node.items.len() + 1);
        } else {
            assert_eq!(depth, expected_leaf_depth, "leaves are not at equal depth");
        }

        for pair in node.items.windows(2) {
            assert!(pair[0].key < pair[1].key, "items not strictly sorted");
        }
        if let Some(lower) = lower {
            assert!(node.items.first().map_or(true, |it| &it.key > lower));
        }
        if let Some(upper) = upper {
            assert!(node.items.last().map_or(true, |it| &it.key < upper));
        }

        for (i, child) in node.children.iter().enumerate() {
            let child_lower = if i == 0 { lower } else { Some(&node.items[i - 1].key) };
            let child_upper = if i == node.items.len() {
                upper
            } else {
                Some(&node.items[i].key)
            };
            check_node(child, degree, false, child_lower, child_upper, depth + 1, expected_leaf_depth);
        }
    }
}
