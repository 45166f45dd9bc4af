//! Shared helpers for the scenario and property tests.

use cow_btree::{Item, Tree};
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// A deterministic, seedable shuffle of `0..n`.
pub fn shuffled(n: i64, seed: u64) -> Vec<i64> {
    let mut keys: Vec<i64> = (0..n).collect();
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    keys.shuffle(&mut rng);
    keys
}

/// Collects every key in ascending order via the visitor entry point.
pub fn ascend_keys(t: &Tree<i64, ()>) -> Vec<i64> {
    let mut out = Vec::new();
    t.ascend(|it| {
        out.push(it.key);
        true
    });
    out
}

/// Collects every key in descending order via the visitor entry point.
pub fn descend_keys(t: &Tree<i64, ()>) -> Vec<i64> {
    let mut out = Vec::new();
    t.descend(|it| {
        out.push(it.key);
        true
    });
    out
}

/// Builds a set-like tree of the given degree from `keys`, checking shape
/// invariants after every single insertion (not just at the end) so a
/// regression is pinpointed to the offending insert.
pub fn build(degree: usize, keys: &[i64]) -> Tree<i64, ()> {
    let mut t = Tree::new(degree);
    for &k in keys {
        t.replace_or_insert(Item::set(k));
        t.check_invariants();
    }
    t
}
