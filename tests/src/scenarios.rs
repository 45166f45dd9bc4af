//! End-to-end scenario tests (S1-S6).

use super::util::{ascend_keys, build, descend_keys, shuffled};
use cow_btree::{Item, Tree};
use std::sync::Arc;

#[test]
fn s1_basic_scripted_sequence() {
    let mut t: Tree<i64, ()> = Tree::new(32);
    for k in 0..10 {
        t.replace_or_insert(Item::set(k));
    }
    assert_eq!(t.len(), 10);
    assert_eq!(t.get(&3).map(|it| it.key), Some(3));
    assert_eq!(t.get(&100), None);
    assert_eq!(t.delete(&4).map(|it| it.key), Some(4));
    assert_eq!(t.delete(&100), None);
    assert_eq!(t.replace_or_insert(Item::set(5)).map(|it| it.key), Some(5));
    assert_eq!(t.replace_or_insert(Item::set(100)), None);
    assert_eq!(t.min().map(|it| it.key), Some(0));
    assert_eq!(t.delete_min().map(|it| it.key), Some(0));
    assert_eq!(t.max().map(|it| it.key), Some(100));
    assert_eq!(t.delete_max().map(|it| it.key), Some(100));
    assert_eq!(t.len(), 8);
}

#[test]
fn s2_delete_min_drains_in_sorted_order() {
    let keys = shuffled(100, 1);
    let mut t = build(3, &keys);
    let mut drained = Vec::new();
    while let Some(item) = t.delete_min() {
        drained.push(item.key);
        t.check_invariants();
    }
    assert_eq!(drained, (0..100).collect::<Vec<_>>());
    assert_eq!(t.len(), 0);
}

#[test]
fn s3_ascend_range_matches_slice_and_short_circuits() {
    let keys = shuffled(100, 2);
    let t = build(2, &keys);

    let mut collected = Vec::new();
    t.ascend_range(&40, &60, |it| {
        collected.push(it.key);
        true
    });
    assert_eq!(collected, (40..60).collect::<Vec<_>>());

    let mut stopped = Vec::new();
    t.ascend_range(&40, &60, |it| {
        stopped.push(it.key);
        it.key <= 50
    });
    assert_eq!(stopped, (40..=50).collect::<Vec<_>>());
}

#[test]
fn s4_descend_range_matches_slice_and_short_circuits() {
    let keys = shuffled(100, 3);
    let t = build(32, &keys);

    let mut collected = Vec::new();
    t.descend_range(&60, &40, |it| {
        collected.push(it.key);
        true
    });
    assert_eq!(collected, (41..=60).rev().collect::<Vec<_>>());

    let mut stopped = Vec::new();
    t.descend_range(&60, &40, |it| {
        stopped.push(it.key);
        it.key >= 50
    });
    assert_eq!(stopped, (50..=60).rev().collect::<Vec<_>>());
}

#[test]
fn s5_clone_stress_across_threads() {
    let base_keys = shuffled(10_000, 4);
    let mut t = build(16, &base_keys);

    let mut handles = Vec::new();
    for seed in 0..4u64 {
        let mut clone = t.clone_tree();
        let extra = shuffled(2_000, 100 + seed);
        handles.push(std::thread::spawn(move || {
            for k in extra {
                clone.replace_or_insert(Item::set(10_000 + k));
            }
            clone.check_invariants();
            let keys = ascend_keys(&clone);
            let mut expected: Vec<i64> = (0..10_000).chain(10_000..12_000).collect();
            expected.sort_unstable();
            expected.dedup();
            assert_eq!(keys.len(), expected.len());
            assert!(keys.windows(2).all(|w| w[0] < w[1]));
            clone
        }));
    }

    for h in handles {
        h.join().expect("clone thread panicked");
    }

    t.check_invariants();
    assert_eq!(ascend_keys(&t), (0..10_000).collect::<Vec<_>>());
}

#[test]
fn s6_free_list_reuse_bounded_by_capacity() {
    let fl = Arc::new(cow_btree::allocator::FreeList::new(32));
    let mut t: Tree<i64, ()> = Tree::with_free_list(32, Arc::clone(&fl));
    for k in 0..500 {
        t.replace_or_insert(Item::set(k));
    }
    t.clear(true);
    assert_eq!(t.len(), 0);
    assert!(fl.len() <= fl.capacity());

    for k in 0..500 {
        t.replace_or_insert(Item::set(k));
    }
    t.check_invariants();
    assert_eq!(ascend_keys(&t), (0..500).collect::<Vec<_>>());
}

#[test]
fn descend_is_reverse_of_ascend() {
    let keys = shuffled(200, 5);
    let t = build(4, &keys);
    let mut down = descend_keys(&t);
    down.reverse();
    assert_eq!(ascend_keys(&t), down);
}

#[test]
fn clone_then_mutate_both_sides_independently() {
    let keys = shuffled(500, 6);
    let mut t = build(5, &keys);
    let mut clone = t.clone_tree();

    for k in 0..100 {
        clone.delete(&k);
    }
    for k in 500..600 {
        t.replace_or_insert(Item::set(k));
    }

    t.check_invariants();
    clone.check_invariants();

    for k in 0..100 {
        assert!(t.has(&k));
        assert!(!clone.has(&k));
    }
    for k in 500..600 {
        assert!(t.has(&k));
        assert!(!clone.has(&k));
    }
}

#[test]
fn string_keys_sort_lexicographically() {
    let mut t: Tree<String, ()> = Tree::new(3);
    let words = ["pear", "apple", "plum", "grape", "fig", "banana", "kiwi"];
    for w in words {
        t.replace_or_insert(Item::set(w.to_string()));
    }
    t.check_invariants();

    let mut expected: Vec<String> = words.iter().map(|s| s.to_string()).collect();
    expected.sort();

    let mut collected = Vec::new();
    t.ascend(|it| {
        collected.push(it.key.clone());
        true
    });
    assert_eq!(collected, expected);

    assert_eq!(t.min().map(|it| it.key.clone()), Some("apple".to_string()));
    assert_eq!(t.max().map(|it| it.key.clone()), Some("plum".to_string()));
    assert_eq!(t.delete(&"fig".to_string()).map(|it| it.key), Some("fig".to_string()));
    assert_eq!(t.len(), words.len() - 1);
}
