//! An in-memory, copy-on-write ordered B-tree.
//!
//! [`Tree<K, V>`] is a B-tree keyed by any `K: Ord`, storing an associated
//! `V` per key (use `V = ()` for set-like usage via [`Item::set`]).
//! [`Tree::clone_tree`] is an O(1) logical clone: the clone and the original
//! share structure until one of them mutates it, at which point the
//! mutating side copies only the nodes on the path it touches. See
//! [`tree`] for the B-tree core and [`allocator`] for the node-recycling
//! pool clones may share.
//!
//! This crate is the in-memory B-tree core factored out of the teacher's
//! on-disk B-epsilon-tree storage engine: the splitting, merging, stealing,
//! copy-on-write materialization, and bounded bidirectional iteration are
//! the same shape, retargeted from a disk-backed, message-buffered tree to a
//! plain in-memory one. It does not persist anything to storage, does not
//! implement transactions, and does not make a single `Tree` safe for
//! concurrent mutation from multiple threads (see the crate's concurrency
//! design notes); two independent clones, each used from at most one thread
//! at a time, are safe.

pub mod allocator;
#[cfg(feature = "figment_config")]
pub mod config;
pub mod cow;
pub mod error;
pub mod tree;

pub use error::Error;
pub use tree::{Item, OrderedMap, OrderedMapMut, Tree};

/// Installs `env_logger` as the global logger, using `RUST_LOG` to set
/// verbosity. Convenience for hosts and test/bench binaries that don't
/// already configure their own logger; gated behind the `init_env_logger`
/// feature (on by default), matching the teacher's own feature split.
#[cfg(feature = "init_env_logger")]
pub fn init_env_logger() {
    let _ = env_logger::try_init();
}
