//! Node pooling.
//!
//! Mirrors the teacher crate's `allocator` module — there it holds
//! on-disk segment allocators (`worst_fit_list`); here it holds the
//! in-memory node recycling pool described by the free-list component.

mod free_list;

pub use free_list::{FreeList, DEFAULT_CAPACITY};
