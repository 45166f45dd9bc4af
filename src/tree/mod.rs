//! An in-memory, copy-on-write ordered B-tree.

mod imp;
mod layer;

pub use imp::node::Item;
pub use imp::Tree;
pub use layer::{OrderedMap, OrderedMapMut};
