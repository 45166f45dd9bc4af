//! Copy-on-write generation tokens.
//!
//! A [`CowToken`] is the per-tree identity compared by pointer equality to
//! decide whether a node may be mutated in place or must first be
//! materialized (shallow-copied and re-stamped). It is deliberately just an
//! `Arc` around an empty marker: `Arc` is already the "host-provided shared
//! ownership with atomic refcount" primitive, so there is no need to
//! reinvent one.

use std::sync::Arc;

/// Opaque marker type; only its address matters.
#[derive(Debug, Default)]
pub(crate) struct CowMark;

/// A per-tree copy-on-write generation token.
///
/// Two tokens are "the same generation" iff [`CowToken::same`] returns true,
/// i.e. they point at the same [`CowMark`] allocation. Cloning a `CowToken`
/// produces another handle to the *same* generation; minting a new
/// generation requires [`CowToken::new`].
#[derive(Debug, Clone)]
pub struct CowToken(Arc<CowMark>);

impl CowToken {
    /// Mints a fresh, unique generation token.
    pub fn new() -> Self {
        CowToken(Arc::new(CowMark))
    }

    /// Returns true iff `self` and `other` denote the same generation.
    pub fn same(&self, other: &CowToken) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for CowToken {
    fn default() -> Self {
        CowToken::new()
    }
}

impl PartialEq for CowToken {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl Eq for CowToken {}
