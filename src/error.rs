//! The crate's error surface.
//!
//! Grounded on the teacher's `thiserror`-based error enums (e.g.
//! `NVMLeafError` in the sibling `haura` fork's `tree/imp/nvmleaf.rs`) and the
//! teacher's own split between infrastructure errors (`Result`) and data-miss
//! lookups (plain `Option`, see `src/tree/layer.rs`'s `range` contract versus
//! `get`). The tree's steady-state operations stay `Option`-returning per the
//! crate's error handling design; this enum only covers the handful of
//! genuinely fallible, caller-visible conditions outside that hot path.

use thiserror::Error;

/// Errors surfaced by the crate's boundary-crossing operations.
///
/// The B-tree core itself never returns this type: lookups, deletes, and
/// min/max all use `Option` (see the crate's error handling design notes).
/// `Error` exists for the configuration loader, which genuinely crosses an
/// I/O/parsing boundary.
#[derive(Error, Debug)]
pub enum Error {
    /// A `degree` below the structural minimum of 2 was supplied.
    #[error("tree degree must be at least 2, got {0}")]
    DegreeTooSmall(usize),

    /// Loading a [`crate::config::TreeConfig`] failed.
    #[cfg(feature = "figment_config")]
    #[error("failed to load tree configuration: {0}")]
    Config(#[from] figment::Error),
}
