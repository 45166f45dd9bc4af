//! Optional, `figment`-backed configuration loading.
//!
//! Mirrors the teacher's `figment_config` Cargo feature: a host that would
//! rather externalize tuning parameters than hard-code them at `Tree::new`
//! call sites can load a [`TreeConfig`] from the environment (and merge in a
//! defaults layer) instead. This is pure sugar over `Tree::with_free_list`;
//! nothing in the tree core depends on it.

use serde::{Deserialize, Serialize};

use crate::allocator::DEFAULT_CAPACITY;
use crate::error::Error;

/// Tunable parameters for constructing a [`crate::Tree`].
///
/// Loaded via [`TreeConfig::load`], which merges environment variables
/// prefixed `COW_BTREE_` (e.g. `COW_BTREE_DEGREE=64`) over the defaults
/// below, following the teacher's `Env`-sourced `figment` layering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Structural degree passed to [`crate::Tree::new`]. Must be `>= 2`.
    pub degree: usize,
    /// Capacity of the private free list backing a tree constructed from
    /// this config via [`TreeConfig::tree`].
    pub free_list_capacity: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            degree: 32,
            free_list_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl TreeConfig {
    /// Loads configuration by merging `COW_BTREE_`-prefixed environment
    /// variables over [`TreeConfig::default`], validating the result.
    pub fn load() -> Result<Self, Error> {
        use figment::{
            providers::{Env, Serialized},
            Figment,
        };

        let config: TreeConfig = Figment::new()
            .merge(Serialized::defaults(TreeConfig::default()))
            .merge(Env::prefixed("COW_BTREE_"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects a degree below the structural minimum.
    pub fn validate(&self) -> Result<(), Error> {
        if self.degree < 2 {
            return Err(Error::DegreeTooSmall(self.degree));
        }
        Ok(())
    }

    /// Builds a fresh, privately-pooled [`crate::Tree`] from this config.
    pub fn tree<K, V>(&self) -> crate::Tree<K, V> {
        crate::Tree::with_free_list(
            self.degree,
            std::sync::Arc::new(crate::allocator::FreeList::new(self.free_list_capacity)),
        )
    }
}
