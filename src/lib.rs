//! # Red-black tree engine
//!
//! An index-based red-black tree core that ordered containers (sets,
//! multisets, maps) can be built on. Nodes live in a [`NodeArena`] and link to
//! each other through [`NodeId`]s; the engine functions in [`tree`] only
//! touch links and colors and never allocate.
//!
//! ## Layers
//!
//! 1. **Nodes**: [`node`] holds the arena, colors and link helpers
//! 2. **Engine**: [`tree`] provides navigation, searches, rotations,
//!    insertion rebalancing, erase with double-black repair, and an
//!    invariant checker
//! 3. **Container**: [`OrderedTree`] drives the engine as an ordered set or
//!    multiset
//!
//! ## Usage Example
//!
//! ```
//! use rbtree_engine::{OrderedTree, TreeConfig};
//!
//! let mut tree = OrderedTree::with_config(TreeConfig::multi())?;
//! for key in [5, 3, 8, 3] {
//!     tree.insert(key);
//! }
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![3, 3, 5, 8]);
//! tree.validate()?;
//! # Ok::<(), rbtree_engine::TreeError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod node;      // Arena storage, ids, colors
pub mod tree;      // Engine primitives over a TreeHandle
pub mod container; // Ordered set / multiset

pub use container::{Iter, OrderedTree};
pub use node::{Color, Node, NodeArena, NodeId, Side};
pub use tree::{Comparator, FindResult, InsertPos, InvariantViolation, NaturalOrder, TreeHandle, TreeStats};

use thiserror::Error;

/// How equal keys are treated on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Duplicates {
    /// Set semantics: an equal key is reported instead of inserted
    #[default]
    Reject,
    /// Multiset semantics: equal keys are kept in insertion order
    Allow,
}

impl Duplicates {
    /// True for multiset behaviour
    pub fn allowed(self) -> bool {
        self == Duplicates::Allow
    }
}

/// Settings for an [`OrderedTree`]
#[derive(Debug, Clone, Default)]
pub struct TreeConfig {
    /// Equal-key policy
    pub duplicates: Duplicates,

    /// Node slots reserved up front
    pub capacity: usize,

    /// Run the full invariant check after every mutation.
    ///
    /// A failure is logged and then panics. Costs O(n) per operation.
    pub verify: bool,
}

impl TreeConfig {
    /// Set semantics
    pub fn unique() -> Self {
        Self::default()
    }

    /// Multiset semantics
    pub fn multi() -> Self {
        Self {
            duplicates: Duplicates::Allow,
            ..Self::default()
        }
    }

    /// Reserve room for `capacity` nodes
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Toggle post-mutation verification
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Reject settings the arena cannot honour
    pub fn validate(&self) -> Result<(), TreeError> {
        if self.capacity > NodeId::MAX_SLOTS {
            return Err(TreeError::InvalidConfig(format!(
                "capacity {} exceeds the {} addressable nodes",
                self.capacity,
                NodeId::MAX_SLOTS
            )));
        }
        Ok(())
    }
}

/// Errors reported by the container layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The id does not name a live node
    #[error("node {0} is not live")]
    StaleNode(NodeId),

    /// Rejected configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A structural invariant does not hold
    #[error("Invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builders() {
        let config = TreeConfig::multi().with_capacity(16).with_verify(true);
        assert!(config.duplicates.allowed());
        assert_eq!(config.capacity, 16);
        assert!(config.verify);
        assert!(!TreeConfig::unique().duplicates.allowed());
    }

    #[test]
    fn test_capacity_limit() {
        assert!(TreeConfig::unique().with_capacity(NodeId::MAX_SLOTS).validate().is_ok());
        assert!(TreeConfig::unique().with_capacity(NodeId::MAX_SLOTS + 1).validate().is_err());
    }

    #[test]
    fn test_error_display() {
        let err = TreeError::from(InvariantViolation::RedRoot(NodeId::new(2, 0)));
        assert_eq!(err.to_string(), "Invariant violated: root #2 is red");
    }
}
