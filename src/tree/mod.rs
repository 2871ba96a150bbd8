//! Red-black tree algorithm layer
//!
//! Free functions operating on a [`NodeArena`](crate::node::NodeArena) and
//! the root/extreme indices a container keeps in a [`TreeHandle`].
//! Nothing here allocates or drops values: the container creates a node,
//! asks [`find_to_insert`] where it goes, and links it with [`insert_at`];
//! removal goes through [`erase`], after which the container frees the slot.

mod erase;
mod insert;
mod navigate;
mod render;
mod rotate;
mod search;
mod validate;

pub use erase::erase;
pub use insert::insert_at;
pub use navigate::{leftmost, next, prev, rightmost, root};
pub use render::render;
pub use rotate::{rotate, rotate_left, rotate_right};
pub use search::{
    find_to_insert, find_to_insert_hint, lower_bound, upper_bound, Comparator, FindResult,
    InsertPos, NaturalOrder,
};
pub use validate::{check, InvariantViolation, TreeStats};

use crate::node::NodeId;

/// Root and cached extremes of one tree
///
/// `leftmost`/`rightmost` are auxiliary indices, not ownership. [`insert_at`]
/// keeps them current; callers of [`erase`] move them off the victim first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeHandle {
    /// Root node, `None` for an empty tree
    pub root: Option<NodeId>,
    /// Minimum node
    pub leftmost: Option<NodeId>,
    /// Maximum node
    pub rightmost: Option<NodeId>,
}

impl TreeHandle {
    /// Handle of an empty tree
    pub const fn empty() -> Self {
        Self {
            root: None,
            leftmost: None,
            rightmost: None,
        }
    }

    /// True when the tree has no nodes
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_handle() {
        let handle = TreeHandle::empty();
        assert!(handle.is_empty());
        assert_eq!(handle, TreeHandle::default());
    }
}
