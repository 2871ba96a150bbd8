//! Structural invariant checks
//!
//! Used by tests, by the `stress` command and, when enabled in
//! [`TreeConfig`](crate::TreeConfig), after every container mutation.

use thiserror::Error;

use super::navigate::{leftmost, rightmost};
use super::search::Comparator;
use super::TreeHandle;
use crate::node::{Color, NodeArena, NodeId, Side};

/// A broken tree invariant, naming the node where it was detected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// The root is Red
    #[error("root {0} is red")]
    RedRoot(NodeId),

    /// The root has a parent link
    #[error("root {0} has a parent")]
    RootHasParent(NodeId),

    /// A Red node has a Red child
    #[error("red node {parent} has red child {child}")]
    RedRedEdge {
        /// Red parent
        parent: NodeId,
        /// Red child
        child: NodeId,
    },

    /// The two subtrees of a node have different black-heights
    #[error("black-height mismatch at {node}: left {left}, right {right}")]
    BlackHeightMismatch {
        /// Node whose subtrees disagree
        node: NodeId,
        /// Black-height of the left subtree
        left: usize,
        /// Black-height of the right subtree
        right: usize,
    },

    /// A child does not point back at its parent
    #[error("child {child} of {parent} has a stale parent link")]
    BrokenParentLink {
        /// Parent holding the link
        parent: NodeId,
        /// Child with the wrong back-reference
        child: NodeId,
    },

    /// In-order traversal is not sorted
    #[error("node {node} is out of order on its {side:?} side")]
    OutOfOrder {
        /// Offending node
        node: NodeId,
        /// Which side of its ancestor it breaks the bound on
        side: Side,
    },

    /// The cached minimum is wrong
    #[error("cached leftmost {cached:?} differs from actual {actual:?}")]
    StaleLeftmost {
        /// Value held by the handle
        cached: Option<NodeId>,
        /// True minimum
        actual: Option<NodeId>,
    },

    /// The cached maximum is wrong
    #[error("cached rightmost {cached:?} differs from actual {actual:?}")]
    StaleRightmost {
        /// Value held by the handle
        cached: Option<NodeId>,
        /// True maximum
        actual: Option<NodeId>,
    },

    /// A link names a node that is not live in the arena
    #[error("link to vacant node {0}")]
    DanglingLink(NodeId),
}

/// Shape summary of a valid tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct TreeStats {
    /// Number of nodes
    pub len: usize,
    /// Black nodes on every root-to-nil path, excluding nil
    pub black_height: usize,
    /// Longest root-to-leaf path in nodes
    pub height: usize,
}

/// Verify every red-black invariant of `tree`
pub fn check<T, C>(arena: &NodeArena<T>, tree: &TreeHandle, comp: &C) -> Result<TreeStats, InvariantViolation>
where
    C: Comparator<T> + ?Sized,
{
    let Some(root) = tree.root else {
        if tree.leftmost.is_some() {
            return Err(InvariantViolation::StaleLeftmost {
                cached: tree.leftmost,
                actual: None,
            });
        }
        if tree.rightmost.is_some() {
            return Err(InvariantViolation::StaleRightmost {
                cached: tree.rightmost,
                actual: None,
            });
        }
        return Ok(TreeStats::default());
    };

    live(arena, root)?;
    if arena[root].parent.is_some() {
        return Err(InvariantViolation::RootHasParent(root));
    }
    if arena[root].color == Color::Red {
        return Err(InvariantViolation::RedRoot(root));
    }

    let (min, max) = (leftmost(arena, root), rightmost(arena, root));
    if tree.leftmost != Some(min) {
        return Err(InvariantViolation::StaleLeftmost {
            cached: tree.leftmost,
            actual: Some(min),
        });
    }
    if tree.rightmost != Some(max) {
        return Err(InvariantViolation::StaleRightmost {
            cached: tree.rightmost,
            actual: Some(max),
        });
    }

    let shape = walk(arena, root, comp, Bounds::default())?;
    Ok(TreeStats {
        len: shape.len,
        black_height: shape.black_height,
        height: shape.height,
    })
}

/// Ordering bounds inherited from ancestors
///
/// `low` is the nearest ancestor we descended right from, `high` the nearest
/// one we descended left from. Equal keys may sit on either side.
#[derive(Clone, Copy, Default)]
struct Bounds {
    low: Option<NodeId>,
    high: Option<NodeId>,
}

struct Shape {
    len: usize,
    black_height: usize,
    height: usize,
}

fn live<T>(arena: &NodeArena<T>, id: NodeId) -> Result<(), InvariantViolation> {
    if arena.contains(id) {
        Ok(())
    } else {
        Err(InvariantViolation::DanglingLink(id))
    }
}

fn walk<T, C>(arena: &NodeArena<T>, node: NodeId, comp: &C, bounds: Bounds) -> Result<Shape, InvariantViolation>
where
    C: Comparator<T> + ?Sized,
{
    let value = &arena[node].value;
    if let Some(low) = bounds.low {
        if comp.less(value, &arena[low].value) {
            return Err(InvariantViolation::OutOfOrder {
                node,
                side: Side::Right,
            });
        }
    }
    if let Some(high) = bounds.high {
        if comp.less(&arena[high].value, value) {
            return Err(InvariantViolation::OutOfOrder {
                node,
                side: Side::Left,
            });
        }
    }

    let mut sub = [None, None];
    for (slot, side) in [Side::Left, Side::Right].into_iter().enumerate() {
        let Some(child) = arena.child(node, side) else {
            continue;
        };
        live(arena, child)?;
        if arena[child].parent != Some(node) {
            return Err(InvariantViolation::BrokenParentLink { parent: node, child });
        }
        if arena[node].color == Color::Red && arena[child].color == Color::Red {
            return Err(InvariantViolation::RedRedEdge { parent: node, child });
        }
        let child_bounds = match side {
            Side::Left => Bounds {
                high: Some(node),
                ..bounds
            },
            Side::Right => Bounds {
                low: Some(node),
                ..bounds
            },
        };
        sub[slot] = Some(walk(arena, child, comp, child_bounds)?);
    }

    let black_of = |shape: &Option<Shape>| shape.as_ref().map_or(0, |s| s.black_height);
    let (left_bh, right_bh) = (black_of(&sub[0]), black_of(&sub[1]));
    if left_bh != right_bh {
        return Err(InvariantViolation::BlackHeightMismatch {
            node,
            left: left_bh,
            right: right_bh,
        });
    }

    let len = 1 + sub.iter().flatten().map(|s| s.len).sum::<usize>();
    let height = 1 + sub.iter().flatten().map(|s| s.height).max().unwrap_or(0);
    let own = usize::from(arena[node].color == Color::Black);
    Ok(Shape {
        len,
        black_height: left_bh + own,
        height,
    })
}
