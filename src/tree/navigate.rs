//! In-order navigation over parent/child links
//!
//! All functions take a live node; passing a freed id panics.
//! "End" (one past the maximum, or before the minimum) is `None`.

use crate::node::{NodeArena, NodeId, Side};

/// Topmost ancestor of `node`
pub fn root<T>(arena: &NodeArena<T>, mut node: NodeId) -> NodeId {
    while let Some(parent) = arena[node].parent {
        node = parent;
    }
    node
}

/// Minimum of the subtree rooted at `node`
pub fn leftmost<T>(arena: &NodeArena<T>, node: NodeId) -> NodeId {
    extreme(arena, node, Side::Left)
}

/// Maximum of the subtree rooted at `node`
pub fn rightmost<T>(arena: &NodeArena<T>, node: NodeId) -> NodeId {
    extreme(arena, node, Side::Right)
}

/// In-order successor, `None` past the maximum
pub fn next<T>(arena: &NodeArena<T>, node: NodeId) -> Option<NodeId> {
    step(arena, node, Side::Right)
}

/// In-order predecessor, `None` before the minimum
pub fn prev<T>(arena: &NodeArena<T>, node: NodeId) -> Option<NodeId> {
    step(arena, node, Side::Left)
}

fn extreme<T>(arena: &NodeArena<T>, mut node: NodeId, side: Side) -> NodeId {
    while let Some(child) = arena.child(node, side) {
        node = child;
    }
    node
}

/// Shared body of `next` (toward `Right`) and `prev` (toward `Left`)
fn step<T>(arena: &NodeArena<T>, mut node: NodeId, toward: Side) -> Option<NodeId> {
    if let Some(child) = arena.child(node, toward) {
        return Some(extreme(arena, child, toward.opposite()));
    }
    // climb while we are the `toward` child
    while let Some(parent) = arena.parent(node) {
        if arena.side_of(node) != Some(toward) {
            return Some(parent);
        }
        node = parent;
    }
    None
}
