//! Unlinking a node and repairing black-height
//!
//! Follows the classic splice-then-fixup scheme: a node with two children is
//! replaced by its in-order successor, so the node physically removed from
//! its slot (`y`) always has at most one child (`x`). Removing a Black `y`
//! leaves a "double-black" deficiency at `x`'s position that [`DoubleBlack`]
//! pushes up or absorbs.

use tracing::trace;

use super::navigate::leftmost;
use super::rotate::rotate;
use crate::node::{Color, NodeArena, NodeId, Side};

/// Unlink `z` from the tree rooted at `root`
///
/// On return `z` has no links and may be freed. The cached
/// `leftmost`/`rightmost` of the container are not touched; move them off
/// `z` before calling.
pub fn erase<T>(arena: &mut NodeArena<T>, root: &mut Option<NodeId>, z: NodeId) {
    let y = match (arena[z].left, arena[z].right) {
        (Some(_), Some(right)) => leftmost(arena, right),
        _ => z,
    };
    let x = arena[y].left.or(arena[y].right);
    let removed = arena[y].color;

    // splice y out: x takes y's slot
    let mut x_parent = arena.parent(y);
    match (x_parent, arena.side_of(y)) {
        (Some(yp), Some(side)) => arena.link(yp, side, x),
        _ => {
            *root = x;
            if let Some(x) = x {
                arena[x].parent = None;
            }
        }
    }

    if y != z {
        // y takes over z's place, children and color
        match (arena.parent(z), arena.side_of(z)) {
            (Some(zp), Some(side)) => arena.link(zp, side, Some(y)),
            _ => {
                *root = Some(y);
                arena[y].parent = None;
            }
        }
        let (z_left, z_right) = (arena[z].left, arena[z].right);
        arena.link(y, Side::Left, z_left);
        arena.link(y, Side::Right, z_right);
        arena[y].color = arena[z].color;
        if x_parent == Some(z) {
            x_parent = Some(y);
        }
    }

    arena[z].unlink();

    if removed == Color::Black && root.is_some() {
        repair(arena, root, x, x_parent);
    }
}

/// State of the double-black walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DoubleBlack {
    /// Deficiency sits at `node` (possibly an empty slot) below `parent`
    At {
        node: Option<NodeId>,
        parent: NodeId,
    },
    /// Deficiency absorbed by recoloring a Red node or reaching the root
    Absorbed,
}

fn repair<T>(arena: &mut NodeArena<T>, root: &mut Option<NodeId>, x: Option<NodeId>, x_parent: Option<NodeId>) {
    if let Some(red) = x.filter(|&x| arena[x].color == Color::Red) {
        trace!(node = %red, "red replacement absorbs the deficiency");
        arena.set_color(red, Color::Black);
        return;
    }
    // at the root every path lost the same Black
    let Some(parent) = x_parent else {
        return;
    };

    let mut state = DoubleBlack::At { node: x, parent };
    while let DoubleBlack::At { node, parent } = state {
        state = step(arena, root, node, parent);
    }
}

/// One round of the double-black fixup
///
/// `node` is Black or absent. Its sibling exists: the other side of `parent`
/// carries at least one Black node more than `node`'s side.
fn step<T>(arena: &mut NodeArena<T>, root: &mut Option<NodeId>, node: Option<NodeId>, parent: NodeId) -> DoubleBlack {
    let side = match node {
        Some(n) if arena.is_left_child(n) => Side::Left,
        Some(_) => Side::Right,
        // an empty slot: the sibling fills the other one
        None if arena[parent].left.is_none() => Side::Left,
        None => Side::Right,
    };
    let far = side.opposite();
    let mut w = sibling_under(arena, parent, far);

    if arena[w].color == Color::Red {
        trace!(parent = %parent, "red sibling: rotate toward the deficiency");
        arena.set_color(w, Color::Black);
        arena.set_color(parent, Color::Red);
        rotate(arena, root, parent, side);
        w = sibling_under(arena, parent, far);
    }

    let near_child = arena.child(w, side);
    let far_child = arena.child(w, far);

    if !arena.is_red(near_child) && !arena.is_red(far_child) {
        arena.set_color(w, Color::Red);
        match arena[parent].parent {
            Some(grandparent) if arena[parent].color == Color::Black => {
                trace!(parent = %parent, "black nephews: push deficiency up");
                return DoubleBlack::At {
                    node: Some(parent),
                    parent: grandparent,
                };
            }
            _ => {
                trace!(parent = %parent, "black nephews: absorbed at parent");
                arena.set_color(parent, Color::Black);
                return DoubleBlack::Absorbed;
            }
        }
    }

    if !arena.is_red(far_child) {
        // only the near nephew is Red: turn it into the far case
        trace!(sibling = %w, "near red nephew: rotate at sibling");
        if let Some(near) = near_child {
            arena.set_color(near, Color::Black);
        }
        arena.set_color(w, Color::Red);
        rotate(arena, root, w, far);
        w = sibling_under(arena, parent, far);
    }

    trace!(parent = %parent, "far red nephew: rotate at parent");
    let parent_color = arena[parent].color;
    arena.set_color(w, parent_color);
    arena.set_color(parent, Color::Black);
    if let Some(far_nephew) = arena.child(w, far) {
        arena.set_color(far_nephew, Color::Black);
    }
    rotate(arena, root, parent, side);
    DoubleBlack::Absorbed
}

#[inline]
fn sibling_under<T>(arena: &NodeArena<T>, parent: NodeId, far: Side) -> NodeId {
    arena
        .child(parent, far)
        .unwrap_or_else(|| panic!("double-black below {} without a sibling", parent))
}
