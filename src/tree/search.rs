//! Descent searches that locate attachment points
//!
//! These are read-only: a panicking comparator unwinds before any link is
//! touched.

use tracing::trace;

use super::navigate::{next, prev};
use super::TreeHandle;
use crate::node::{NodeArena, NodeId, Side};

/// Strict weak order over `T`
pub trait Comparator<T: ?Sized> {
    /// True when `a` orders strictly before `b`
    fn less(&self, a: &T, b: &T) -> bool;
}

impl<T: ?Sized, F> Comparator<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

/// `Ord`-based comparator
#[derive(Debug, Default, Clone, Copy)]
pub struct NaturalOrder;

impl<T: Ord + ?Sized> Comparator<T> for NaturalOrder {
    #[inline]
    fn less(&self, a: &T, b: &T) -> bool {
        a < b
    }
}

/// Where a new node would be linked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPos {
    /// Tree is empty; the node becomes the root
    Root,
    /// Attach under `parent` in its currently empty `side` slot
    Child {
        /// Node that gains the child
        parent: NodeId,
        /// Vacant slot of `parent`
        side: Side,
    },
}

/// Outcome of [`find_to_insert`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindResult {
    /// The key may be inserted at this position
    Vacant(InsertPos),
    /// Unique mode only: an equal key already lives at this node
    Occupied(NodeId),
}

/// Attachment point placing `key` before every element not less than it
pub fn lower_bound<T, C>(arena: &NodeArena<T>, root: Option<NodeId>, key: &T, comp: &C) -> InsertPos
where
    C: Comparator<T> + ?Sized,
{
    descend(arena, root, |value| !comp.less(value, key))
}

/// Attachment point placing `key` after every element equal to it
pub fn upper_bound<T, C>(arena: &NodeArena<T>, root: Option<NodeId>, key: &T, comp: &C) -> InsertPos
where
    C: Comparator<T> + ?Sized,
{
    descend(arena, root, |value| comp.less(key, value))
}

/// Walk down, going left whenever `go_left(node.value)` holds, until the
/// chosen child slot is empty
fn descend<T, F>(arena: &NodeArena<T>, root: Option<NodeId>, mut go_left: F) -> InsertPos
where
    F: FnMut(&T) -> bool,
{
    let Some(mut node) = root else {
        return InsertPos::Root;
    };
    loop {
        let side = if go_left(&arena[node].value) {
            Side::Left
        } else {
            Side::Right
        };
        match arena.child(node, side) {
            Some(child) => node = child,
            None => return InsertPos::Child { parent: node, side },
        }
    }
}

/// Locate where `value` goes
///
/// In multi mode equal keys are placed after existing ones (stable order
/// among equals). In unique mode an equal key yields
/// [`FindResult::Occupied`].
pub fn find_to_insert<T, C>(
    arena: &NodeArena<T>,
    root: Option<NodeId>,
    value: &T,
    comp: &C,
    multi: bool,
) -> FindResult
where
    C: Comparator<T> + ?Sized,
{
    if multi {
        return FindResult::Vacant(upper_bound(arena, root, value, comp));
    }

    let Some(mut node) = root else {
        return FindResult::Vacant(InsertPos::Root);
    };
    loop {
        let current = &arena[node].value;
        let side = if comp.less(value, current) {
            Side::Left
        } else if comp.less(current, value) {
            Side::Right
        } else {
            return FindResult::Occupied(node);
        };
        match arena.child(node, side) {
            Some(child) => node = child,
            None => return FindResult::Vacant(InsertPos::Child { parent: node, side }),
        }
    }
}

/// [`find_to_insert`] with a position hint
///
/// `hint` is a live node of this tree or `None` for end. The hint only
/// decides whether the full descent can be skipped; the answer is always the
/// one [`find_to_insert`] gives. The gap just before `hint` is tried first,
/// then the gap just after it.
pub fn find_to_insert_hint<T, C>(
    arena: &NodeArena<T>,
    tree: &TreeHandle,
    value: &T,
    comp: &C,
    multi: bool,
    hint: Option<NodeId>,
) -> FindResult
where
    C: Comparator<T> + ?Sized,
{
    if tree.root.is_none() {
        return FindResult::Vacant(InsertPos::Root);
    }

    let candidates = match hint {
        None => [Some((tree.rightmost, None)), None],
        Some(h) => {
            debug_assert!(arena.contains(h), "hint {} is not a live node", h);
            if !multi && is_equal(comp, value, &arena[h].value) {
                trace!(hint = %h, "hint names the equal key");
                return FindResult::Occupied(h);
            }
            [
                Some((prev(arena, h), Some(h))),
                Some((Some(h), next(arena, h))),
            ]
        }
    };

    for (before, after) in candidates.into_iter().flatten() {
        if fits_gap(arena, value, comp, multi, before, after) {
            trace!(hint = ?hint, "hint accepted");
            return FindResult::Vacant(gap_slot(arena, before, after));
        }
    }

    trace!(hint = ?hint, "hint rejected, full descent");
    find_to_insert(arena, tree.root, value, comp, multi)
}

#[inline]
fn is_equal<T, C>(comp: &C, a: &T, b: &T) -> bool
where
    C: Comparator<T> + ?Sized,
{
    !comp.less(a, b) && !comp.less(b, a)
}

/// Does `value` belong in the gap between the adjacent nodes `before` and
/// `after`?
///
/// Unique mode needs `before < value < after`. Multi mode needs
/// `before <= value < after`, which is the gap an upper-bound descent
/// reaches.
fn fits_gap<T, C>(
    arena: &NodeArena<T>,
    value: &T,
    comp: &C,
    multi: bool,
    before: Option<NodeId>,
    after: Option<NodeId>,
) -> bool
where
    C: Comparator<T> + ?Sized,
{
    let after_ok = after.map_or(true, |a| comp.less(value, &arena[a].value));
    if !after_ok {
        return false;
    }
    before.map_or(true, |b| {
        let b = &arena[b].value;
        if multi {
            !comp.less(value, b)
        } else {
            comp.less(b, value)
        }
    })
}

/// The single empty child slot between two in-order neighbours
///
/// If `before` has a right subtree, `after` is its leftmost node and so has
/// no left child; otherwise `before.right` is the slot.
fn gap_slot<T>(arena: &NodeArena<T>, before: Option<NodeId>, after: Option<NodeId>) -> InsertPos {
    if let Some(b) = before {
        if arena[b].right.is_none() {
            return InsertPos::Child {
                parent: b,
                side: Side::Right,
            };
        }
    }
    match after {
        Some(a) => {
            debug_assert!(arena[a].left.is_none(), "gap slot under {} is taken", a);
            InsertPos::Child {
                parent: a,
                side: Side::Left,
            }
        }
        None => {
            debug_assert!(before.is_none(), "maximum has a right child");
            InsertPos::Root
        }
    }
}
