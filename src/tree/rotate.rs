//! Single rotations

use crate::node::{NodeArena, NodeId, Side};

/// Rotate `p` down toward `dir`
///
/// The child on the opposite side takes `p`'s place and `p` becomes its
/// `dir` child; in-order sequence is unchanged. `root` is updated when `p`
/// was the root. Panics if `p` has no child on the lifting side.
pub fn rotate<T>(arena: &mut NodeArena<T>, root: &mut Option<NodeId>, p: NodeId, dir: Side) {
    let lift = dir.opposite();
    let c = arena
        .child(p, lift)
        .unwrap_or_else(|| panic!("rotation at {} needs a {:?} child", p, lift));

    // c's inner subtree moves across to p
    let inner = arena.child(c, dir);
    arena.link(p, lift, inner);

    match (arena.parent(p), arena.side_of(p)) {
        (Some(g), Some(side)) => arena.link(g, side, Some(c)),
        _ => {
            arena[c].parent = None;
            *root = Some(c);
        }
    }

    arena.link(c, dir, Some(p));
}

/// Rotate `p` down to the left; requires a right child
pub fn rotate_left<T>(arena: &mut NodeArena<T>, root: &mut Option<NodeId>, p: NodeId) {
    rotate(arena, root, p, Side::Left);
}

/// Rotate `p` down to the right; requires a left child
pub fn rotate_right<T>(arena: &mut NodeArena<T>, root: &mut Option<NodeId>, p: NodeId) {
    rotate(arena, root, p, Side::Right);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `p` at the root with children `a` and `c`; `c` has children `b`, `d`
    ///
    /// ```text
    ///    p             c
    ///   / \           / \
    ///  a   c   =>    p   d
    ///     / \       / \
    ///    b   d     a   b
    /// ```
    #[test]
    fn test_rotate_left_at_root() {
        let mut arena = NodeArena::new();
        let [a, p, b, c, d] = [1, 2, 3, 4, 5].map(|v| arena.alloc(v));
        arena.link(p, Side::Left, Some(a));
        arena.link(p, Side::Right, Some(c));
        arena.link(c, Side::Left, Some(b));
        arena.link(c, Side::Right, Some(d));
        let mut root = Some(p);

        rotate_left(&mut arena, &mut root, p);

        assert_eq!(root, Some(c));
        assert_eq!(arena[c].parent, None);
        assert_eq!(arena[c].left, Some(p));
        assert_eq!(arena[c].right, Some(d));
        assert_eq!(arena[p].parent, Some(c));
        assert_eq!(arena[p].left, Some(a));
        assert_eq!(arena[p].right, Some(b));
        assert_eq!(arena[b].parent, Some(p));
    }

    #[test]
    fn test_rotate_right_below_root() {
        // g -> right: p -> left: c
        let mut arena = NodeArena::new();
        let [g, c, p] = [1, 2, 3].map(|v| arena.alloc(v));
        arena.link(g, Side::Right, Some(p));
        arena.link(p, Side::Left, Some(c));
        let mut root = Some(g);

        rotate_right(&mut arena, &mut root, p);

        assert_eq!(root, Some(g), "root untouched below the top");
        assert_eq!(arena[g].right, Some(c));
        assert_eq!(arena[c].parent, Some(g));
        assert_eq!(arena[c].right, Some(p));
        assert_eq!(arena[p].left, None);
    }

    #[test]
    #[should_panic(expected = "needs a")]
    fn test_rotate_without_child_panics() {
        let mut arena = NodeArena::new();
        let p = arena.alloc(0);
        let mut root = Some(p);
        rotate_left(&mut arena, &mut root, p);
    }
}
