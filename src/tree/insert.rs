//! Linking a new node and restoring the red-black properties

use tracing::trace;

use super::rotate::rotate;
use super::search::InsertPos;
use super::TreeHandle;
use crate::node::{Color, NodeArena, NodeId, Side};

/// Attach `new` as a Red leaf at `pos` and rebalance
///
/// `pos` must come from a search on the current shape of `tree`. The cached
/// extremes are moved to `new` when it becomes the minimum or maximum.
pub fn insert_at<T>(arena: &mut NodeArena<T>, tree: &mut TreeHandle, pos: InsertPos, new: NodeId) {
    {
        let node = &mut arena[new];
        node.unlink();
        node.color = Color::Red;
    }

    match pos {
        InsertPos::Root => {
            debug_assert!(tree.root.is_none(), "root position on a non-empty tree");
            tree.root = Some(new);
            tree.leftmost = Some(new);
            tree.rightmost = Some(new);
        }
        InsertPos::Child { parent, side } => {
            debug_assert!(
                arena.child(parent, side).is_none(),
                "slot {:?} of {} is occupied",
                side,
                parent
            );
            arena.link(parent, side, Some(new));
            match side {
                Side::Left if tree.leftmost == Some(parent) => tree.leftmost = Some(new),
                Side::Right if tree.rightmost == Some(parent) => tree.rightmost = Some(new),
                _ => {}
            }
        }
    }

    balance(arena, &mut tree.root, new);
}

/// Walk up from the freshly linked Red node `x` fixing Red-Red edges
fn balance<T>(arena: &mut NodeArena<T>, root: &mut Option<NodeId>, mut x: NodeId) {
    loop {
        let Some(parent) = arena[x].parent else {
            arena.set_color(x, Color::Black);
            return;
        };
        if arena[parent].color == Color::Black {
            return;
        }
        let Some(grandparent) = arena[parent].parent else {
            // a Red root only shows up transiently; close it off
            arena.set_color(parent, Color::Black);
            return;
        };

        let parent_side = arena
            .side_of(parent)
            .unwrap_or_else(|| panic!("{} has a parent but no side", parent));
        let uncle = arena.uncle(x);

        if arena.is_red(uncle) {
            trace!(node = %x, "red uncle: recolor and climb");
            arena.set_color(parent, Color::Black);
            if let Some(uncle) = uncle {
                arena.set_color(uncle, Color::Black);
            }
            arena.set_color(grandparent, Color::Red);
            x = grandparent;
            continue;
        }

        // straighten a zig-zag so x, parent, grandparent lie on one line
        let mut top = parent;
        let inner = match parent_side {
            Side::Left => arena.is_right_child(x),
            Side::Right => arena.is_left_child(x),
        };
        if inner {
            trace!(node = %x, "inner child: rotate at parent");
            rotate(arena, root, parent, parent_side);
            top = x;
        }

        trace!(node = %top, "black uncle: rotate at grandparent");
        arena.set_color(top, Color::Black);
        arena.set_color(grandparent, Color::Red);
        rotate(arena, root, grandparent, parent_side.opposite());
        return;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{check, find_to_insert, FindResult, NaturalOrder};

    fn insert_key(arena: &mut NodeArena<i32>, tree: &mut TreeHandle, key: i32) -> NodeId {
        let pos = match find_to_insert(arena, tree.root, &key, &NaturalOrder, true) {
            FindResult::Vacant(pos) => pos,
            FindResult::Occupied(_) => unreachable!("multi mode never reports occupied"),
        };
        let id = arena.alloc(key);
        insert_at(arena, tree, pos, id);
        id
    }

    #[test]
    fn test_first_insert_is_black_root() {
        let mut arena = NodeArena::new();
        let mut tree = TreeHandle::empty();
        let id = insert_key(&mut arena, &mut tree, 1);
        assert_eq!(tree.root, Some(id));
        assert_eq!(tree.leftmost, Some(id));
        assert_eq!(tree.rightmost, Some(id));
        assert_eq!(arena[id].color, Color::Black);
    }

    #[test]
    fn test_ascending_run_rotates_left() {
        let mut arena = NodeArena::new();
        let mut tree = TreeHandle::empty();
        let a = insert_key(&mut arena, &mut tree, 1);
        let b = insert_key(&mut arena, &mut tree, 2);
        let c = insert_key(&mut arena, &mut tree, 3);

        assert_eq!(tree.root, Some(b));
        assert_eq!(arena[b].left, Some(a));
        assert_eq!(arena[b].right, Some(c));
        assert_eq!(arena[b].color, Color::Black);
        assert_eq!(arena[a].color, Color::Red);
        assert_eq!(arena[c].color, Color::Red);
        assert_eq!(tree.leftmost, Some(a));
        assert_eq!(tree.rightmost, Some(c));
    }

    #[test]
    fn test_zig_zag_double_rotation() {
        let mut arena = NodeArena::new();
        let mut tree = TreeHandle::empty();
        let hi = insert_key(&mut arena, &mut tree, 30);
        let lo = insert_key(&mut arena, &mut tree, 10);
        let mid = insert_key(&mut arena, &mut tree, 20);

        assert_eq!(tree.root, Some(mid));
        assert_eq!(arena[mid].left, Some(lo));
        assert_eq!(arena[mid].right, Some(hi));
        assert_eq!(arena[lo].parent, Some(mid));
        assert!(check(&arena, &tree, &NaturalOrder).is_ok());
    }

    #[test]
    fn test_red_uncle_recolors() {
        let mut arena = NodeArena::new();
        let mut tree = TreeHandle::empty();
        for k in [20, 10, 30] {
            insert_key(&mut arena, &mut tree, k);
        }
        let leaf = insert_key(&mut arena, &mut tree, 5);
        let root = tree.root.unwrap();

        assert_eq!(arena[root].color, Color::Black);
        assert_eq!(arena.color_of(arena[root].left), Color::Black);
        assert_eq!(arena.color_of(arena[root].right), Color::Black);
        assert_eq!(arena[leaf].color, Color::Red);
        assert_eq!(arena.side_of(leaf), Some(Side::Left));
        assert_eq!(tree.leftmost, Some(leaf));
    }
}
