mod common;

use common::*;
use proptest::prelude::*;
use rbtree_engine::tree::{find_to_insert, find_to_insert_hint, next, prev, NaturalOrder};
use rbtree_engine::{OrderedTree, TreeConfig};

#[derive(Debug, Clone)]
enum Op {
    Insert(i32),
    InsertHinted(i32, usize),
    Remove(i32),
    PopFirst,
    PopLast,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..64i32).prop_map(Op::Insert),
        2 => (0..64i32, any::<usize>()).prop_map(|(k, h)| Op::InsertHinted(k, h)),
        3 => (0..64i32).prop_map(Op::Remove),
        1 => Just(Op::PopFirst),
        1 => Just(Op::PopLast),
    ]
}

/// Hint drawn from every live node plus end
fn pick_hint(tree: &OrderedTree<i32>, raw: usize) -> Option<rbtree_engine::NodeId> {
    let nodes = forward_walk(tree);
    let slot = raw % (nodes.len() + 1);
    nodes.get(slot).copied()
}

proptest! {
    #[test]
    fn insertion_yields_sorted_keys(
        input in proptest::collection::vec(-50i32..50, 0..200),
        multi in any::<bool>(),
    ) {
        let tree = if multi { multiset_of(&input) } else { set_of(&input) };
        let mut expected = input.clone();
        expected.sort();
        if !multi {
            expected.dedup();
        }
        prop_assert_eq!(keys(&tree), expected);
        assert_valid(&tree);
    }

    #[test]
    fn equal_keys_keep_insertion_order(
        input in proptest::collection::vec(0i32..8, 0..120),
        hinted in any::<bool>(),
    ) {
        // tag each key with its arrival index; only the key takes part in ordering
        let mut tree = OrderedTree::with_comparator(
            TreeConfig::multi(),
            |a: &(i32, usize), b: &(i32, usize)| a.0 < b.0,
        ).unwrap();
        for (seq, &k) in input.iter().enumerate() {
            if hinted {
                let hint = tree.lower_bound(&(k, 0));
                tree.insert_hint(hint, (k, seq));
            } else {
                tree.insert((k, seq));
            }
        }
        let mut expected: Vec<(i32, usize)> = input.iter().copied().zip(0..).collect();
        expected.sort_by_key(|&(k, _)| k);
        prop_assert_eq!(tree.iter().copied().collect::<Vec<_>>(), expected);
        tree.validate().unwrap();
    }

    #[test]
    fn invariants_hold_after_every_operation(ops in proptest::collection::vec(op(), 1..300), multi in any::<bool>()) {
        let mut tree = if multi { multiset_of(&[]) } else { set_of(&[]) };
        let mut model: Vec<i32> = Vec::new();
        for op in ops {
            match op {
                Op::Insert(k) => {
                    if tree.insert(k).1 {
                        model.push(k);
                    }
                }
                Op::InsertHinted(k, raw) => {
                    let hint = pick_hint(&tree, raw);
                    if tree.insert_hint(hint, k).1 {
                        model.push(k);
                    }
                }
                Op::Remove(k) => {
                    let removed = tree.remove(&k);
                    let pos = model.iter().position(|&m| m == k);
                    prop_assert_eq!(removed.is_some(), pos.is_some());
                    if let Some(pos) = pos {
                        model.swap_remove(pos);
                    }
                }
                Op::PopFirst => {
                    let expected = model.iter().copied().min();
                    prop_assert_eq!(tree.pop_first(), expected);
                    if let Some(pos) = model.iter().position(|&m| Some(m) == expected) {
                        model.swap_remove(pos);
                    }
                }
                Op::PopLast => {
                    let expected = model.iter().copied().max();
                    prop_assert_eq!(tree.pop_last(), expected);
                    if let Some(pos) = model.iter().position(|&m| Some(m) == expected) {
                        model.swap_remove(pos);
                    }
                }
            }
            assert_valid(&tree);
            prop_assert_eq!(tree.arena().len(), tree.len());
            prop_assert_eq!(tree.len(), model.len());
        }
        let mut sorted = model.clone();
        sorted.sort();
        prop_assert_eq!(keys(&tree), sorted);
    }

    #[test]
    fn cached_extremes_match_traversal(input in proptest::collection::vec(any::<i32>(), 1..150), cut in 0usize..150) {
        let mut tree = set_of(&input);
        for k in input.iter().take(cut) {
            tree.remove(k);
        }
        let forward = forward_walk(&tree);
        let mut backward = backward_walk(&tree);
        backward.reverse();
        prop_assert_eq!(&forward, &backward);
        prop_assert_eq!(tree.first_node(), forward.first().copied());
        prop_assert_eq!(tree.last_node(), forward.last().copied());
        // every node walks back to the same extremes
        for &id in &forward {
            let root = rbtree_engine::tree::root(tree.arena(), id);
            prop_assert_eq!(Some(root), tree.handle().root);
            prop_assert_eq!(Some(rbtree_engine::tree::leftmost(tree.arena(), root)), tree.first_node());
            prop_assert_eq!(Some(rbtree_engine::tree::rightmost(tree.arena(), root)), tree.last_node());
        }
    }

    #[test]
    fn next_and_prev_are_inverse(input in proptest::collection::vec(-20i32..20, 1..100), multi in any::<bool>()) {
        let tree = if multi { multiset_of(&input) } else { set_of(&input) };
        let arena = tree.arena();
        for id in forward_walk(&tree) {
            if let Some(after) = next(arena, id) {
                prop_assert_eq!(prev(arena, after), Some(id));
            }
            if let Some(before) = prev(arena, id) {
                prop_assert_eq!(next(arena, before), Some(id));
            }
        }
    }

    #[test]
    fn any_hint_matches_plain_search(
        input in proptest::collection::vec(0i32..40, 0..80),
        probe in -2i32..42,
        multi in any::<bool>(),
    ) {
        let tree = if multi { multiset_of(&input) } else { set_of(&input) };
        let arena = tree.arena();
        let handle = tree.handle();
        let plain = find_to_insert(arena, handle.root, &probe, &NaturalOrder, multi);

        let mut hints: Vec<_> = forward_walk(&tree).into_iter().map(Some).collect();
        hints.push(None);
        for hint in hints {
            let hinted = find_to_insert_hint(arena, handle, &probe, &NaturalOrder, multi, hint);
            match (plain, hinted) {
                // an equal key may be reported at whichever equal node the path meets
                (rbtree_engine::FindResult::Occupied(a), rbtree_engine::FindResult::Occupied(b)) => {
                    prop_assert_eq!(arena[a].value, arena[b].value);
                }
                _ => prop_assert_eq!(plain, hinted, "hint {:?}", hint),
            }
        }
    }

    #[test]
    fn erasing_everything_leaves_empty_arena(
        input in proptest::collection::vec(0i32..100, 0..150),
        order in any::<proptest::sample::Index>(),
    ) {
        let mut tree = multiset_of(&input);
        let mut victims = keys(&tree);
        // rotate the removal order by an arbitrary offset, then interleave from both ends
        if !victims.is_empty() {
            let offset = order.index(victims.len());
            victims.rotate_left(offset);
        }
        let mut toggle = false;
        while !victims.is_empty() {
            let k = if toggle { victims.pop().unwrap() } else { victims.remove(0) };
            toggle = !toggle;
            prop_assert_eq!(tree.remove(&k), Some(k));
            assert_valid(&tree);
        }
        prop_assert!(tree.is_empty());
        prop_assert!(tree.arena().is_empty());
        prop_assert_eq!(*tree.handle(), rbtree_engine::TreeHandle::empty());
    }
}
