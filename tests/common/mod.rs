#![allow(dead_code)]

use rbtree_engine::tree::{check, next, prev, NaturalOrder};
use rbtree_engine::{NodeId, OrderedTree, TreeConfig, TreeStats};

pub fn set_of(keys: &[i32]) -> OrderedTree<i32> {
    let mut tree = OrderedTree::new();
    tree.extend(keys.iter().copied());
    tree
}

pub fn multiset_of(keys: &[i32]) -> OrderedTree<i32> {
    let mut tree = OrderedTree::with_config(TreeConfig::multi()).expect("default multi config is valid");
    tree.extend(keys.iter().copied());
    tree
}

pub fn keys(tree: &OrderedTree<i32>) -> Vec<i32> {
    tree.iter().copied().collect()
}

/// Nodes visited by following `next` from the minimum
pub fn forward_walk(tree: &OrderedTree<i32>) -> Vec<NodeId> {
    let mut out = Vec::with_capacity(tree.len());
    let mut cur = tree.handle().leftmost;
    while let Some(id) = cur {
        out.push(id);
        cur = next(tree.arena(), id);
    }
    out
}

/// Nodes visited by following `prev` from the maximum
pub fn backward_walk(tree: &OrderedTree<i32>) -> Vec<NodeId> {
    let mut out = Vec::with_capacity(tree.len());
    let mut cur = tree.handle().rightmost;
    while let Some(id) = cur {
        out.push(id);
        cur = prev(tree.arena(), id);
    }
    out
}

pub fn assert_valid(tree: &OrderedTree<i32>) -> TreeStats {
    let stats = check(tree.arena(), tree.handle(), &NaturalOrder)
        .unwrap_or_else(|violation| panic!("invalid tree: {}\n{}", violation, tree.render()));
    assert_eq!(stats.len, tree.len(), "reachable nodes differ from live slots");
    stats
}
