//! Ordered set and multiset built on the tree engine
//!
//! [`OrderedTree`] owns a [`NodeArena`] and a [`TreeHandle`] and drives the
//! engine the usual way: search for a position, allocate, link and balance;
//! or move the cached extremes off a victim, erase it and free its slot.

mod iter;

pub use iter::Iter;

use std::fmt;

use tracing::{debug, error};

use crate::node::{NodeArena, NodeId, Side};
use crate::tree::{
    self, check, erase, find_to_insert, find_to_insert_hint, insert_at, next, prev, render, Comparator, FindResult,
    InsertPos, NaturalOrder, TreeHandle, TreeStats,
};
use crate::{TreeConfig, TreeError};

/// Red-black ordered collection
///
/// With [`Duplicates::Reject`](crate::Duplicates::Reject) it behaves as a
/// set; with [`Duplicates::Allow`](crate::Duplicates::Allow) as a multiset in
/// which equal elements keep insertion order.
pub struct OrderedTree<T, C = NaturalOrder> {
    arena: NodeArena<T>,
    handle: TreeHandle,
    comp: C,
    config: TreeConfig,
}

impl<T: Ord> OrderedTree<T> {
    /// Empty set under the natural order
    pub fn new() -> Self {
        Self::build(TreeConfig::unique(), NaturalOrder)
    }

    /// Empty tree under the natural order with the given settings
    pub fn with_config(config: TreeConfig) -> Result<Self, TreeError> {
        Self::with_comparator(config, NaturalOrder)
    }
}

impl<T: Ord> Default for OrderedTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C: Comparator<T>> OrderedTree<T, C> {
    /// Empty tree ordered by `comp`
    pub fn with_comparator(config: TreeConfig, comp: C) -> Result<Self, TreeError> {
        config.validate()?;
        Ok(Self::build(config, comp))
    }

    fn build(config: TreeConfig, comp: C) -> Self {
        Self {
            arena: NodeArena::with_capacity(config.capacity),
            handle: TreeHandle::empty(),
            comp,
            config,
        }
    }

    /// Settings this tree was built with
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Root and cached extremes
    pub fn handle(&self) -> &TreeHandle {
        &self.handle
    }

    /// Node storage, for inspection
    pub fn arena(&self) -> &NodeArena<T> {
        &self.arena
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// True when the tree holds nothing
    pub fn is_empty(&self) -> bool {
        self.handle.is_empty()
    }

    fn multi(&self) -> bool {
        self.config.duplicates.allowed()
    }

    /// Insert `value`
    ///
    /// Returns the node holding it and whether it was newly added. In set
    /// mode an equal element is left in place and `value` is dropped. The
    /// position is found before anything is allocated, so a panicking
    /// comparator leaves the tree as it was.
    pub fn insert(&mut self, value: T) -> (NodeId, bool) {
        let found = find_to_insert(&self.arena, self.handle.root, &value, &self.comp, self.multi());
        self.place(found, value)
    }

    /// Insert `value` using `hint` as a guess of its successor
    ///
    /// `None` means "at the end". The result is the same as
    /// [`insert`](Self::insert); a good hint only skips the descent. A hint
    /// that is not a live node of this tree is ignored.
    pub fn insert_hint(&mut self, hint: Option<NodeId>, value: T) -> (NodeId, bool) {
        let multi = self.multi();
        let found = match hint {
            Some(h) if !self.arena.contains(h) => {
                debug!(hint = %h, "stale hint ignored");
                find_to_insert(&self.arena, self.handle.root, &value, &self.comp, multi)
            }
            _ => find_to_insert_hint(&self.arena, &self.handle, &value, &self.comp, multi, hint),
        };
        self.place(found, value)
    }

    fn place(&mut self, found: FindResult, value: T) -> (NodeId, bool) {
        match found {
            FindResult::Occupied(id) => {
                debug!(node = %id, "equal element present, insert skipped");
                (id, false)
            }
            FindResult::Vacant(pos) => {
                let id = self.arena.alloc(value);
                insert_at(&mut self.arena, &mut self.handle, pos, id);
                debug!(node = %id, len = self.len(), "inserted");
                self.verify("insert");
                (id, true)
            }
        }
    }

    /// Node of the first element not less than `key`
    pub fn lower_bound(&self, key: &T) -> Option<NodeId> {
        self.node_after(tree::lower_bound(&self.arena, self.handle.root, key, &self.comp))
    }

    /// Node of the first element greater than `key`
    pub fn upper_bound(&self, key: &T) -> Option<NodeId> {
        self.node_after(tree::upper_bound(&self.arena, self.handle.root, key, &self.comp))
    }

    /// The node that would follow an element attached at `pos`
    fn node_after(&self, pos: InsertPos) -> Option<NodeId> {
        match pos {
            InsertPos::Root => None,
            InsertPos::Child { parent, side: Side::Left } => Some(parent),
            InsertPos::Child { parent, side: Side::Right } => next(&self.arena, parent),
        }
    }

    /// Node of the first element equal to `key`
    pub fn find(&self, key: &T) -> Option<NodeId> {
        self.lower_bound(key)
            .filter(|&id| !self.comp.less(key, &self.arena[id].value))
    }

    /// True when an element equal to `key` is present
    pub fn contains(&self, key: &T) -> bool {
        self.find(key).is_some()
    }

    /// Element stored at `id`, if it is live
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.arena.get(id).map(|node| &node.value)
    }

    /// Smallest element
    pub fn first(&self) -> Option<&T> {
        self.handle.leftmost.map(|id| &self.arena[id].value)
    }

    /// Largest element
    pub fn last(&self) -> Option<&T> {
        self.handle.rightmost.map(|id| &self.arena[id].value)
    }

    /// Node of the smallest element
    pub fn first_node(&self) -> Option<NodeId> {
        self.handle.leftmost
    }

    /// Node of the largest element
    pub fn last_node(&self) -> Option<NodeId> {
        self.handle.rightmost
    }

    /// In-order successor of `id`; `None` at the end or for a stale id
    pub fn next_node(&self, id: NodeId) -> Option<NodeId> {
        self.arena.contains(id).then(|| next(&self.arena, id)).flatten()
    }

    /// In-order predecessor of `id`; `None` at the start or for a stale id
    pub fn prev_node(&self, id: NodeId) -> Option<NodeId> {
        self.arena.contains(id).then(|| prev(&self.arena, id)).flatten()
    }

    /// Remove the first element equal to `key`
    pub fn remove(&mut self, key: &T) -> Option<T> {
        let id = self.find(key)?;
        Some(self.unlink(id))
    }

    /// Remove the element at `id`
    pub fn remove_node(&mut self, id: NodeId) -> Result<T, TreeError> {
        if !self.arena.contains(id) {
            return Err(TreeError::StaleNode(id));
        }
        Ok(self.unlink(id))
    }

    /// Remove and return the smallest element
    pub fn pop_first(&mut self) -> Option<T> {
        let id = self.handle.leftmost?;
        Some(self.unlink(id))
    }

    /// Remove and return the largest element
    pub fn pop_last(&mut self) -> Option<T> {
        let id = self.handle.rightmost?;
        Some(self.unlink(id))
    }

    fn unlink(&mut self, id: NodeId) -> T {
        // erase only maintains the root
        if self.handle.leftmost == Some(id) {
            self.handle.leftmost = next(&self.arena, id);
        }
        if self.handle.rightmost == Some(id) {
            self.handle.rightmost = prev(&self.arena, id);
        }
        erase(&mut self.arena, &mut self.handle.root, id);
        let value = self.arena.free(id);
        debug!(node = %id, len = self.len(), "removed");
        self.verify("remove");
        value
    }

    /// Drop every element
    pub fn clear(&mut self) {
        self.arena.clear();
        self.handle = TreeHandle::empty();
        debug!("cleared");
    }

    /// Elements in order
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.arena, &self.handle)
    }

    /// Check every structural invariant
    pub fn validate(&self) -> Result<TreeStats, TreeError> {
        Ok(check(&self.arena, &self.handle, &self.comp)?)
    }

    fn verify(&self, op: &str) {
        if !self.config.verify {
            return;
        }
        if let Err(violation) = check(&self.arena, &self.handle, &self.comp) {
            error!(op, %violation, "tree invariant broken");
            panic!("{} left the tree invalid: {}", op, violation);
        }
    }
}

impl<T: fmt::Display, C> OrderedTree<T, C> {
    /// Level-by-level dump of the shape and colors
    pub fn render(&self) -> String {
        render(&self.arena, self.handle.root)
    }
}

impl<T: fmt::Debug, C> fmt::Debug for OrderedTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(Iter::new(&self.arena, &self.handle))
            .finish()
    }
}

impl<'a, T, C> IntoIterator for &'a OrderedTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        Iter::new(&self.arena, &self.handle)
    }
}

impl<T, C: Comparator<T>> Extend<T> for OrderedTree<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord> FromIterator<T> for OrderedTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}
