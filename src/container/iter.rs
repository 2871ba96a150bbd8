//! Double-ended in-order iteration

use std::iter::FusedIterator;

use crate::node::{NodeArena, NodeId};
use crate::tree::{next, prev, TreeHandle};

/// In-order iterator over an [`OrderedTree`](super::OrderedTree)
#[derive(Debug)]
pub struct Iter<'a, T> {
    arena: &'a NodeArena<T>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(super) fn new(arena: &'a NodeArena<T>, handle: &TreeHandle) -> Self {
        Self {
            arena,
            front: handle.leftmost,
            back: handle.rightmost,
            remaining: arena.len(),
        }
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        self.front = next(self.arena, id);
        self.remaining -= 1;
        Some(&self.arena[id].value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        self.back = prev(self.arena, id);
        self.remaining -= 1;
        Some(&self.arena[id].value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
