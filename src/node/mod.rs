//! Tree nodes and their storage
//!
//! Nodes live in a [`NodeArena`] and refer to each other by [`NodeId`].
//! `left`/`right` are the ownership edges of the tree, `parent` is a plain
//! back-reference used only for navigation and rebalancing.

mod arena;

pub use arena::NodeArena;

use std::fmt;

/// Handle of a node inside a [`NodeArena`]
///
/// Pairs a slot index with the slot's generation. A freed slot moves to the
/// next generation, so ids of removed nodes never resolve to whatever later
/// reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// Largest number of slots an arena can address.
    pub const MAX_SLOTS: usize = u32::MAX as usize;

    /// Panics if `index` lies outside the addressable range.
    pub(crate) fn new(index: usize, generation: u32) -> Self {
        let index = u32::try_from(index)
            .ok()
            .filter(|&i| (i as usize) < Self::MAX_SLOTS)
            .unwrap_or_else(|| panic!("node index {} exceeds {} slots", index, Self::MAX_SLOTS));
        Self { index, generation }
    }

    /// Raw slot index
    #[inline]
    pub fn index(self) -> usize {
        self.index as usize
    }

    /// Generation of the slot when this id was handed out
    #[inline]
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generation == 0 {
            write!(f, "#{}", self.index)
        } else {
            write!(f, "#{}v{}", self.index, self.generation)
        }
    }
}

/// Node color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum Color {
    /// Red node, never has a Red child
    Red,
    /// Black node, counted by black-height
    Black,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => write!(f, "R"),
            Color::Black => write!(f, "B"),
        }
    }
}

/// Which child slot of a parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum Side {
    /// `left` link
    Left,
    /// `right` link
    Right,
}

impl Side {
    /// The other child slot
    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// One key/value slot of the tree
#[derive(Debug, Clone)]
pub struct Node<T> {
    /// Current color
    pub color: Color,
    /// Back-reference to the parent, `None` for the root or a detached node
    pub parent: Option<NodeId>,
    /// Left child
    pub left: Option<NodeId>,
    /// Right child
    pub right: Option<NodeId>,
    /// Stored value, owned by the container
    pub value: T,
}

impl<T> Node<T> {
    /// Detached Red node holding `value`
    pub fn new(value: T) -> Self {
        Self {
            color: Color::Red,
            parent: None,
            left: None,
            right: None,
            value,
        }
    }

    /// Child on the given side
    #[inline]
    pub fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Mutable link to the child on the given side
    #[inline]
    pub fn child_mut(&mut self, side: Side) -> &mut Option<NodeId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// True when no link is set
    pub fn is_detached(&self) -> bool {
        self.parent.is_none() && self.left.is_none() && self.right.is_none()
    }

    /// Drop all links
    pub(crate) fn unlink(&mut self) {
        self.parent = None;
        self.left = None;
        self.right = None;
    }
}
