//! Slab storage for tree nodes
//!
//! Slots of freed nodes go onto a free list and are handed out again by
//! [`NodeArena::alloc`] under a new generation, so a [`NodeId`] stops
//! resolving once its node is freed.

use std::ops::{Index, IndexMut};

use super::{Color, Node, NodeId, Side};

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    node: Option<Node<T>>,
}

/// Arena owning every node of one tree
#[derive(Debug, Clone)]
pub struct NodeArena<T> {
    /// Slot storage, `node` is `None` for vacant slots
    slots: Vec<Slot<T>>,

    /// Vacant slot indices, reused LIFO
    free: Vec<usize>,

    /// Number of occupied slots
    live: usize,
}

impl<T> Default for NodeArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NodeArena<T> {
    /// Empty arena
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Empty arena with room for `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.live
    }

    /// True when no node is live
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of slots, live or vacant
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Store `value` in a detached Red node
    ///
    /// Panics once every addressable slot is live.
    pub fn alloc(&mut self, value: T) -> NodeId {
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.node = Some(Node::new(value));
                NodeId::new(index, slot.generation)
            }
            None => {
                let id = NodeId::new(self.slots.len(), 0);
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(Node::new(value)),
                });
                id
            }
        };
        self.live += 1;
        id
    }

    /// Release a detached node and hand back its value
    ///
    /// Panics if `id` is not live.
    pub fn free(&mut self, id: NodeId) -> T {
        let Some(slot) = self
            .slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
        else {
            panic!("free of vacant node {}", id);
        };
        let Some(node) = slot.node.take() else {
            panic!("free of vacant node {}", id);
        };
        debug_assert!(node.is_detached(), "node {} freed while still linked", id);
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index());
        self.live -= 1;
        node.value
    }

    /// Drop every node
    ///
    /// Slots are kept so that ids handed out before the clear stay stale.
    pub fn clear(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(index);
        }
        self.live = 0;
    }

    /// Node at `id`, if live
    pub fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_ref())
    }

    /// Mutable node at `id`, if live
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.node.as_mut())
    }

    /// True when `id` names a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    // ----- structural queries -----

    /// Color of an optional node; absent children count as Black
    #[inline]
    pub fn color_of(&self, id: Option<NodeId>) -> Color {
        id.map_or(Color::Black, |id| self[id].color)
    }

    /// True for a present Red node
    #[inline]
    pub fn is_red(&self, id: Option<NodeId>) -> bool {
        self.color_of(id) == Color::Red
    }

    /// Recolor `id`
    #[inline]
    pub fn set_color(&mut self, id: NodeId, color: Color) {
        self[id].color = color;
    }

    /// Parent of `id`
    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self[id].parent
    }

    /// Child of `id` on `side`
    #[inline]
    pub fn child(&self, id: NodeId, side: Side) -> Option<NodeId> {
        self[id].child(side)
    }

    /// Which side of its parent `id` hangs on, `None` for a root
    pub fn side_of(&self, id: NodeId) -> Option<Side> {
        let parent = self[id].parent?;
        if self[parent].left == Some(id) {
            Some(Side::Left)
        } else {
            debug_assert_eq!(self[parent].right, Some(id), "broken parent link at {}", id);
            Some(Side::Right)
        }
    }

    /// True if `id` is the left child of its parent
    pub fn is_left_child(&self, id: NodeId) -> bool {
        self.side_of(id) == Some(Side::Left)
    }

    /// True if `id` is the right child of its parent
    pub fn is_right_child(&self, id: NodeId) -> bool {
        self.side_of(id) == Some(Side::Right)
    }

    /// The other child of `id`'s parent
    pub fn sibling(&self, id: NodeId) -> Option<NodeId> {
        let side = self.side_of(id)?;
        let parent = self[id].parent?;
        self.child(parent, side.opposite())
    }

    /// The sibling of `id`'s parent
    pub fn uncle(&self, id: NodeId) -> Option<NodeId> {
        self.sibling(self[id].parent?)
    }

    /// Point `parent`'s `side` link at `child` and fix the child's back-link
    pub fn link(&mut self, parent: NodeId, side: Side, child: Option<NodeId>) {
        *self[parent].child_mut(side) = child;
        if let Some(child) = child {
            self[child].parent = Some(parent);
        }
    }
}

impl<T> Index<NodeId> for NodeArena<T> {
    type Output = Node<T>;

    fn index(&self, id: NodeId) -> &Node<T> {
        self.get(id)
            .unwrap_or_else(|| panic!("access to vacant node {}", id))
    }
}

impl<T> IndexMut<NodeId> for NodeArena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<T> {
        self.get_mut(id)
            .unwrap_or_else(|| panic!("access to vacant node {}", id))
    }
}
