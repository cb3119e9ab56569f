//! Storage for the nodes of a [`Tree`][crate::Tree].
//!
//! Nodes never own each other. The arena owns all of them and links between
//! nodes are [`NodeId`] handles into it. Freed slots are recycled LIFO and
//! their generation is bumped, so a handle to a removed node can never alias
//! the node that later reuses its slot.

use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::{Error, Result};
use crate::node::{Node, NodeId};

/// Source of per-tree tags. Handles carry the tag of the tree that issued
/// them so they can't be used with another tree.
static NEXT_TAG: AtomicU32 = AtomicU32::new(0);

fn next_tag() -> u32 {
    NEXT_TAG.fetch_add(1, Ordering::Relaxed)
}

struct Slot<K, V> {
    generation: u32,
    node: Option<Node<K, V>>,
}

pub(crate) struct Arena<K, V> {
    tag: u32,
    slots: Vec<Slot<K, V>>,
    /// Indices of vacant slots, used as a stack.
    free: Vec<u32>,
    len: usize,
}

impl<K, V> Arena<K, V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            tag: next_tag(),
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of live nodes.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Moves `node` into the arena and returns its handle.
    pub(crate) fn insert(&mut self, node: Node<K, V>) -> NodeId {
        self.len += 1;
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                debug_assert!(slot.node.is_none(), "free list pointed at a live slot");
                slot.node = Some(node);
                NodeId::new(self.tag, index, slot.generation)
            }
            None => {
                let index = u32::try_from(self.slots.len()).expect("arena exceeded u32::MAX slots");
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId::new(self.tag, index, 0)
            }
        }
    }

    /// Checks that `id` refers to a live node of this arena.
    pub(crate) fn check(&self, id: NodeId) -> Result<()> {
        self.get(id).map(|_| ())
    }

    pub(crate) fn get(&self, id: NodeId) -> Result<&Node<K, V>> {
        if id.tag != self.tag {
            return Err(Error::ForeignNode(id));
        }
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
            .ok_or(Error::NodeNotFound(id))
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Result<&mut Node<K, V>> {
        if id.tag != self.tag {
            return Err(Error::ForeignNode(id));
        }
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or(Error::NodeNotFound(id))
    }

    /// Takes the node out of the arena, invalidating `id` and every copy of it.
    pub(crate) fn remove(&mut self, id: NodeId) -> Result<Node<K, V>> {
        self.check(id)?;
        let slot = &mut self.slots[id.index as usize];
        let node = slot.node.take().ok_or(Error::NodeNotFound(id))?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Ok(node)
    }

    /// Drops every node. Outstanding handles become stale.
    pub(crate) fn clear(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(index as u32);
        }
        // Hand out low indices first.
        self.free.reverse();
        self.len = 0;
    }

    /// Rewrites a handle issued by this arena so it carries `tag` instead.
    fn retag(id: NodeId, tag: u32) -> NodeId {
        NodeId::new(tag, id.index, id.generation)
    }

    /// Re-tags a handle issued by another arena whose slots were copied into
    /// this one.
    pub(crate) fn adopt(&self, id: NodeId) -> NodeId {
        Self::retag(id, self.tag)
    }
}

impl<K, V> Clone for Arena<K, V>
where
    K: Clone,
    V: Clone,
{
    /// The copy gets a fresh tag and every link inside it is re-tagged, so
    /// handles into `self` are foreign to the clone and vice versa.
    fn clone(&self) -> Self {
        let tag = next_tag();
        let slots = self
            .slots
            .iter()
            .map(|slot| Slot {
                generation: slot.generation,
                node: slot.node.as_ref().map(|node| {
                    let mut node = node.clone();
                    node.parent = node.parent.map(|id| Self::retag(id, tag));
                    node.left = node.left.map(|id| Self::retag(id, tag));
                    node.right = node.right.map(|id| Self::retag(id, tag));
                    node
                }),
            })
            .collect();

        Self {
            tag,
            slots,
            free: self.free.clone(),
            len: self.len,
        }
    }
}

impl<K, V> Index<NodeId> for Arena<K, V> {
    type Output = Node<K, V>;

    /// Panics if `id` is not live. Only used for links read out of the tree
    /// itself, which are live by construction.
    fn index(&self, id: NodeId) -> &Self::Output {
        self.get(id).expect("tree link points at a live node")
    }
}

impl<K, V> IndexMut<NodeId> for Arena<K, V> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        self.get_mut(id).expect("tree link points at a live node")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_handles_go_stale() {
        let mut arena = Arena::with_capacity(0);
        let a = arena.insert(Node::new(1, ()));
        assert_eq!(arena.len(), 1);

        let node = arena.remove(a).unwrap();
        assert_eq!(*node.key(), 1);
        assert_eq!(arena.len(), 0);
        assert_eq!(arena.get(a).unwrap_err(), Error::NodeNotFound(a));

        // The slot is reused but the old handle doesn't see the new node.
        let b = arena.insert(Node::new(2, ()));
        assert_eq!(a.index, b.index);
        assert_ne!(a, b);
        assert!(arena.get(a).is_err());
        assert_eq!(*arena[b].key(), 2);
    }

    #[test]
    fn handles_are_tied_to_their_arena() {
        let mut first = Arena::with_capacity(0);
        let mut second = Arena::<i32, ()>::with_capacity(0);
        let id = first.insert(Node::new(1, ()));
        second.insert(Node::new(1, ()));

        assert_eq!(second.get(id).unwrap_err(), Error::ForeignNode(id));
    }

    #[test]
    fn clone_retags_links() {
        let mut arena = Arena::with_capacity(2);
        let parent = arena.insert(Node::new(2, ()));
        let child = arena.insert(Node::new(1, ()));
        arena[parent].left = Some(child);
        arena[child].parent = Some(parent);

        let copy = arena.clone();
        assert!(copy.get(parent).is_err());

        let parent = copy.adopt(parent);
        let child = copy.adopt(child);
        assert_eq!(copy[parent].left, Some(child));
        assert_eq!(copy[child].parent, Some(parent));
    }

    #[test]
    fn clear_invalidates_everything() {
        let mut arena = Arena::with_capacity(0);
        let ids: Vec<_> = (0..4).map(|k| arena.insert(Node::new(k, ()))).collect();
        arena.clear();

        assert_eq!(arena.len(), 0);
        assert!(ids.iter().all(|id| arena.get(*id).is_err()));
        assert!(arena.slots.iter().all(|slot| slot.node.is_none()));

        let id = arena.insert(Node::new(9, ()));
        assert_eq!(id.index, 0);
    }
}
