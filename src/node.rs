//! Nodes and handles to them.
//!
//! A [`Node`] is the record stored for every key in a [`Tree`]. While it is in
//! a tree it is addressed by a [`NodeId`] and inspected through a [`NodeRef`],
//! which can also answer questions about the node's relatives. Once removed,
//! the tree hands the `Node` back to the caller fully detached.

use std::fmt;

use crate::error::{Error, Result};
use crate::tree::Tree;
use crate::util::Side;

/// Stable handle to a node inside a [`Tree`].
///
/// Handles stay valid across every structural change (rotations, deletion of
/// *other* nodes, including the successor transplant) until the node itself is
/// removed. Using a handle after that, or with a tree other than the one that
/// issued it, is reported as an error rather than resolving to another node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) tag: u32,
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    pub(crate) fn new(tag: u32, index: u32, generation: u32) -> Self {
        Self {
            tag,
            index,
            generation,
        }
    }

    #[cfg(test)]
    pub(crate) fn dangling() -> Self {
        Self::new(u32::MAX, u32::MAX, u32::MAX)
    }
}

/// A key, its value and the links to neighbouring nodes.
#[derive(Clone, Debug)]
pub struct Node<K, V> {
    key: K,
    value: V,
    pub(crate) parent: Option<NodeId>,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
}

impl<K, V> Node<K, V> {
    /// Creates a detached node.
    pub fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            parent: None,
            left: None,
            right: None,
        }
    }

    /// The key. It can't change while the node exists.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// The value, mutably. Values don't take part in ordering so this can't
    /// break the tree.
    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Consumes the node, returning its key and value.
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }

    /// Handle of the parent, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Handle of the left child, if any.
    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    /// Handle of the right child, if any.
    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    /// Handle of the child on `side`, if any.
    pub fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(crate) fn set_child(&mut self, side: Side, child: Option<NodeId>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// `true` if the node has at least one child.
    pub fn has_children(&self) -> bool {
        self.left.is_some() || self.right.is_some()
    }

    /// `true` if the node has exactly one child.
    pub fn has_one_child(&self) -> bool {
        self.left.is_some() != self.right.is_some()
    }

    /// `true` if the node has both children.
    pub fn has_two_children(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    /// `true` if the node has no parent and no children.
    pub fn is_detached(&self) -> bool {
        self.parent.is_none() && !self.has_children()
    }

    /// Forgets all links.
    pub fn reset(&mut self) {
        self.parent = None;
        self.left = None;
        self.right = None;
    }
}

impl<K, V> fmt::Display for Node<K, V>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}: {}}}", self.key, self.value)
    }
}

/// A borrowed view of a node that is currently in a [`Tree`].
///
/// Besides the node's own data this can walk to its relatives. Two `NodeRef`s
/// are equal when they point at the same node.
pub struct NodeRef<'a, K, V> {
    tree: &'a Tree<K, V>,
    id: NodeId,
}

impl<K, V> Clone for NodeRef<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<K, V> Copy for NodeRef<'_, K, V> {}

impl<K, V> PartialEq for NodeRef<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
impl<K, V> Eq for NodeRef<'_, K, V> {}

impl<'a, K, V> NodeRef<'a, K, V> {
    /// `id` must be live in `tree`.
    pub(crate) fn new(tree: &'a Tree<K, V>, id: NodeId) -> Self {
        debug_assert!(tree.arena.check(id).is_ok());
        Self { tree, id }
    }

    fn link(&self, id: Option<NodeId>) -> Option<NodeRef<'a, K, V>> {
        id.map(|id| NodeRef::new(self.tree, id))
    }

    /// The handle of this node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The underlying record.
    pub fn node(&self) -> &'a Node<K, V> {
        &self.tree.arena[self.id]
    }

    /// The key.
    pub fn key(&self) -> &'a K {
        self.node().key()
    }

    /// The value.
    pub fn value(&self) -> &'a V {
        self.node().value()
    }

    /// The parent, or `None` for the root.
    pub fn parent(&self) -> Option<NodeRef<'a, K, V>> {
        self.link(self.node().parent)
    }

    /// The left child.
    pub fn left(&self) -> Option<NodeRef<'a, K, V>> {
        self.link(self.node().left)
    }

    /// The right child.
    pub fn right(&self) -> Option<NodeRef<'a, K, V>> {
        self.link(self.node().right)
    }

    /// The child on `side`.
    pub fn child(&self, side: Side) -> Option<NodeRef<'a, K, V>> {
        self.link(self.node().child(side))
    }

    /// `true` if this is the root of its tree.
    pub fn is_root(&self) -> bool {
        self.node().parent.is_none()
    }

    /// The slot this node occupies in its parent, or `None` for the root.
    pub fn side(&self) -> Option<Side> {
        let parent = self.parent()?;
        if parent.node().left == Some(self.id) {
            Some(Side::Left)
        } else {
            Some(Side::Right)
        }
    }

    /// `true` if this node is its parent's left child.
    ///
    /// # Errors
    ///
    /// [`Error::NoParent`] on the root.
    pub fn is_left_child(&self) -> Result<bool> {
        self.side()
            .map(|side| side == Side::Left)
            .ok_or(Error::NoParent(self.id))
    }

    /// `true` if this node is its parent's right child.
    ///
    /// # Errors
    ///
    /// [`Error::NoParent`] on the root.
    pub fn is_right_child(&self) -> Result<bool> {
        self.side()
            .map(|side| side == Side::Right)
            .ok_or(Error::NoParent(self.id))
    }

    /// The parent's other child.
    pub fn sibling(&self) -> Option<NodeRef<'a, K, V>> {
        let side = self.side()?;
        self.parent()?.child(side.opposite())
    }

    /// The parent's parent.
    pub fn grandparent(&self) -> Option<NodeRef<'a, K, V>> {
        self.parent()?.parent()
    }

    /// The parent's sibling.
    ///
    /// # Errors
    ///
    /// [`Error::Corrupted`] if the parent is not a child of the grandparent.
    pub fn uncle(&self) -> Result<Option<NodeRef<'a, K, V>>> {
        let (Some(parent), Some(grandparent)) = (self.parent(), self.grandparent()) else {
            return Ok(None);
        };
        let links = grandparent.node();
        if links.left == Some(parent.id) {
            Ok(grandparent.right())
        } else if links.right == Some(parent.id) {
            Ok(grandparent.left())
        } else {
            Err(Error::Corrupted(format!(
                "node {:?} is the parent of {:?} but not a child of its own parent {:?}",
                parent.id, self.id, grandparent.id
            )))
        }
    }

    /// `true` if the node has at least one child.
    pub fn has_children(&self) -> bool {
        self.node().has_children()
    }

    /// `true` if the node has exactly one child.
    pub fn has_one_child(&self) -> bool {
        self.node().has_one_child()
    }

    /// `true` if the node has both children.
    pub fn has_two_children(&self) -> bool {
        self.node().has_two_children()
    }

    /// Number of nodes in the subtree below this node, not counting itself.
    pub fn descendants(&self) -> usize {
        let mut stack = vec![*self];
        let mut count = 0;
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.left());
            stack.extend(node.right());
        }
        count - 1
    }
}

impl<K, V> fmt::Debug for NodeRef<'_, K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("key", self.key())
            .field("value", self.value())
            .finish()
    }
}

impl<K, V> fmt::Display for NodeRef<'_, K, V>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.node(), f)
    }
}
