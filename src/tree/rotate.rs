//! Rotations.
//!
//! A rotation swaps a node with one of its children without changing the
//! in-order sequence of keys. Both directions are one routine parameterized by
//! [`Side`]: rotating *towards* `side` lifts the child on the opposite side.

use std::borrow::Borrow;

use crate::error::{Error, Result};
use crate::node::NodeId;
use crate::tree::Tree;
use crate::util::Side;

impl<K, V> Tree<K, V>
where
    K: Ord,
{
    /// Rotates the subtree rooted at `id` to the left and returns the new
    /// subtree root, which is `id`'s former right child.
    ///
    /// ```text
    ///      x                 y
    ///     / \               / \
    ///    a   y     ->      x   c
    ///       / \           / \
    ///      b   c         a   b
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::MissingChild`] if `id` has no right child, or any error of
    /// [`Tree::get`].
    pub fn left_rotate(&mut self, id: NodeId) -> Result<NodeId> {
        self.rotate(id, Side::Left)
    }

    /// Rotates the subtree rooted at `id` to the right and returns the new
    /// subtree root, which is `id`'s former left child.
    ///
    /// ```text
    ///        x             y
    ///       / \           / \
    ///      y   c   ->    a   x
    ///     / \               / \
    ///    a   b             b   c
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::MissingChild`] if `id` has no left child, or any error of
    /// [`Tree::get`].
    pub fn right_rotate(&mut self, id: NodeId) -> Result<NodeId> {
        self.rotate(id, Side::Right)
    }

    fn rotate(&mut self, id: NodeId, direction: Side) -> Result<NodeId> {
        let lifted = direction.opposite();
        if self.arena.get(id)?.child(lifted).is_none() {
            return Err(Error::MissingChild {
                node: id,
                side: lifted,
            });
        }
        Ok(self.rotate_unchecked(id, direction))
    }

    /// Rotates `x` towards `direction`, returning the lifted child.
    ///
    /// # Panics
    ///
    /// If `x` has no child opposite `direction`.
    pub(super) fn rotate_unchecked(&mut self, x: NodeId, direction: Side) -> NodeId {
        let lifted = direction.opposite();
        let y = self.arena[x]
            .child(lifted)
            .expect("rotation needs a child to lift");
        let inner = self.arena[y].child(direction);
        let parent = self.arena[x].parent;

        // y takes x's place below x's parent.
        self.replace_in_parent(x, Some(y));
        self.arena[y].parent = parent;

        // y's inner subtree moves across to x.
        self.arena[x].set_child(lifted, inner);
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(x);
        }

        // x hangs below y.
        self.arena[y].set_child(direction, Some(x));
        self.arena[x].parent = Some(y);

        tracing::trace!(node = ?x, lifted = ?y, %direction, "rotated");
        self.debug_check_order(x);
        self.debug_check_order(y);
        y
    }

    /// [`Tree::left_rotate`] on the node found by [`Tree::search`].
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if no node has `key`, otherwise as
    /// [`Tree::left_rotate`].
    pub fn left_rotate_key<Q>(&mut self, key: &Q) -> Result<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.search(key).ok_or(Error::KeyNotFound)?.id();
        self.left_rotate(id)
    }

    /// [`Tree::right_rotate`] on the node found by [`Tree::search`].
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if no node has `key`, otherwise as
    /// [`Tree::right_rotate`].
    pub fn right_rotate_key<Q>(&mut self, key: &Q) -> Result<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.search(key).ok_or(Error::KeyNotFound)?.id();
        self.right_rotate(id)
    }
}
