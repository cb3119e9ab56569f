//! Deletion.
//!
//! A node with at most one child is *spliced out*: its child (if any) moves
//! up into the slot the node occupied. A node `u` with two children is first
//! swapped with its successor `s` by relinking both nodes, after which `u`
//! sits where `s` was. That position has no left child, so `u` can then be
//! spliced out.
//!
//! Swapping links rather than copying `s`'s key and value into `u` means `s`
//! keeps its [`NodeId`]. Handles held by callers stay valid for every node
//! except the one removed.

use std::borrow::Borrow;

use crate::error::{Error, Result};
use crate::node::{Node, NodeId};
use crate::tree::Tree;
use crate::util::Side;

impl<K, V> Tree<K, V>
where
    K: Ord,
{
    /// Removes the node behind `id` and returns it, detached.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_index::Tree;
    ///
    /// let mut tree = Tree::new();
    /// let id = tree.tail_insert(1, "one");
    ///
    /// let node = tree.delete(id).unwrap();
    /// assert_eq!(node.into_parts(), (1, "one"));
    /// assert!(tree.is_empty());
    ///
    /// // The handle is stale now.
    /// assert!(tree.delete(id).is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::ForeignNode`] if another tree issued `id`,
    /// [`Error::NodeNotFound`] if the node has already been removed.
    pub fn delete(&mut self, id: NodeId) -> Result<Node<K, V>> {
        self.arena.check(id)?;
        Ok(self.delete_unchecked(id))
    }

    /// Removes and returns the node with the smallest key.
    pub fn remove_min(&mut self) -> Option<Node<K, V>> {
        let min = self.extreme(self.root?, Side::Left);
        Some(self.delete_unchecked(min))
    }

    /// Removes and returns the node with the largest key.
    pub fn remove_max(&mut self) -> Option<Node<K, V>> {
        let max = self.extreme(self.root?, Side::Right);
        Some(self.delete_unchecked(max))
    }

    fn delete_unchecked(&mut self, u: NodeId) -> Node<K, V> {
        if self.arena[u].has_two_children() {
            let s = self
                .neighbour(u, Side::Right)
                .expect("a node with a right child has a successor");
            self.swap_with_successor(u, s);
            debug_assert!(self.arena[u].left.is_none());
        }
        self.splice_out(u);

        let mut node = self
            .arena
            .remove(u)
            .expect("node being deleted is in the arena");
        node.reset();
        node
    }

    /// Unhooks `u`, which has at most one child, by moving that child into
    /// `u`'s slot. `u`'s own links are left dangling for the caller to clear.
    fn splice_out(&mut self, u: NodeId) {
        let node = &self.arena[u];
        debug_assert!(!node.has_two_children(), "splicing out a node with two children");
        let child = node.left.or(node.right);
        let parent = node.parent;

        self.replace_in_parent(u, child);
        if let Some(child) = child {
            self.arena[child].parent = parent;
        }
        tracing::trace!(node = ?u, ?child, "spliced out");
        if let Some(parent) = parent {
            self.debug_check_order(parent);
        }
    }

    /// Exchanges the positions of `u` and its successor `s`.
    ///
    /// `u` must have two children, so `s` is the minimum of `u`'s right
    /// subtree and has no left child. Afterwards `s` has `u`'s parent and
    /// children, and `u` has `s`'s old parent and right child and no left
    /// child.
    ///
    /// The order of the steps matters: `s` is fully attached in `u`'s place
    /// before `u` is re-hung, since `u`'s new parent may be `s` itself.
    fn swap_with_successor(&mut self, u: NodeId, s: NodeId) {
        let u_parent = self.arena[u].parent;
        let u_left = self.arena[u].left.expect("u has two children");
        let u_right = self.arena[u].right.expect("u has two children");
        let s_parent = self.arena[s].parent.expect("s is below u");
        let s_right = self.arena[s].right;
        debug_assert!(self.arena[s].left.is_none(), "successor has a left child");

        // 1. s takes u's slot under u's parent (or becomes the root).
        self.replace_in_parent(u, Some(s));
        self.arena[s].parent = u_parent;

        // 2. u's left subtree moves to s.
        self.arena[s].left = Some(u_left);
        self.arena[u_left].parent = Some(s);

        // 3. The right side depends on how far down s was.
        if u_right == s {
            // s was u's right child: u becomes s's right child.
            tracing::trace!(node = ?u, successor = ?s, "swapping with adjacent successor");
            self.arena[s].right = Some(u);
            self.arena[u].parent = Some(s);
        } else {
            // s was deeper: s adopts u's right subtree, and u takes s's old
            // slot as the left child of s's old parent.
            tracing::trace!(node = ?u, successor = ?s, "swapping with deep successor");
            self.arena[s].right = Some(u_right);
            self.arena[u_right].parent = Some(s);
            debug_assert_eq!(self.arena[s_parent].left, Some(s));
            self.arena[s_parent].left = Some(u);
            self.arena[u].parent = Some(s_parent);
        }

        // 4. u takes over s's old children: its right subtree, and no left.
        self.arena[u].right = s_right;
        if let Some(s_right) = s_right {
            self.arena[s_right].parent = Some(u);
        }
        self.arena[u].left = None;

        // u is about to be spliced out, so only s has to be in order.
        self.debug_check_order(s);
    }

    /// Removes a node with the given key and returns it, detached. If several
    /// nodes share the key, the one [`Tree::search`] finds is removed.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if no node has `key` (including when the tree is
    /// empty).
    pub fn delete_key<Q>(&mut self, key: &Q) -> Result<Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.search(key).ok_or(Error::KeyNotFound)?.id();
        Ok(self.delete_unchecked(id))
    }
}
