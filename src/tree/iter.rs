//! Traversals over a [`Tree`].
//!
//! The in-order iterators follow successor/predecessor links and need no
//! extra memory. Pre- and post-order keep an explicit stack so deep trees
//! don't recurse.

use std::iter::FusedIterator;

use crate::node::{NodeId, NodeRef};
use crate::tree::Tree;
use crate::util::Side;

impl<K, V> Tree<K, V> {
    /// Visits nodes in ascending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_index::Tree;
    ///
    /// let mut tree = Tree::new();
    /// for key in [2, 3, 1] {
    ///     tree.tail_insert(key, ());
    /// }
    ///
    /// let keys: Vec<_> = tree.in_order().map(|n| *n.key()).collect();
    /// assert_eq!(keys, [1, 2, 3]);
    /// ```
    pub fn in_order(&self) -> InOrder<'_, K, V> {
        InOrder {
            walk: Walk::new(self, Side::Right),
        }
    }

    /// Visits nodes in descending key order.
    pub fn reverse_in_order(&self) -> ReverseInOrder<'_, K, V> {
        ReverseInOrder {
            walk: Walk::new(self, Side::Left),
        }
    }

    /// Visits each node before its left subtree, then its right subtree.
    pub fn pre_order(&self) -> PreOrder<'_, K, V> {
        PreOrder {
            tree: self,
            stack: self.root.into_iter().collect(),
        }
    }

    /// Visits each node after its left subtree and its right subtree.
    pub fn post_order(&self) -> PostOrder<'_, K, V> {
        PostOrder {
            tree: self,
            stack: self.root.map(|root| (root, false)).into_iter().collect(),
        }
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.in_order().map(|node| node.key())
    }

    /// Key/value pairs in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.in_order(),
        }
    }
}

/// Walks neighbour links from one extreme of the tree to the other.
struct Walk<'a, K, V> {
    tree: &'a Tree<K, V>,
    next: Option<NodeId>,
    direction: Side,
    remaining: usize,
}

impl<'a, K, V> Walk<'a, K, V> {
    fn new(tree: &'a Tree<K, V>, direction: Side) -> Self {
        Self {
            tree,
            next: tree
                .root
                .map(|root| tree.extreme(root, direction.opposite())),
            direction,
            remaining: tree.len(),
        }
    }

    fn next(&mut self) -> Option<NodeRef<'a, K, V>> {
        let id = self.next?;
        self.next = self.tree.neighbour(id, self.direction);
        self.remaining -= 1;
        Some(NodeRef::new(self.tree, id))
    }
}

/// Iterator returned by [`Tree::in_order`].
pub struct InOrder<'a, K, V> {
    walk: Walk<'a, K, V>,
}

impl<'a, K, V> Iterator for InOrder<'a, K, V> {
    type Item = NodeRef<'a, K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        self.walk.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.walk.remaining, Some(self.walk.remaining))
    }
}

impl<K, V> ExactSizeIterator for InOrder<'_, K, V> {}
impl<K, V> FusedIterator for InOrder<'_, K, V> {}

/// Iterator returned by [`Tree::reverse_in_order`].
pub struct ReverseInOrder<'a, K, V> {
    walk: Walk<'a, K, V>,
}

impl<'a, K, V> Iterator for ReverseInOrder<'a, K, V> {
    type Item = NodeRef<'a, K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        self.walk.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.walk.remaining, Some(self.walk.remaining))
    }
}

impl<K, V> ExactSizeIterator for ReverseInOrder<'_, K, V> {}
impl<K, V> FusedIterator for ReverseInOrder<'_, K, V> {}

/// Iterator returned by [`Tree::pre_order`].
pub struct PreOrder<'a, K, V> {
    tree: &'a Tree<K, V>,
    stack: Vec<NodeId>,
}

impl<'a, K, V> Iterator for PreOrder<'a, K, V> {
    type Item = NodeRef<'a, K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = &self.tree.arena[id];
        // Right first so the left subtree comes off the stack first.
        self.stack.extend(node.right);
        self.stack.extend(node.left);
        Some(NodeRef::new(self.tree, id))
    }
}

impl<K, V> FusedIterator for PreOrder<'_, K, V> {}

/// Iterator returned by [`Tree::post_order`].
pub struct PostOrder<'a, K, V> {
    tree: &'a Tree<K, V>,
    /// Nodes still to visit, flagged once their children have been pushed.
    stack: Vec<(NodeId, bool)>,
}

impl<'a, K, V> Iterator for PostOrder<'a, K, V> {
    type Item = NodeRef<'a, K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (id, expanded) = self.stack.pop()?;
            if expanded {
                return Some(NodeRef::new(self.tree, id));
            }
            let node = &self.tree.arena[id];
            self.stack.push((id, true));
            self.stack.extend(node.right.map(|right| (right, false)));
            self.stack.extend(node.left.map(|left| (left, false)));
        }
    }
}

impl<K, V> FusedIterator for PostOrder<'_, K, V> {}

/// Iterator returned by [`Tree::iter`].
pub struct Iter<'a, K, V> {
    inner: InOrder<'a, K, V>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|node| (node.key(), node.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<'a, K, V> IntoIterator for &'a Tree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
