//! The tree itself: lookups, order statistics and navigation.
//!
//! Structural changes live in the submodules: [`insert`] for the three
//! insertion strategies, [`rotate`] for rotations and [`delete`] for removal.
//! Traversals are in [`iter`].
//!
//! # Examples
//!
//! ```
//! use bst_index::Tree;
//!
//! let mut tree = Tree::new();
//! for key in [5, 3, 8, 1, 4, 7, 9] {
//!     tree.tail_insert(key, ());
//! }
//!
//! assert_eq!(tree.height(), 2);
//! assert_eq!(tree.rank(&7), 4);
//!
//! let five = tree.search(&5).unwrap();
//! assert_eq!(tree.successor(five.id()).unwrap().map(|n| *n.key()), Some(7));
//! ```

mod delete;
mod insert;
pub mod iter;
mod rotate;

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;

use crate::arena::Arena;
use crate::error::{Error, Result};
use crate::node::{NodeId, NodeRef};
use crate::util::Side;

/// A binary search tree with parent links.
///
/// Keys need not be unique. A new key that compares equal to an existing one
/// is placed in that node's right subtree. `V` defaults to `()` for trees that
/// only index keys.
pub struct Tree<K, V = ()> {
    pub(crate) arena: Arena<K, V>,
    root: Option<NodeId>,
}

impl<K, V> Default for Tree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Clone for Tree<K, V>
where
    K: Clone,
    V: Clone,
{
    /// Handles into `self` can't be used with the clone. Look nodes up again by
    /// key instead.
    fn clone(&self) -> Self {
        let arena = self.arena.clone();
        let root = self.root.map(|root| arena.adopt(root));
        Self { arena, root }
    }
}

impl<K, V> fmt::Debug for Tree<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self).finish()
    }
}

impl<K, V> Tree<K, V> {
    /// Generate a new, empty `Tree`.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Generate a new, empty `Tree` with room for `capacity` nodes before it
    /// has to reallocate.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
            root: None,
        }
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// `true` if the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        debug_assert_eq!(self.root.is_none(), self.len() == 0);
        self.root.is_none()
    }

    /// The root node.
    pub fn root(&self) -> Option<NodeRef<'_, K, V>> {
        self.root.map(|id| NodeRef::new(self, id))
    }

    /// `true` if `id` is the current root.
    pub fn is_root(&self, id: NodeId) -> bool {
        self.root == Some(id)
    }

    /// Resolves a handle.
    ///
    /// # Errors
    ///
    /// [`Error::ForeignNode`] if another tree issued `id`, [`Error::NodeNotFound`]
    /// if the node has been removed.
    pub fn get(&self, id: NodeId) -> Result<NodeRef<'_, K, V>> {
        self.arena.check(id)?;
        Ok(NodeRef::new(self, id))
    }

    /// The value of the node behind `id`, mutably.
    ///
    /// # Errors
    ///
    /// As [`Tree::get`].
    pub fn value_mut(&mut self, id: NodeId) -> Result<&mut V> {
        self.arena.get_mut(id).map(|node| node.value_mut())
    }

    /// Removes every node. All outstanding handles go stale.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    /// The node with the smallest key.
    pub fn minimum(&self) -> Option<NodeRef<'_, K, V>> {
        self.root
            .map(|root| NodeRef::new(self, self.extreme(root, Side::Left)))
    }

    /// The node with the largest key.
    pub fn maximum(&self) -> Option<NodeRef<'_, K, V>> {
        self.root
            .map(|root| NodeRef::new(self, self.extreme(root, Side::Right)))
    }

    /// The node with the smallest key in the subtree rooted at `id`.
    ///
    /// # Errors
    ///
    /// As [`Tree::get`].
    pub fn minimum_of(&self, id: NodeId) -> Result<NodeRef<'_, K, V>> {
        self.arena.check(id)?;
        Ok(NodeRef::new(self, self.extreme(id, Side::Left)))
    }

    /// The node with the largest key in the subtree rooted at `id`.
    ///
    /// # Errors
    ///
    /// As [`Tree::get`].
    pub fn maximum_of(&self, id: NodeId) -> Result<NodeRef<'_, K, V>> {
        self.arena.check(id)?;
        Ok(NodeRef::new(self, self.extreme(id, Side::Right)))
    }

    /// The node that follows `id` in key order, or `None` if `id` is the
    /// maximum.
    ///
    /// # Errors
    ///
    /// As [`Tree::get`].
    pub fn successor(&self, id: NodeId) -> Result<Option<NodeRef<'_, K, V>>> {
        self.arena.check(id)?;
        Ok(self
            .neighbour(id, Side::Right)
            .map(|id| NodeRef::new(self, id)))
    }

    /// The node that precedes `id` in key order, or `None` if `id` is the
    /// minimum.
    ///
    /// # Errors
    ///
    /// As [`Tree::get`].
    pub fn predecessor(&self, id: NodeId) -> Result<Option<NodeRef<'_, K, V>>> {
        self.arena.check(id)?;
        Ok(self
            .neighbour(id, Side::Left)
            .map(|id| NodeRef::new(self, id)))
    }

    /// Number of edges on the longest path from the root to a leaf. Both the
    /// empty tree and a lone root have height 0.
    pub fn height(&self) -> usize {
        let Some(root) = self.root else {
            return 0;
        };

        let mut height = 0;
        let mut stack = vec![(root, 0)];
        while let Some((id, depth)) = stack.pop() {
            height = height.max(depth);
            let node = &self.arena[id];
            stack.extend(node.left.map(|left| (left, depth + 1)));
            stack.extend(node.right.map(|right| (right, depth + 1)));
        }
        height
    }

    /// Walks from `id` towards `side` for as long as there is a child there.
    fn extreme(&self, mut id: NodeId, side: Side) -> NodeId {
        while let Some(child) = self.arena[id].child(side) {
            id = child;
        }
        id
    }

    /// The in-order neighbour of `id` on `side`: the successor for
    /// [`Side::Right`], the predecessor for [`Side::Left`].
    pub(crate) fn neighbour(&self, id: NodeId, side: Side) -> Option<NodeId> {
        if let Some(child) = self.arena[id].child(side) {
            return Some(self.extreme(child, side.opposite()));
        }

        // Climb while we're coming up from the `side` child. The first
        // ancestor we reach from the other side is the neighbour.
        let mut current = id;
        let mut parent = self.arena[id].parent;
        while let Some(p) = parent {
            if self.arena[p].child(side) != Some(current) {
                break;
            }
            current = p;
            parent = self.arena[p].parent;
        }
        parent
    }

    /// Which child slot of `parent` holds `child`.
    fn side_in(&self, parent: NodeId, child: NodeId) -> Side {
        if self.arena[parent].left == Some(child) {
            Side::Left
        } else {
            debug_assert_eq!(self.arena[parent].right, Some(child));
            Side::Right
        }
    }

    /// Makes whatever pointed down at `old` (its parent's child slot, or the
    /// root) point at `new` instead. `old`'s own links are left alone.
    fn replace_in_parent(&mut self, old: NodeId, new: Option<NodeId>) {
        match self.arena[old].parent {
            Some(parent) => {
                let side = self.side_in(parent, old);
                self.arena[parent].set_child(side, new);
            }
            None => self.root = new,
        }
    }
}

impl<K, V> Tree<K, V>
where
    K: Ord,
{
    /// Finds a node with the given key by walking down from the root. If
    /// several nodes share the key, the one closest to the root is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_index::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.tail_insert("b", 2);
    ///
    /// assert_eq!(tree.search("b").map(|n| *n.value()), Some(2));
    /// assert!(tree.search("z").is_none());
    /// ```
    pub fn search<Q>(&self, key: &Q) -> Option<NodeRef<'_, K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search_below(key, self.root)
            .map(|id| NodeRef::new(self, id))
    }

    /// Same as [`Tree::search`] but written recursively.
    pub fn search_recursive<Q>(&self, key: &Q) -> Option<NodeRef<'_, K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search_recursive_below(key, self.root)
            .map(|id| NodeRef::new(self, id))
    }

    /// Like [`Tree::search`], but only looks in the subtree rooted at `start`.
    ///
    /// # Errors
    ///
    /// As [`Tree::get`].
    pub fn search_from<Q>(&self, key: &Q, start: NodeId) -> Result<Option<NodeRef<'_, K, V>>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.arena.check(start)?;
        Ok(self
            .search_below(key, Some(start))
            .map(|id| NodeRef::new(self, id)))
    }

    /// `true` if some node has the given key.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(key).is_some()
    }

    /// Potentially finds the value associated with the given key. If no node
    /// has the key, `None` is returned.
    pub fn find<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(key).map(|node| node.value())
    }

    /// Mutable version of [`Tree::find`].
    pub fn find_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.search_below(key, self.root)?;
        Some(self.arena[id].value_mut())
    }

    /// Number of keys in the tree strictly less than `key`.
    ///
    /// Nodes carry no subtree sizes, so this walks the tree in order until it
    /// reaches the first key that isn't smaller. That's linear in the answer
    /// (plus the height) rather than logarithmic.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_index::Tree;
    ///
    /// let tree: Tree<i32> = [10, 20, 20, 30].into_iter().map(|k| (k, ())).collect();
    ///
    /// assert_eq!(tree.rank(&5), 0);
    /// assert_eq!(tree.rank(&20), 1);
    /// assert_eq!(tree.rank(&25), 3);
    /// assert_eq!(tree.rank(&99), 4);
    /// ```
    pub fn rank<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.in_order()
            .take_while(|node| node.key().borrow() < key)
            .count()
    }

    /// In debug builds, panics unless `id`'s key lies between its children's.
    pub(crate) fn debug_check_order(&self, id: NodeId) {
        if cfg!(debug_assertions) {
            let node = &self.arena[id];
            if let Some(left) = node.left {
                assert!(self.arena[left].key() <= node.key(), "{left:?} is out of order below {id:?}");
            }
            if let Some(right) = node.right {
                assert!(self.arena[right].key() >= node.key(), "{right:?} is out of order below {id:?}");
            }
        }
    }

    /// Checks every structural invariant:
    ///
    /// 1. an in-order walk yields keys in non-decreasing order,
    /// 2. every child's parent link points back at its parent and the root has
    ///    no parent,
    /// 3. there are no cycles,
    /// 4. [`Tree::len`] matches the number of reachable nodes.
    ///
    /// # Errors
    ///
    /// [`Error::Corrupted`] describing the first violation found.
    pub fn check_invariants(&self) -> Result<()> {
        let result = self.check_invariants_inner();
        if let Err(err) = &result {
            tracing::debug!(%err, "tree failed validation");
        }
        result
    }

    fn check_invariants_inner(&self) -> Result<()> {
        let corrupted = |msg: String| Err(Error::Corrupted(msg));

        let Some(root) = self.root else {
            if self.len() != 0 {
                return corrupted(format!("tree is empty but holds {} nodes", self.len()));
            }
            return Ok(());
        };
        let root_node = self.arena.get(root)?;
        if let Some(parent) = root_node.parent {
            return corrupted(format!("root {root:?} has parent {parent:?}"));
        }

        // Explicit-stack in-order walk. It follows child links only, so a
        // broken parent link can't send it in circles.
        let mut visited = 0;
        let mut previous: Option<&K> = None;
        let mut stack = Vec::new();
        let mut current = Some(root);
        while current.is_some() || !stack.is_empty() {
            while let Some(id) = current {
                if stack.len() >= self.len() {
                    return corrupted(format!("cycle detected below {id:?}"));
                }
                stack.push(id);
                current = self.arena.get(id)?.left;
            }

            let id = stack.pop().expect("loop condition ensures a node");
            let node = self.arena.get(id)?;
            visited += 1;
            if visited > self.len() {
                return corrupted(format!("reached more than {} nodes", self.len()));
            }

            for child in [node.left, node.right].into_iter().flatten() {
                let child_parent = self.arena.get(child)?.parent;
                if child_parent != Some(id) {
                    return corrupted(format!(
                        "{child:?} is a child of {id:?} but its parent link is {child_parent:?}"
                    ));
                }
            }

            if previous.is_some_and(|previous| previous > node.key()) {
                return corrupted(format!("{id:?} is out of order"));
            }
            previous = Some(node.key());
            current = node.right;
        }

        if visited != self.len() {
            return corrupted(format!(
                "{visited} nodes reachable from the root but the tree holds {}",
                self.len()
            ));
        }
        Ok(())
    }

    fn search_below<Q>(&self, key: &Q, mut current: Option<NodeId>) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        while let Some(id) = current {
            let node = &self.arena[id];
            current = match key.cmp(node.key().borrow()) {
                Ordering::Less => node.left,
                Ordering::Equal => return Some(id),
                Ordering::Greater => node.right,
            };
        }
        None
    }

    fn search_recursive_below<Q>(&self, key: &Q, current: Option<NodeId>) -> Option<NodeId>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = current?;
        let node = &self.arena[id];
        match key.cmp(node.key().borrow()) {
            Ordering::Less => self.search_recursive_below(key, node.left),
            Ordering::Equal => Some(id),
            Ordering::Greater => self.search_recursive_below(key, node.right),
        }
    }
}
