//! Insertion.
//!
//! There are two ways to place a new node:
//!
//! * **tail insertion** walks down from the root and hangs the node off the
//!   first empty slot, as a leaf;
//! * **root insertion** does the same and then rotates the node up, one level
//!   at a time, until it is the root.
//!
//! Inserting keys in sorted order with tail insertion alone builds a chain.
//! [`Tree::insert`] mixes the two: the new node becomes the root with
//! probability `1 / (n + 1)` for a tree of `n` nodes, which is exactly the
//! chance that the newest of `n + 1` keys would have ended up as the root had
//! all of them arrived in random order. The expected height then stays
//! logarithmic for most inputs. This is a heuristic, not a balance guarantee.

use rand::Rng;

use crate::node::{Node, NodeId};
use crate::tree::Tree;
use crate::util::Side;

impl<K, V> Tree<K, V>
where
    K: Ord,
{
    /// Inserts `key` and `value`, choosing between [`Tree::root_insert`] and
    /// [`Tree::tail_insert`] at random. Returns the new node's handle.
    ///
    /// Keys need not be unique: an equal key is inserted into the right
    /// subtree of the existing one.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_index::Tree;
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let mut rng = StdRng::seed_from_u64(7);
    /// let mut tree = Tree::new();
    /// for key in 0..100 {
    ///     tree.insert(key, key.to_string(), &mut rng);
    /// }
    ///
    /// assert_eq!(tree.len(), 100);
    /// assert_eq!(tree.find(&42).map(String::as_str), Some("42"));
    /// ```
    pub fn insert<R>(&mut self, key: K, value: V, rng: &mut R) -> NodeId
    where
        R: Rng + ?Sized,
    {
        self.insert_node(Node::new(key, value), rng)
    }

    /// Like [`Tree::insert`] but takes a ready-made node, e.g. one returned by
    /// [`Tree::delete`]. Any links the node carries are discarded.
    pub fn insert_node<R>(&mut self, node: Node<K, V>, rng: &mut R) -> NodeId
    where
        R: Rng + ?Sized,
    {
        if rng.random_range(0..=self.len()) == 0 {
            tracing::trace!(len = self.len(), "randomized insert chose root insertion");
            self.root_insert_node(node)
        } else {
            self.tail_insert_node(node)
        }
    }

    /// Randomized insert of every pair yielded by `entries`.
    pub fn insert_many<I, R>(&mut self, entries: I, rng: &mut R)
    where
        I: IntoIterator<Item = (K, V)>,
        R: Rng + ?Sized,
    {
        for (key, value) in entries {
            self.insert(key, value, rng);
        }
    }

    /// Inserts a new leaf. Returns its handle.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_index::Tree;
    ///
    /// let mut tree = Tree::new();
    /// let root = tree.tail_insert(2, "two");
    /// let leaf = tree.tail_insert(1, "one");
    ///
    /// assert!(tree.is_root(root));
    /// assert_eq!(tree.get(leaf).unwrap().parent().map(|n| n.id()), Some(root));
    /// ```
    pub fn tail_insert(&mut self, key: K, value: V) -> NodeId {
        self.tail_insert_node(Node::new(key, value))
    }

    /// Like [`Tree::tail_insert`] but takes a ready-made node. Any links the
    /// node carries are discarded.
    pub fn tail_insert_node(&mut self, mut node: Node<K, V>) -> NodeId {
        node.reset();
        let Some(mut current) = self.root else {
            return self.init_root(node);
        };

        loop {
            let side = Side::of(node.key(), self.arena[current].key());
            match self.arena[current].child(side) {
                Some(child) => current = child,
                None => {
                    node.parent = Some(current);
                    let id = self.arena.insert(node);
                    self.arena[current].set_child(side, Some(id));
                    tracing::trace!(node = ?id, parent = ?current, %side, "attached leaf");

                    if cfg!(debug_assertions) {
                        let parent = &self.arena[current];
                        let child = &self.arena[id];
                        match side {
                            Side::Left => assert!(child.key() < parent.key()),
                            Side::Right => assert!(child.key() >= parent.key()),
                        }
                    }
                    return id;
                }
            }
        }
    }

    /// Inserts a new node and makes it the root of the whole tree. Returns its
    /// handle.
    ///
    /// # Examples
    ///
    /// ```
    /// use bst_index::Tree;
    ///
    /// let mut tree = Tree::new();
    /// for key in [5, 3, 8] {
    ///     tree.tail_insert(key, ());
    /// }
    /// let ten = tree.root_insert(10, ());
    ///
    /// assert!(tree.is_root(ten));
    /// assert_eq!(tree.keys().copied().collect::<Vec<_>>(), [3, 5, 8, 10]);
    /// ```
    pub fn root_insert(&mut self, key: K, value: V) -> NodeId {
        self.root_insert_node(Node::new(key, value))
    }

    /// Like [`Tree::root_insert`] but takes a ready-made node. Any links the
    /// node carries are discarded.
    pub fn root_insert_node(&mut self, node: Node<K, V>) -> NodeId {
        let id = self.tail_insert_node(node);

        // Each rotation lifts the new node one level, with its old parent
        // becoming its child on the opposite side.
        while let Some(parent) = self.arena[id].parent {
            let lifted = match self.side_in(parent, id) {
                Side::Left => self.rotate_unchecked(parent, Side::Right),
                Side::Right => self.rotate_unchecked(parent, Side::Left),
            };
            debug_assert_eq!(lifted, id);
        }
        debug_assert!(self.is_root(id));
        id
    }

    fn init_root(&mut self, node: Node<K, V>) -> NodeId {
        debug_assert!(self.root.is_none());
        let id = self.arena.insert(node);
        self.root = Some(id);
        tracing::trace!(node = ?id, "initialised root");
        id
    }
}

impl<K, V> Extend<(K, V)> for Tree<K, V>
where
    K: Ord,
{
    /// Tail-inserts every pair, in order.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, entries: I) {
        for (key, value) in entries {
            self.tail_insert(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Tree<K, V>
where
    K: Ord,
{
    /// Tail-inserts every pair, in order.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(entries: I) -> Self {
        let mut tree = Tree::new();
        tree.extend(entries);
        tree
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::tree::tests::{keys, scenario_tree};

    #[test]
    fn tail_insert_builds_expected_shape() {
        let tree = scenario_tree();
        let root = tree.root().unwrap();
        assert_eq!(*root.key(), 5);
        assert_eq!(root.left().map(|n| *n.key()), Some(3));
        assert_eq!(root.right().map(|n| *n.key()), Some(8));
        assert_eq!(tree.len(), 7);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn tail_insert_sends_ties_right() {
        let mut tree = Tree::new();
        let first = tree.tail_insert(1, "first");
        let second = tree.tail_insert(1, "second");

        let first = tree.get(first).unwrap();
        assert_eq!(first.right().map(|n| n.id()), Some(second));
        assert!(first.left().is_none());
        // Search stops at the first match from the top.
        assert_eq!(tree.find(&1), Some(&"first"));
    }

    #[test]
    fn root_insert_makes_new_root() {
        let mut tree = Tree::new();
        for key in [5, 3, 8] {
            tree.tail_insert(key, key);
        }
        let ten = tree.root_insert(10, 10);

        assert!(tree.is_root(ten));
        assert_eq!(tree.len(), 4);
        assert_eq!(keys(&tree), [3, 5, 8, 10]);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn root_insert_into_middle() {
        let mut tree = scenario_tree();
        let six = tree.root_insert(6, 60);

        assert!(tree.is_root(six));
        let root = tree.root().unwrap();
        assert_eq!(root.left().map(|n| *n.key()), Some(5));
        assert_eq!(root.right().map(|n| *n.key()), Some(8));
        assert_eq!(tree.search(&8).unwrap().left().map(|n| *n.key()), Some(7));
        assert_eq!(keys(&tree), [1, 3, 4, 5, 6, 7, 8, 9]);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn root_insert_into_empty_tree() {
        let mut tree = Tree::new();
        let id = tree.root_insert(1, ());
        assert!(tree.is_root(id));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn root_insert_every_key() {
        let mut tree = Tree::new();
        for key in [4, 2, 6, 1, 3, 5, 7, 0, 8] {
            let id = tree.root_insert(key, ());
            assert!(tree.is_root(id));
            tree.check_invariants().unwrap();
        }
        assert_eq!(keys(&tree), [0, 1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn reinserting_a_deleted_node() {
        let mut tree = scenario_tree();
        let node = tree.delete_key(&8).unwrap();
        let id = tree.tail_insert_node(node);

        assert_eq!(*tree.get(id).unwrap().key(), 8);
        assert_eq!(tree.find(&8), Some(&80));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn randomized_insert_keeps_sorted_input_shallow() {
        let mut rng = StdRng::seed_from_u64(0xB57);
        let mut tree = Tree::new();
        for key in 0..2000 {
            tree.insert(key, (), &mut rng);
        }
        tree.check_invariants().unwrap();
        assert_eq!(tree.len(), 2000);
        // Tail insertion alone would give height 1999.
        assert!(tree.height() < 1999, "height {}", tree.height());
    }

    /// An RNG that always draws zero, forcing root insertion.
    struct Zero;

    impl rand::RngCore for Zero {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }
    }

    #[test]
    fn randomized_insert_uses_both_strategies() {
        let mut tree = scenario_tree();
        let id = tree.insert(6, 60, &mut Zero);
        assert!(tree.is_root(id));

        // A seeded RNG eventually picks tail insertion for a non-empty tree.
        let mut rng = StdRng::seed_from_u64(1);
        let tail_inserted = (10..40).any(|key| {
            let id = tree.insert(key, key, &mut rng);
            !tree.is_root(id)
        });
        assert!(tail_inserted);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn insert_many_and_collect() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut tree = Tree::new();
        tree.insert_many((0..50).rev().map(|k| (k, k)), &mut rng);
        assert_eq!(keys(&tree), (0..50).collect::<Vec<_>>());

        let collected: Tree<i32, i32> = (0..5).map(|k| (k, k)).collect();
        assert_eq!(keys(&collected), [0, 1, 2, 3, 4]);
        assert_eq!(collected.height(), 4);
    }
}
