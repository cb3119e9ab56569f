//! An in-memory ordered index built on a plain Binary Search Tree (BST) with
//! parent links, mostly for educational purposes.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. Every `Node` stores a key, a
//! value, and links to its parent and up to two children. The most important
//! invariants of this BST are:
//!
//! 1. For every `Node`, all the `Node`s in its left subtree have a key no
//!    greater than its own key.
//! 2. For every `Node`, all the `Node`s in its right subtree have a key no
//!    less than its own key.
//! 3. Every child's parent link points back at the node it hangs from.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Duplicate keys are allowed. Insertion sends a key equal to an existing one
//! into the right subtree; only a later rotation can move it to the left.
//!
//! Searching takes `O(height)` (where `height` is the longest path from the
//! root `Node` to a leaf `Node`). This tree does not rebalance itself. Instead
//! [`Tree::insert`] occasionally inserts the new key at the root, which keeps
//! the expected height logarithmic as long as the input isn't adversarial.
//!
//! ## Nodes and handles
//!
//! Nodes live in an arena owned by the [`Tree`] and refer to each other by
//! [`NodeId`]. A `NodeId` stays valid until its node is deleted, no matter how
//! the tree is restructured in between. [`NodeRef`] is a borrowed view of a
//! node that can also navigate to its relatives.
//!
//! # Examples
//!
//! ```
//! use bst_index::Tree;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut tree = Tree::new();
//!
//! for key in [5, 3, 8, 1, 4, 7, 9] {
//!     tree.insert(key, key * 10, &mut rng);
//! }
//!
//! assert_eq!(tree.find(&4), Some(&40));
//! assert_eq!(tree.rank(&7), 4);
//!
//! let removed = tree.delete_key(&5).unwrap();
//! assert_eq!(removed.into_parts(), (5, 50));
//! assert_eq!(tree.keys().copied().collect::<Vec<_>>(), [1, 3, 4, 7, 8, 9]);
//! ```

#![deny(missing_docs)]

mod arena;
pub mod error;
pub mod node;
pub mod tree;
mod util;

#[cfg(test)]
mod test;

pub use error::{Error, ErrorKind, Result};
pub use node::{Node, NodeId, NodeRef};
pub use tree::Tree;
pub use util::Side;
