//! This crate exposes an ordered key-value container built on a plain, unbalanced Binary Search
//! Tree (BST) whose nodes keep a pointer back to their parent.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` stores a key and
//! a value and will sometimes have child `Node`s. The most important
//! invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key less than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key greater than its own key.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf" or "external" nodes.
//!
//! Searching for a key takes `O(height)` where `height` is the longest path from the root `Node`
//! to a leaf `Node`. This tree makes no attempt to keep its height near `O(lg N)`, so inserting
//! keys in sorted order degrades it into a list. BSTs also naturally support sorted iteration by
//! visiting the left subtree, then the subtree root, then the right subtree; see [`Tree::inorder`].
//!
//! # Examples
//!
//! ```
//! use linked_bst::{Error, Tree};
//!
//! let mut tree = Tree::new();
//! for key in [5, 3, 8, 1, 4, 7, 9] {
//!     tree.insert(key, key.to_string()).unwrap();
//! }
//!
//! let keys: Vec<_> = tree.inorder().map(|n| *n.key()).collect();
//! assert_eq!(keys, [1, 3, 4, 5, 7, 8, 9]);
//!
//! // Removing the root promotes its in-order successor.
//! assert_eq!(tree.remove(&5), Ok("5".to_string()));
//! assert_eq!(tree.root().map(|n| *n.key()), Some(7));
//! assert_eq!(tree.get(&5), Err(Error::KeyNotFound));
//! assert!(tree.is_valid());
//! ```
//!
//! ## Concurrency
//!
//! A [`Tree`] is neither `Send` nor `Sync`; all access happens on one thread. Traversals borrow
//! the tree, so it can't be modified while one of them is being consumed.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

mod error;
pub mod iter;
mod node;
mod tree;

pub use error::{Error, Result};
pub use iter::Order;
pub use node::Node;
pub use tree::{Comparisons, Tree};
