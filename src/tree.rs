//! A mutable, unbalanced BST whose nodes know their parents.
//!
//! # Examples
//!
//! ```
//! use linked_bst::{Error, Tree};
//!
//! let mut tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert_eq!(tree.get(&1), Err(Error::KeyNotFound));
//!
//! tree.insert(1, 2).unwrap();
//! assert_eq!(tree.get(&1), Ok(&2));
//!
//! // Keys are unique. Inserting an existing key leaves the tree as it was.
//! assert_eq!(tree.insert(1, 3), Err(Error::DuplicateKey));
//! assert_eq!(tree.get(&1), Ok(&2));
//!
//! // Removing a node returns its value.
//! assert_eq!(tree.remove(&1), Ok(2));
//! assert_eq!(tree.get(&1), Err(Error::KeyNotFound));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Index;
use std::ptr::{self, NonNull};

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::iter::{Inorder, Order, Postorder, Preorder, Traversal};
use crate::node::{Link, Node};

/// A Binary Search Tree mapping unique, ordered keys to values. This can be used for inserting,
/// finding, and removing keys and values, and for walking the entries in any of the three
/// depth-first orders.
///
/// The tree does not balance itself, so the cost of every operation is proportional to the height
/// of the tree: logarithmic for random insertion orders, linear for sorted ones.
pub struct Tree<K, V> {
    // This is a `Link` instead of an `Option<Box<Node>>` so that it can be moved around with the
    // `Tree` without the children's parent pointers breaking.
    root: Link<K, V>,
    size: usize,
    marker: PhantomData<Box<Node<K, V>>>,
}

/// How many key comparisons a search needed, as reported by [`Tree::find_comparison`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparisons {
    /// Comparisons made scanning the keys one by one in preorder.
    pub linear: usize,
    /// Comparisons made descending the tree from the root.
    pub tree: usize,
}

impl<K, V> Default for Tree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Drop for Tree<K, V> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K, V> Clone for Tree<K, V>
where
    K: Clone,
    V: Clone,
{
    fn clone(&self) -> Self {
        let mut root = Link::none();
        // Each entry is a node to copy, the slot its copy goes into, and the copy's parent.
        let mut pending: Vec<(&Node<K, V>, *mut Link<K, V>, Link<K, V>)> = Vec::new();
        if let Some(node) = self.root() {
            pending.push((node, &mut root, Link::none()));
        }

        while let Some((node, slot, parent)) = pending.pop() {
            let copy = Node::alloc(node.key().clone(), node.value().clone(), parent);
            // SAFETY: `slot` is either `root`, which outlives this loop, or a child link inside a
            // copy allocated by an earlier iteration that nothing else references yet.
            unsafe { *slot = Link(Some(copy)) };

            if let Some(left) = node.left() {
                // SAFETY: `copy` was just allocated and is live.
                let slot = unsafe { ptr::addr_of_mut!((*copy.as_ptr()).left) };
                pending.push((left, slot, Link(Some(copy))));
            }
            if let Some(right) = node.right() {
                // SAFETY: As above.
                let slot = unsafe { ptr::addr_of_mut!((*copy.as_ptr()).right) };
                pending.push((right, slot, Link(Some(copy))));
            }
        }

        Self {
            root,
            size: self.size,
            marker: PhantomData,
        }
    }
}

impl<K, V> fmt::Debug for Tree<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.inorder().map(|n| (n.key(), n.value())))
            .finish()
    }
}

impl<K, V> Index<&K> for Tree<K, V>
where
    K: Ord,
{
    type Output = V;

    /// Returns the value stored for `key`.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the tree.
    fn index(&self, key: &K) -> &V {
        match self.get(key) {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a Tree<K, V> {
    type Item = &'a Node<K, V>;
    type IntoIter = Preorder<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> Tree<K, V> {
    /// Generate a new, empty `Tree`.
    pub fn new() -> Self {
        Self {
            root: Link::none(),
            size: 0,
            marker: PhantomData,
        }
    }

    /// Generate a `Tree` holding a single entry at its root.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::Tree;
    ///
    /// let tree = Tree::with_root(4, "four");
    ///
    /// assert_eq!(tree.len(), 1);
    /// assert_eq!(tree.root().map(|n| *n.key()), Some(4));
    /// ```
    pub fn with_root(key: K, value: V) -> Self {
        Self {
            root: Link(Some(Node::alloc(key, value, Link::none()))),
            size: 1,
            marker: PhantomData,
        }
    }

    /// Inserts the given value into the tree stored at the given key. If the key is already
    /// present, [`Error::DuplicateKey`] is returned and the tree is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::{Error, Tree};
    ///
    /// let mut tree = Tree::new();
    ///
    /// assert_eq!(tree.insert(1, 2), Ok(()));
    /// assert_eq!(tree.insert(1, 3), Err(Error::DuplicateKey));
    /// assert_eq!(tree.get(&1), Ok(&2));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Result<()>
    where
        K: Ord,
    {
        let Some(mut current) = self.root.0 else {
            self.root = Link(Some(Node::alloc(key, value, Link::none())));
            self.size = 1;
            trace!("inserted new root");
            return Ok(());
        };

        let mut depth = 1;
        loop {
            // SAFETY: `current` is a live node of this tree and we hold `&mut self`, so this is the
            // only reference into the tree.
            let node = unsafe { &mut *current.as_ptr() };
            let slot = match key.cmp(node.key()) {
                Ordering::Less => &mut node.left,
                Ordering::Equal => {
                    debug!("rejected insert of a key that is already present");
                    return Err(Error::DuplicateKey);
                }
                Ordering::Greater => &mut node.right,
            };

            match slot.0 {
                Some(child) => {
                    current = child;
                    depth += 1;
                }
                None => {
                    *slot = Link(Some(Node::alloc(key, value, Link(Some(current)))));
                    break;
                }
            }
        }
        self.size += 1;
        trace!("inserted new leaf at depth {depth}, size is now {}", self.size);

        if cfg!(debug_assertions) {
            // SAFETY: `current` is the live parent of the node we just inserted.
            let parent = unsafe { current.as_ref() };
            if let Some(left) = parent.left() {
                assert!(parent.key() > left.key());
            }
            if let Some(right) = parent.right() {
                assert!(parent.key() < right.key());
            }
        }

        Ok(())
    }

    /// Finds the node holding the given key. If no node has the key, [`Error::KeyNotFound`] is
    /// returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::{Error, Tree};
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1, 2).unwrap();
    ///
    /// let node = tree.find(&1).unwrap();
    /// assert_eq!((node.key(), node.value()), (&1, &2));
    /// assert!(tree.find(&42).is_err());
    /// ```
    pub fn find(&self, key: &K) -> Result<&Node<K, V>>
    where
        K: Ord,
    {
        self.search(key).0.ok_or(Error::KeyNotFound)
    }

    /// Finds the value associated with the given key.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::{Error, Tree};
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1, 2).unwrap();
    ///
    /// assert_eq!(tree.get(&1), Ok(&2));
    /// assert_eq!(tree.get(&42), Err(Error::KeyNotFound));
    /// ```
    pub fn get(&self, key: &K) -> Result<&V>
    where
        K: Ord,
    {
        self.find(key).map(Node::value)
    }

    /// Finds the value associated with the given key for modification. The shape of the tree is
    /// never affected.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1, 2).unwrap();
    ///
    /// *tree.find_mut(&1).unwrap() += 40;
    /// assert_eq!(tree[&1], 42);
    /// ```
    pub fn find_mut(&mut self, key: &K) -> Result<&mut V>
    where
        K: Ord,
    {
        match self.search_mut(key) {
            // SAFETY: `search_mut` returns a live node of this tree with the write permission it
            // was allocated with, and the returned reference borrows `self` mutably so it is
            // unique.
            Some(node) => Ok(unsafe { &mut *node.as_ptr() }.value_mut()),
            None => Err(Error::KeyNotFound),
        }
    }

    /// Whether the tree holds the given key.
    pub fn contains_key(&self, key: &K) -> bool
    where
        K: Ord,
    {
        self.search(key).0.is_some()
    }

    /// Removes the node holding the given key from the tree and returns its value. If the tree
    /// does not contain the key, [`Error::KeyNotFound`] is returned and nothing changes.
    ///
    /// A node with two children is replaced by its in-order successor (the smallest key of its
    /// right subtree): the successor's entry moves into the removed node's place and the
    /// successor's old node is unlinked instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::{Error, Tree};
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1, 2).unwrap();
    ///
    /// assert_eq!(tree.remove(&1), Ok(2));
    /// assert_eq!(tree.remove(&1), Err(Error::KeyNotFound));
    /// ```
    pub fn remove(&mut self, key: &K) -> Result<V>
    where
        K: Ord,
    {
        let Some(target) = self.search_mut(key) else {
            debug!("rejected removal of a key that is not present");
            return Err(Error::KeyNotFound);
        };

        // SAFETY: `search_mut` returned a live node and we hold `&mut self`. The links are copied
        // out without creating a reference to the node.
        let children = unsafe { ((*target.as_ptr()).left.0, (*target.as_ptr()).right.0) };
        let successor = match children {
            // SAFETY: `right` is a live child of `target`.
            (Some(_), Some(right)) => unsafe { Self::leftmost_mut(right) },
            _ => {
                trace!("removing node with at most one child");
                // SAFETY: Without two children `target` satisfies `unlink`'s contract.
                let (_, value) = unsafe { self.unlink(target) };
                return Ok(value);
            }
        };

        trace!("removing node with two children, promoting its in-order successor");
        // SAFETY: The successor is the leftmost node of a subtree so it has no left child. It is a
        // different node from `target`, which stays live.
        let (successor_key, successor_value) = unsafe { self.unlink(successor) };
        let (_, value) =
            unsafe { &mut *target.as_ptr() }.replace_entry(successor_key, successor_value);

        Ok(value)
    }

    /// Returns the node with the smallest key, or `None` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::Tree;
    ///
    /// let mut tree = Tree::new();
    /// assert!(tree.return_min_key().is_none());
    ///
    /// tree.insert(5, ()).unwrap();
    /// tree.insert(2, ()).unwrap();
    /// tree.insert(7, ()).unwrap();
    /// assert_eq!(tree.return_min_key().map(|n| *n.key()), Some(2));
    /// ```
    pub fn return_min_key(&self) -> Option<&Node<K, V>> {
        self.root().map(Node::leftmost)
    }

    /// Same as [`Tree::return_min_key`].
    pub fn min(&self) -> Option<&Node<K, V>> {
        self.return_min_key()
    }

    /// The number of entries in the tree.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Same as [`Tree::len`].
    pub fn size(&self) -> usize {
        self.len()
    }

    /// Whether the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The root node, or `None` if the tree is empty.
    pub fn root(&self) -> Option<&Node<K, V>> {
        self.root.node()
    }

    /// Removes every entry from the tree.
    pub fn clear(&mut self) {
        // Walk with an explicit stack so dropping a degenerate tree can't overflow.
        let mut pending: Vec<NonNull<Node<K, V>>> = self.root.take().0.into_iter().collect();
        while let Some(node) = pending.pop() {
            // SAFETY: Every node is reachable from exactly one owning link. We took the root link
            // above and take each child link below before freeing its parent, so each node is
            // freed once and never visited again.
            unsafe {
                let node = &mut *node.as_ptr();
                pending.extend(node.left.take().0);
                pending.extend(node.right.take().0);
            }
            unsafe { Node::free(node) };
        }
        self.size = 0;
    }

    /// Iterates over the nodes in preorder. See [`Tree::preorder`].
    pub fn iter(&self) -> Preorder<'_, K, V> {
        self.preorder()
    }

    /// Iterates over the nodes in ascending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::Tree;
    ///
    /// let mut tree = Tree::new();
    /// for key in [2, 3, 1] {
    ///     tree.insert(key, ()).unwrap();
    /// }
    ///
    /// let keys: Vec<_> = tree.inorder().map(|n| *n.key()).collect();
    /// assert_eq!(keys, [1, 2, 3]);
    /// ```
    pub fn inorder(&self) -> Inorder<'_, K, V> {
        Inorder::new(self.root())
    }

    /// Iterates over the nodes, visiting each node before its left and then its right subtree.
    pub fn preorder(&self) -> Preorder<'_, K, V> {
        Preorder::new(self.root())
    }

    /// Iterates over the nodes, visiting the left and then the right subtree before each node.
    pub fn postorder(&self) -> Postorder<'_, K, V> {
        Postorder::new(self.root())
    }

    /// Iterates over the nodes in the given order.
    pub fn traverse(&self, order: Order) -> Traversal<'_, K, V> {
        Traversal::new(self.root(), order)
    }

    /// Checks every structural invariant of the tree:
    ///
    /// 1. Every key lies strictly between the bounds set by its ancestors, so all keys in a left
    ///    subtree are smaller and all keys in a right subtree are larger than the subtree's parent.
    /// 2. Every child points back at its parent and the root has no parent.
    /// 3. The maintained size matches the number of reachable nodes.
    ///
    /// This walks the whole tree and is meant for tests and debugging.
    pub fn is_valid(&self) -> bool
    where
        K: Ord,
    {
        let Some(root) = self.root() else {
            return self.size == 0;
        };
        if root.parent.is_some() {
            return false;
        }

        let mut count = 0;
        // Each entry is a node with its exclusive lower and upper key bounds.
        let mut pending: Vec<(&Node<K, V>, Option<&K>, Option<&K>)> = vec![(root, None, None)];
        while let Some((node, lower, upper)) = pending.pop() {
            count += 1;
            if lower.is_some_and(|lower| node.key() <= lower)
                || upper.is_some_and(|upper| node.key() >= upper)
            {
                return false;
            }

            for child in [node.left(), node.right()].into_iter().flatten() {
                if !child.parent().is_some_and(|parent| ptr::eq(parent, node)) {
                    return false;
                }
            }

            if let Some(left) = node.left() {
                pending.push((left, lower, Some(node.key())));
            }
            if let Some(right) = node.right() {
                pending.push((right, Some(node.key()), upper));
            }
        }

        count == self.size
    }

    /// Reports how many key comparisons finding `key` takes when scanning the keys one by one in
    /// preorder versus descending the tree. When the key is absent both sides count every
    /// comparison made before giving up.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::{Comparisons, Tree};
    ///
    /// let mut tree = Tree::new();
    /// for key in [5, 3, 8, 1, 4, 7, 9] {
    ///     tree.insert(key, ()).unwrap();
    /// }
    ///
    /// // Preorder is 5, 3, 1, 4, 8, 7, 9 and the search path is 5, 8, 9.
    /// assert_eq!(tree.find_comparison(&9), Comparisons { linear: 7, tree: 3 });
    /// ```
    pub fn find_comparison(&self, key: &K) -> Comparisons
    where
        K: Ord,
    {
        let mut linear = 0;
        for node in self.preorder() {
            linear += 1;
            if node.key() == key {
                break;
            }
        }

        Comparisons {
            linear,
            tree: self.search(key).1,
        }
    }

    /// Descends from the root looking for `key`. Returns the node, if any, along with the number
    /// of nodes compared against.
    fn search(&self, key: &K) -> (Option<&Node<K, V>>, usize)
    where
        K: Ord,
    {
        let mut comparisons = 0;
        let mut current = self.root();
        while let Some(node) = current {
            comparisons += 1;
            current = match key.cmp(node.key()) {
                Ordering::Less => node.left(),
                Ordering::Equal => return (Some(node), comparisons),
                Ordering::Greater => node.right(),
            };
        }

        (None, comparisons)
    }

    /// Like [`Tree::search`] but for callers that go on to write to the node. The pointers are
    /// copied straight out of the links, never rebuilt from a `&Node`, so they keep write access.
    fn search_mut(&mut self, key: &K) -> Option<NonNull<Node<K, V>>>
    where
        K: Ord,
    {
        let mut current = self.root.0;
        while let Some(ptr) = current {
            // SAFETY: `ptr` is a live node of this tree and we hold `&mut self`. The shared
            // reference is dropped before anything writes through `ptr`.
            let node = unsafe { ptr.as_ref() };
            current = match key.cmp(node.key()) {
                Ordering::Less => node.left.0,
                Ordering::Equal => return Some(ptr),
                Ordering::Greater => node.right.0,
            };
        }

        None
    }

    /// Follows raw left links from `node` down to the smallest key of its subtree.
    ///
    /// # Safety
    ///
    /// `node` must be a live node of this tree and the caller must hold `&mut self`.
    unsafe fn leftmost_mut(mut node: NonNull<Node<K, V>>) -> NonNull<Node<K, V>> {
        while let Some(left) = (*node.as_ptr()).left.0 {
            node = left;
        }

        node
    }

    /// Detaches `node` from the tree, moving its only child (if any) into its place, frees it,
    /// and returns its entry.
    ///
    /// # Safety
    ///
    /// `node` must be a live node of this tree with at most one child, and no reference to it may
    /// be used afterwards.
    unsafe fn unlink(&mut self, node: NonNull<Node<K, V>>) -> (K, V) {
        let removed = &mut *node.as_ptr();
        debug_assert!(!(removed.left.is_some() && removed.right.is_some()));

        let mut child = if removed.left.is_some() {
            removed.left.take()
        } else {
            removed.right.take()
        };
        let parent = removed.parent;
        if let Some(child) = child.node_mut() {
            child.parent = parent;
        }

        match parent.0 {
            None => self.root = child,
            Some(parent) => {
                let parent = &mut *parent.as_ptr();
                if parent.left.0 == Some(node) {
                    parent.left = child;
                } else {
                    parent.right = child;
                }
            }
        }
        self.size -= 1;

        Node::free(node)
    }
}
