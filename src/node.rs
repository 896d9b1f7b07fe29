//! The storage unit of a [`Tree`][crate::Tree].
//!
//! A [`Node`] is a heap allocation addressed through a [`NonNull`] pointer so that it never moves
//! once created. Each node owns its two children and holds a non-owning pointer back to its parent.
//! Nodes are created and destroyed exclusively by the tree; callers only ever see shared
//! references handed out by lookups and traversals.

use std::fmt;
use std::ptr::NonNull;

/// A possibly-empty pointer to a [`Node`].
///
/// Whether a `Link` owns its target depends on where it is stored: the `left`/`right` links of a
/// node and the root link of a tree own their targets, `parent` links never do.
pub(crate) struct Link<K, V>(pub(crate) Option<NonNull<Node<K, V>>>);

impl<K, V> Clone for Link<K, V> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<K, V> Copy for Link<K, V> {}

impl<K, V> Link<K, V> {
    pub(crate) fn none() -> Self {
        Self(None)
    }

    pub(crate) fn is_some(&self) -> bool {
        self.0.is_some()
    }

    pub(crate) fn node(&self) -> Option<&Node<K, V>> {
        // SAFETY: A non-`None` link always points at a live node allocated by `Node::alloc`. Nodes
        // are only freed through `Node::free` after every link to them has been cleared, so this
        // can't dangle. Shared references only coexist with other shared references because all
        // topology changes go through `&mut Tree`.
        unsafe { self.0.as_ref().map(|ptr| ptr.as_ref()) }
    }

    pub(crate) fn node_mut(&mut self) -> Option<&mut Node<K, V>> {
        // SAFETY: See `Link::node`. Callers hold `&mut Tree` so no other reference into the tree
        // is alive.
        unsafe { self.0.as_mut().map(|ptr| ptr.as_mut()) }
    }

    pub(crate) fn take(&mut self) -> Self {
        Link(self.0.take())
    }
}

/// One key/value entry of a [`Tree`][crate::Tree] along with its position in the tree.
pub struct Node<K, V> {
    key: K,
    value: V,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
    pub(crate) parent: Link<K, V>,
}

impl<K, V> fmt::Debug for Node<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("left", &self.left())
            .field("right", &self.right())
            .finish()
    }
}

impl<K, V> Node<K, V> {
    /// Allocates a childless node hanging off `parent` and leaks it. The returned pointer must
    /// eventually be passed to [`Node::free`].
    pub(crate) fn alloc(key: K, value: V, parent: Link<K, V>) -> NonNull<Self> {
        NonNull::from(Box::leak(Box::new(Node {
            key,
            value,
            left: Link::none(),
            right: Link::none(),
            parent,
        })))
    }

    /// Reclaims a node allocated by [`Node::alloc`] and returns its entry. The node's children are
    /// not touched.
    ///
    /// # Safety
    ///
    /// `node` must have come from `Node::alloc`, must not have been freed yet, and nothing may
    /// dereference it afterwards.
    pub(crate) unsafe fn free(node: NonNull<Self>) -> (K, V) {
        let node = Box::from_raw(node.as_ptr());
        (node.key, node.value)
    }

    /// The key this node is sorted by.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The value stored alongside the key.
    pub fn value(&self) -> &V {
        &self.value
    }

    pub(crate) fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// Swaps this node's entry for the given one, handing back the old entry. The node keeps its
    /// place in the tree.
    pub(crate) fn replace_entry(&mut self, key: K, value: V) -> (K, V) {
        (
            std::mem::replace(&mut self.key, key),
            std::mem::replace(&mut self.value, value),
        )
    }

    /// The root of the left subtree, holding only smaller keys.
    pub fn left(&self) -> Option<&Self> {
        self.left.node()
    }

    /// The root of the right subtree, holding only larger keys.
    pub fn right(&self) -> Option<&Self> {
        self.right.node()
    }

    /// The node this one hangs from. `None` for the root.
    pub fn parent(&self) -> Option<&Self> {
        self.parent.node()
    }

    /// Number of ancestors of this node. The root has depth 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use linked_bst::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(5, "five").unwrap();
    /// tree.insert(3, "three").unwrap();
    /// tree.insert(4, "four").unwrap();
    ///
    /// assert_eq!(tree.find(&5).unwrap().depth(), 0);
    /// assert_eq!(tree.find(&4).unwrap().depth(), 2);
    /// ```
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self;
        while let Some(parent) = current.parent() {
            depth += 1;
            current = parent;
        }

        depth
    }

    /// Whether this node has at least one child.
    pub fn is_internal(&self) -> bool {
        self.left.is_some() || self.right.is_some()
    }

    /// Whether this node is a leaf.
    pub fn is_external(&self) -> bool {
        !self.is_internal()
    }

    /// Follows left children down to the smallest key of this subtree.
    pub(crate) fn leftmost(&self) -> &Self {
        let mut current = self;
        while let Some(left) = current.left() {
            current = left;
        }

        current
    }
}
