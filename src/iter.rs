//! Lazy traversals over the nodes of a [`Tree`][crate::Tree].
//!
//! Every traversal keeps an explicit stack of pending nodes rather than recursing so that walking a
//! degenerate (list-shaped) tree costs heap memory instead of call stack. Each call to
//! [`Tree::inorder`][crate::Tree::inorder] and friends starts a fresh walk; the iterators borrow
//! the tree so it can't be modified while one is alive.

use std::iter::FusedIterator;

use crate::node::Node;

/// The classical depth-first visiting orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Left subtree, node, right subtree. Yields keys in ascending order.
    Inorder,
    /// Node, left subtree, right subtree.
    Preorder,
    /// Left subtree, right subtree, node.
    Postorder,
}

/// Iterator over nodes in ascending key order. Created by [`Tree::inorder`][crate::Tree::inorder].
pub struct Inorder<'a, K, V> {
    /// Nodes whose left subtree has been queued but that haven't been yielded yet.
    stack: Vec<&'a Node<K, V>>,
}

impl<'a, K, V> Inorder<'a, K, V> {
    pub(crate) fn new(root: Option<&'a Node<K, V>>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a Node<K, V>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left();
        }
    }
}

impl<'a, K, V> Iterator for Inorder<'a, K, V> {
    type Item = &'a Node<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right());
        Some(node)
    }
}

impl<K, V> FusedIterator for Inorder<'_, K, V> {}

/// Iterator visiting each node before its subtrees. Created by
/// [`Tree::preorder`][crate::Tree::preorder]; this is also the order of
/// [`Tree::iter`][crate::Tree::iter].
pub struct Preorder<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
}

impl<'a, K, V> Preorder<'a, K, V> {
    pub(crate) fn new(root: Option<&'a Node<K, V>>) -> Self {
        Self {
            stack: root.into_iter().collect(),
        }
    }
}

impl<'a, K, V> Iterator for Preorder<'a, K, V> {
    type Item = &'a Node<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Right first so that the left subtree is popped first.
        self.stack.extend(node.right());
        self.stack.extend(node.left());
        Some(node)
    }
}

impl<K, V> FusedIterator for Preorder<'_, K, V> {}

/// Iterator visiting each node after both of its subtrees. Created by
/// [`Tree::postorder`][crate::Tree::postorder].
pub struct Postorder<'a, K, V> {
    /// Pending nodes, flagged `true` once their children have been queued.
    stack: Vec<(&'a Node<K, V>, bool)>,
}

impl<'a, K, V> Postorder<'a, K, V> {
    pub(crate) fn new(root: Option<&'a Node<K, V>>) -> Self {
        Self {
            stack: root.map(|n| (n, false)).into_iter().collect(),
        }
    }
}

impl<'a, K, V> Iterator for Postorder<'a, K, V> {
    type Item = &'a Node<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (node, expanded) = self.stack.pop()?;
            if expanded {
                return Some(node);
            }

            self.stack.push((node, true));
            self.stack.extend(node.right().map(|n| (n, false)));
            self.stack.extend(node.left().map(|n| (n, false)));
        }
    }
}

impl<K, V> FusedIterator for Postorder<'_, K, V> {}

/// Any one of the three traversals, as picked by an [`Order`]. Created by
/// [`Tree::traverse`][crate::Tree::traverse].
pub enum Traversal<'a, K, V> {
    /// See [`Inorder`].
    Inorder(Inorder<'a, K, V>),
    /// See [`Preorder`].
    Preorder(Preorder<'a, K, V>),
    /// See [`Postorder`].
    Postorder(Postorder<'a, K, V>),
}

impl<'a, K, V> Traversal<'a, K, V> {
    pub(crate) fn new(root: Option<&'a Node<K, V>>, order: Order) -> Self {
        match order {
            Order::Inorder => Self::Inorder(Inorder::new(root)),
            Order::Preorder => Self::Preorder(Preorder::new(root)),
            Order::Postorder => Self::Postorder(Postorder::new(root)),
        }
    }
}

impl<'a, K, V> Iterator for Traversal<'a, K, V> {
    type Item = &'a Node<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Inorder(iter) => iter.next(),
            Self::Preorder(iter) => iter.next(),
            Self::Postorder(iter) => iter.next(),
        }
    }
}

impl<K, V> FusedIterator for Traversal<'_, K, V> {}
