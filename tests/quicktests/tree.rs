use linked_bst::{Error, Node, Order, Tree};
use quickcheck_macros::quickcheck;

use std::collections::{BTreeMap, HashSet};

use crate::Op;

/// Applies a set of operations to a tree and a `BTreeMap`, checking the tree's invariants after
/// every step. Returns `false` as soon as the two disagree.
fn do_ops<K, V>(ops: &[Op<K, V>], bst: &mut Tree<K, V>, map: &mut BTreeMap<K, V>) -> bool
where
    K: Ord + Clone,
    V: PartialEq + Clone,
{
    for op in ops {
        let agrees = match op {
            Op::Insert(k, v) => {
                let result = bst.insert(k.clone(), v.clone());
                if map.contains_key(k) {
                    result == Err(Error::DuplicateKey)
                } else {
                    map.insert(k.clone(), v.clone());
                    result.is_ok()
                }
            }
            Op::Remove(k) => bst.remove(k) == map.remove(k).ok_or(Error::KeyNotFound),
        };

        if !agrees || !bst.is_valid() || bst.len() != map.len() {
            return false;
        }
        if !bst.inorder().map(Node::key).eq(map.keys()) {
            return false;
        }
    }

    true
}

fn keys(tree: &Tree<i8, i8>, order: Order) -> Vec<i8> {
    tree.traverse(order).map(|n| *n.key()).collect()
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8, i8>>) -> bool {
    let mut tree = Tree::new();
    let mut map = BTreeMap::new();

    do_ops(&ops, &mut tree, &mut map) && map.iter().all(|(key, value)| tree.get(key) == Ok(value))
}

#[quickcheck]
fn contains(xs: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        let _ = tree.insert(*x, *x);
    }

    xs.iter().all(|x| tree.get(x) == Ok(x))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        let _ = tree.insert(*x, *x);
    }
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| tree.find(x).err() == Some(Error::KeyNotFound))
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        let _ = tree.insert(*x, *x);
    }
    for delete in &deletes {
        let _ = tree.remove(delete);
    }

    let mut still_present = xs;
    still_present.retain(|x| !deletes.contains(x));

    tree.is_valid()
        && deletes.iter().all(|x| !tree.contains_key(x))
        && still_present.iter().all(|x| tree.contains_key(x))
}

#[quickcheck]
fn removal_drops_exactly_one_key(xs: Vec<i8>, pick: usize) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        let _ = tree.insert(*x, *x);
    }
    if tree.is_empty() {
        return true;
    }

    let before = keys(&tree, Order::Inorder);
    let removed = before[pick % before.len()];
    let expected: Vec<_> = before.iter().copied().filter(|k| *k != removed).collect();

    tree.remove(&removed) == Ok(removed)
        && keys(&tree, Order::Inorder) == expected
        && tree.len() == expected.len()
        && tree.is_valid()
}

#[quickcheck]
fn traversals_are_idempotent(xs: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        let _ = tree.insert(*x, ());
    }

    [Order::Inorder, Order::Preorder, Order::Postorder]
        .into_iter()
        .all(|order| {
            let first: Vec<_> = tree.traverse(order).map(|n| *n.key()).collect();
            let second: Vec<_> = tree.traverse(order).map(|n| *n.key()).collect();
            first == second && first.len() == tree.len()
        })
}

#[quickcheck]
fn min_is_first_inorder(xs: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        let _ = tree.insert(*x, *x);
    }

    tree.min().map(|n| *n.key()) == xs.iter().copied().min()
}

#[quickcheck]
fn depth_matches_search_path(xs: Vec<i8>) -> bool {
    let mut tree = Tree::new();
    for x in &xs {
        let _ = tree.insert(*x, *x);
    }

    tree.iter()
        .all(|node| node.depth() + 1 == tree.find_comparison(node.key()).tree)
}
