//! Height-balanced (AVL) binary search tree keyed by integer id.
//!
//! Insert and lookup only. Every node exclusively owns its children, so the
//! tree is torn down by ordinary drop and no back-pointers exist; rebalancing
//! happens on the way back up the recursive insertion path.

use std::cmp::Ordering;
use thiserror::Error;

use crate::config::CoreConfig;
use crate::{log_checks, log_debug};

/// Key type used by the index.
pub type IndexKey = i64;

/// Explicit outcomes for callers that prefer `Result` over `bool`/`Option`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("Key already present: {0}")]
    AlreadyPresent(IndexKey),
    #[error("Key not found: {0}")]
    NotFound(IndexKey),
}

type Link<V> = Option<Box<Node<V>>>;

#[derive(Debug)]
struct Node<V> {
    key: IndexKey,
    value: V,
    /// Height of the subtree rooted here (leaf = 1)
    height: i32,
    left: Link<V>,
    right: Link<V>,
}

impl<V> Node<V> {
    fn leaf(key: IndexKey, value: V) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            height: 1,
            left: None,
            right: None,
        })
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    /// Left height minus right height.
    fn balance(&self) -> i32 {
        height(&self.left) - height(&self.right)
    }
}

fn height<V>(link: &Link<V>) -> i32 {
    link.as_ref().map_or(0, |n| n.height)
}

/// Single right rotation around `y`; returns the new subtree root.
fn rotate_right<V>(mut y: Box<Node<V>>) -> Box<Node<V>> {
    let Some(mut x) = y.left.take() else {
        return y;
    };
    y.left = x.right.take();
    y.update_height();
    x.right = Some(y);
    x.update_height();
    x
}

/// Single left rotation around `x`; returns the new subtree root.
fn rotate_left<V>(mut x: Box<Node<V>>) -> Box<Node<V>> {
    let Some(mut y) = x.right.take() else {
        return x;
    };
    x.right = y.left.take();
    x.update_height();
    y.left = Some(x);
    y.update_height();
    y
}

/// Restore `|balance| <= 1` at `node` after an insertion below it.
///
/// After a single insert the heavy child leans by exactly one towards the side
/// the new key went, so the child's balance sign selects the same case as
/// comparing the inserted key with the child's key.
fn rebalance<V>(mut node: Box<Node<V>>, verbosity: u8) -> Box<Node<V>> {
    let balance = node.balance();
    if balance > 1 {
        let left_balance = node.left.as_ref().map_or(0, |l| l.balance());
        if left_balance < 0 {
            log_checks!(verbosity, "AVL left-right rotation at key {}", node.key);
            node.left = node.left.take().map(rotate_left);
        } else {
            log_checks!(verbosity, "AVL left-left rotation at key {}", node.key);
        }
        return rotate_right(node);
    }
    if balance < -1 {
        let right_balance = node.right.as_ref().map_or(0, |r| r.balance());
        if right_balance > 0 {
            log_checks!(verbosity, "AVL right-left rotation at key {}", node.key);
            node.right = node.right.take().map(rotate_right);
        } else {
            log_checks!(verbosity, "AVL right-right rotation at key {}", node.key);
        }
        return rotate_left(node);
    }
    node
}

/// Insert below `link`, returning the new subtree root and whether a node was added.
fn insert_at<V>(link: Link<V>, key: IndexKey, value: V, verbosity: u8) -> (Box<Node<V>>, bool) {
    let mut node = match link {
        None => return (Node::leaf(key, value), true),
        Some(node) => node,
    };

    let inserted = match key.cmp(&node.key) {
        Ordering::Less => {
            let (child, inserted) = insert_at(node.left.take(), key, value, verbosity);
            node.left = Some(child);
            inserted
        }
        Ordering::Greater => {
            let (child, inserted) = insert_at(node.right.take(), key, value, verbosity);
            node.right = Some(child);
            inserted
        }
        Ordering::Equal => return (node, false),
    };

    if !inserted {
        // Nothing changed below, heights are still valid
        return (node, false);
    }

    node.update_height();
    (rebalance(node, verbosity), true)
}

/// Ordered index with guaranteed logarithmic height.
#[derive(Debug)]
pub struct BalancedIndex<V> {
    root: Link<V>,
    len: usize,
    verbosity: u8,
}

impl<V> Default for BalancedIndex<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> BalancedIndex<V> {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::with_verbosity(0)
    }

    /// Create an empty index that logs rotations at the given verbosity.
    pub fn with_verbosity(verbosity: u8) -> Self {
        Self {
            root: None,
            len: 0,
            verbosity,
        }
    }

    pub fn with_config(config: &CoreConfig) -> Self {
        Self::with_verbosity(config.verbosity)
    }

    /// Insert `value` under `key` if the key is absent.
    ///
    /// Returns `false` and keeps the existing value when the key is already
    /// present; duplicates never overwrite.
    pub fn insert(&mut self, key: IndexKey, value: V) -> bool {
        let (root, inserted) = insert_at(self.root.take(), key, value, self.verbosity);
        self.root = Some(root);
        if inserted {
            self.len += 1;
        } else {
            log_checks!(self.verbosity, "Index key {} already present, value kept", key);
        }
        inserted
    }

    /// Same as [`insert`](Self::insert) but reports a duplicate as an error value.
    pub fn try_insert(&mut self, key: IndexKey, value: V) -> Result<(), IndexError> {
        if self.insert(key, value) {
            Ok(())
        } else {
            Err(IndexError::AlreadyPresent(key))
        }
    }

    /// Find the value stored under `key`.
    pub fn search(&self, key: IndexKey) -> Option<&V> {
        let mut current = self.root.as_deref();
        let mut depth = 0;
        while let Some(node) = current {
            depth += 1;
            current = match key.cmp(&node.key) {
                Ordering::Equal => {
                    log_debug!(self.verbosity, "Index hit for {} at depth {}", key, depth);
                    return Some(&node.value);
                }
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        None
    }

    /// Like [`search`](Self::search), with a miss reported as `IndexError::NotFound`.
    pub fn get_or_err(&self, key: IndexKey) -> Result<&V, IndexError> {
        self.search(key).ok_or(IndexError::NotFound(key))
    }

    pub fn contains(&self, key: IndexKey) -> bool {
        self.search(key).is_some()
    }

    /// Ascending `(key, value)` walk. Each call starts a fresh traversal.
    pub fn traverse(&self) -> InOrder<'_, V> {
        InOrder::new(self.root.as_deref())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the tree (0 when empty).
    pub fn height(&self) -> usize {
        height(&self.root) as usize
    }

    /// Key currently at the root, if any.
    pub fn root_key(&self) -> Option<IndexKey> {
        self.root.as_ref().map(|n| n.key)
    }
}

impl<'a, V> IntoIterator for &'a BalancedIndex<V> {
    type Item = (IndexKey, &'a V);
    type IntoIter = InOrder<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.traverse()
    }
}

/// Lazy in-order iterator over a [`BalancedIndex`].
///
/// Holds the chain of pending ancestors, so memory is bounded by tree height.
#[derive(Debug)]
pub struct InOrder<'a, V> {
    stack: Vec<&'a Node<V>>,
}

impl<'a, V> Clone for InOrder<'a, V> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
        }
    }
}

impl<'a, V> InOrder<'a, V> {
    fn new(root: Option<&'a Node<V>>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut current: Option<&'a Node<V>>) {
        while let Some(node) = current {
            self.stack.push(node);
            current = node.left.as_deref();
        }
    }
}

impl<'a, V> Iterator for InOrder<'a, V> {
    type Item = (IndexKey, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some((node.key, &node.value))
    }
}

#[cfg(test)]
impl<V> BalancedIndex<V> {
    /// Checks ordering, cached heights and the balance bound for every node.
    fn check_invariants(&self) -> bool {
        fn walk<V>(link: &Link<V>, lo: Option<IndexKey>, hi: Option<IndexKey>) -> Option<i32> {
            let Some(node) = link else {
                return Some(0);
            };
            if lo.is_some_and(|lo| node.key <= lo) || hi.is_some_and(|hi| node.key >= hi) {
                return None;
            }
            let left = walk(&node.left, lo, Some(node.key))?;
            let right = walk(&node.right, Some(node.key), hi)?;
            let h = 1 + left.max(right);
            if (left - right).abs() > 1 || h != node.height {
                return None;
            }
            Some(h)
        }
        walk(&self.root, None, None).is_some()
    }

    fn child_keys(&self) -> (Option<IndexKey>, Option<IndexKey>) {
        match &self.root {
            Some(root) => (
                root.left.as_ref().map(|n| n.key),
                root.right.as_ref().map(|n| n.key),
            ),
            None => (None, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_left_rotation() {
        let mut index = BalancedIndex::new();
        for key in [10, 20, 30] {
            assert!(index.insert(key, key * 100));
        }
        assert_eq!(index.root_key(), Some(20));
        assert_eq!(index.child_keys(), (Some(10), Some(30)));
        assert_eq!(index.height(), 2);
    }

    #[test]
    fn test_single_right_rotation() {
        let mut index = BalancedIndex::new();
        for key in [30, 20, 10] {
            index.insert(key, ());
        }
        assert_eq!(index.root_key(), Some(20));
        assert_eq!(index.child_keys(), (Some(10), Some(30)));
    }

    #[test]
    fn test_left_right_rotation() {
        let mut index = BalancedIndex::new();
        for key in [30, 10, 20] {
            index.insert(key, ());
        }
        assert_eq!(index.root_key(), Some(20));
        assert_eq!(index.child_keys(), (Some(10), Some(30)));
        assert!(index.check_invariants());
    }

    #[test]
    fn test_right_left_rotation() {
        let mut index = BalancedIndex::new();
        for key in [10, 30, 20] {
            index.insert(key, ());
        }
        assert_eq!(index.root_key(), Some(20));
        assert_eq!(index.child_keys(), (Some(10), Some(30)));
        assert!(index.check_invariants());
    }

    #[test]
    fn test_duplicate_keeps_first_value() {
        let mut index = BalancedIndex::new();
        assert!(index.insert(7, "alice"));
        assert!(!index.insert(7, "bob"));
        assert_eq!(index.search(7), Some(&"alice"));
        assert_eq!(index.len(), 1);
        assert_eq!(
            index.try_insert(7, "carol"),
            Err(IndexError::AlreadyPresent(7))
        );
    }

    #[test]
    fn test_with_config_takes_verbosity() {
        let config = CoreConfig {
            verbosity: 3,
            ..CoreConfig::default()
        };
        let mut index = BalancedIndex::with_config(&config);
        assert_eq!(index.verbosity, 3);
        for key in [30, 10, 20] {
            index.insert(key, ());
        }
        assert_eq!(index.root_key(), Some(20));
    }

    #[test]
    fn test_search_miss() {
        let mut index = BalancedIndex::new();
        index.insert(1, "one");
        assert_eq!(index.search(2), None);
        assert_eq!(index.get_or_err(2), Err(IndexError::NotFound(2)));
        assert!(index.contains(1));
    }

    #[test]
    fn test_empty_index() {
        let index: BalancedIndex<()> = BalancedIndex::default();
        assert!(index.is_empty());
        assert_eq!(index.height(), 0);
        assert_eq!(index.root_key(), None);
        assert_eq!(index.traverse().count(), 0);
    }

    #[test]
    fn test_sequential_inserts_stay_logarithmic() {
        let mut index = BalancedIndex::new();
        for key in 0..1023 {
            index.insert(key, ());
        }
        // A perfectly filled tree of 1023 nodes has height 10
        assert_eq!(index.height(), 10);
        assert!(index.check_invariants());
    }

    #[test]
    fn test_traverse_is_restartable() {
        let mut index = BalancedIndex::new();
        for key in [5, 3, 8, 1, 4] {
            index.insert(key, key.to_string());
        }
        let first: Vec<IndexKey> = index.traverse().map(|(k, _)| k).collect();
        let second: Vec<IndexKey> = (&index).into_iter().map(|(k, _)| k).collect();
        assert_eq!(first, vec![1, 3, 4, 5, 8]);
        assert_eq!(first, second);

        let mut partial = index.traverse();
        assert_eq!(partial.next().map(|(k, v)| (k, v.as_str())), Some((1, "1")));
        let resumed: Vec<IndexKey> = partial.clone().map(|(k, _)| k).collect();
        assert_eq!(resumed, vec![3, 4, 5, 8]);
    }

    proptest! {
        #[test]
        fn prop_balanced_and_sorted_after_every_insert(
            keys in proptest::collection::vec(-500i64..500, 0..200)
        ) {
            let mut index = BalancedIndex::new();
            let mut expected = std::collections::BTreeMap::new();
            for key in keys {
                let fresh = !expected.contains_key(&key);
                expected.entry(key).or_insert(key * 2);
                prop_assert_eq!(index.insert(key, key * 2), fresh);
                prop_assert!(index.check_invariants());
            }
            let walked: Vec<(IndexKey, i64)> = index.traverse().map(|(k, v)| (k, *v)).collect();
            let model: Vec<(IndexKey, i64)> = expected.into_iter().collect();
            prop_assert_eq!(walked, model);
        }
    }
}
