//! An ordered map implemented with an AVL tree.

use std::cmp::{self, Ordering};
use std::fmt;
use std::mem;

/// An ordered map implemented with an AVL tree.
///
/// ```
/// use avl_map::AvlTreeMap;
/// let mut map = AvlTreeMap::new();
/// map.insert(10, "ten");
/// map.insert(20, "twenty");
/// map.insert(30, "thirty");
/// assert_eq!(map.height(), 2);
/// assert_eq!(map.get(&20), Some(&"twenty"));
/// map.remove(&10);
/// assert!(map.get(&10).is_none());
/// assert_eq!(map.traverse(), (vec![&20, &30], vec![&"twenty", &"thirty"]));
/// ```
#[derive(Clone)]
pub struct AvlTreeMap<K, V> {
    root: Link<K, V>,
    num_nodes: usize,
}

#[derive(Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    left: Link<K, V>,
    right: Link<K, V>,
    height: usize,
}

type Link<K, V> = Option<Box<Node<K, V>>>;

impl<K: Ord, V> AvlTreeMap<K, V> {
    /// Creates an empty map.
    /// No memory is allocated until the first item is inserted.
    pub fn new() -> Self {
        Self {
            root: None,
            num_nodes: 0,
        }
    }

    /// Returns true if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Returns the height of the tree, i.e. the number of nodes on the longest path
    /// from the root to a leaf. An empty map has height 0.
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    /// Clears the map, deallocating all memory.
    pub fn clear(&mut self) {
        self.root = None;
        self.num_nodes = 0;
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|node| &node.value)
    }

    /// Returns references to the key-value pair corresponding to the key.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.find(key).map(|node| (&node.key, &node.value))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            match key.cmp(&node.key) {
                Ordering::Equal => return Some(&mut node.value),
                Ordering::Less => current = node.left.as_deref_mut(),
                Ordering::Greater => current = node.right.as_deref_mut(),
            }
        }
        None
    }

    /// Returns true if the map contains a value for the given key.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Returns the key-value pair with the smallest key.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some((&node.key, &node.value))
    }

    /// Returns the key-value pair with the largest key.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some((&node.key, &node.value))
    }

    /// Inserts a key-value pair into the map.
    /// If the key was already present its value is overwritten and the old value is returned.
    /// The tree shape is left unchanged in that case.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let replaced = Self::insert_node(&mut self.root, key, value);
        if replaced.is_none() {
            self.num_nodes += 1;
        }
        replaced
    }

    /// Removes a key from the map.
    /// Returns the value at the key if the key was previously in the map.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let removed = Self::remove_node(&mut self.root, key);
        if removed.is_some() {
            debug_assert!(self.num_nodes >= 1);
            self.num_nodes -= 1;
        }
        removed
    }

    /// Visits all key-value pairs in ascending key order.
    pub fn traverse_in_order<F: FnMut(&K, &V)>(&self, mut f: F) {
        Self::inorder(&self.root, &mut f);
    }

    /// Returns all keys and values in ascending key order.
    /// Both vectors have length `len()` and the value at index `i` belongs to the key at index `i`.
    pub fn traverse(&self) -> (Vec<&K>, Vec<&V>) {
        let mut keys = Vec::with_capacity(self.num_nodes);
        let mut values = Vec::with_capacity(self.num_nodes);
        Self::inorder(&self.root, &mut |key, value| {
            keys.push(key);
            values.push(value);
        });
        (keys, values)
    }

    /// Panics if the tree violates search order, AVL balance or height bookkeeping.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        // Check tree nodes
        let num_nodes = Self::check_subtree(&self.root);

        // Check number of nodes
        assert_eq!(num_nodes, self.num_nodes);

        // Check in-order keys are strictly ascending
        let (keys, values) = self.traverse();
        assert_eq!(keys.len(), values.len());
        assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[cfg(any(test, feature = "consistency_check"))]
    fn check_subtree(link: &Link<K, V>) -> usize {
        match link {
            None => 0,
            Some(node) => {
                let left_height = node.left_height();
                let right_height = node.right_height();

                if let Some(left) = &node.left {
                    assert!(left.key < node.key);
                }
                if let Some(right) = &node.right {
                    assert!(right.key > node.key);
                }

                // Check height
                assert_eq!(node.height, 1 + cmp::max(left_height, right_height));

                // Check AVL condition (nearly balance)
                assert!(left_height <= right_height + 1);
                assert!(right_height <= left_height + 1);

                1 + Self::check_subtree(&node.left) + Self::check_subtree(&node.right)
            }
        }
    }

    /// Returns (key, height) for every node in pre-order.
    #[cfg(test)]
    pub(crate) fn preorder_heights(&self) -> Vec<(&K, usize)> {
        fn walk<'a, K, V>(link: &'a Link<K, V>, out: &mut Vec<(&'a K, usize)>) {
            if let Some(node) = link {
                out.push((&node.key, node.height));
                walk(&node.left, out);
                walk(&node.right, out);
            }
        }
        let mut out = Vec::with_capacity(self.num_nodes);
        walk(&self.root, &mut out);
        out
    }

    fn find(&self, key: &K) -> Option<&Node<K, V>> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.cmp(&node.key) {
                Ordering::Equal => return Some(node),
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            }
        }
        None
    }

    fn insert_node(link: &mut Link<K, V>, key: K, value: V) -> Option<V> {
        let node = match link {
            Some(node) => node,
            None => {
                *link = Some(Node::create(key, value));
                return None;
            }
        };
        let replaced = match key.cmp(&node.key) {
            // Same key: overwrite in place, heights are unaffected
            Ordering::Equal => return Some(mem::replace(&mut node.value, value)),
            Ordering::Less => Self::insert_node(&mut node.left, key, value),
            Ordering::Greater => Self::insert_node(&mut node.right, key, value),
        };
        Self::rebalance(link);
        replaced
    }

    /// Removes the node with the given key from the subtree at `link`.
    /// Every node on the path back up is rebalanced, a deletion may need more than one rotation.
    fn remove_node(link: &mut Link<K, V>, key: &K) -> Option<V> {
        let node = link.as_mut()?;
        let removed = match key.cmp(&node.key) {
            Ordering::Less => Self::remove_node(&mut node.left, key),
            Ordering::Greater => Self::remove_node(&mut node.right, key),
            Ordering::Equal => {
                let node = link.take()?;
                let (replacement, value) = Self::unlink_node(node);
                *link = replacement;
                Some(value)
            }
        };
        Self::rebalance(link);
        removed
    }

    /// Detaches a node from its children.
    /// Returns the subtree taking its place and the node's value.
    fn unlink_node(mut node: Box<Node<K, V>>) -> (Link<K, V>, V) {
        match (node.left.take(), node.right.take()) {
            (None, right) => (right, node.value),
            (left, None) => (left, node.value),
            (Some(left), Some(right)) => {
                // Promote in-order successor unless right sub tree is shorter
                let (key, value) = if right.height >= left.height {
                    let (right, successor) = Self::remove_min(right);
                    node.left = Some(left);
                    node.right = right;
                    successor
                } else {
                    let (left, predecessor) = Self::remove_max(left);
                    node.left = left;
                    node.right = Some(right);
                    predecessor
                };
                node.key = key;
                let removed = mem::replace(&mut node.value, value);
                (Some(node), removed)
            }
        }
    }

    /// Removes the smallest node of a subtree, rebalancing on the way back up.
    fn remove_min(mut node: Box<Node<K, V>>) -> (Link<K, V>, (K, V)) {
        match node.left.take() {
            None => {
                let right = node.right.take();
                (right, (node.key, node.value))
            }
            Some(left) => {
                let (left, min) = Self::remove_min(left);
                node.left = left;
                (Some(Self::rebalance_node(node)), min)
            }
        }
    }

    /// Removes the largest node of a subtree, rebalancing on the way back up.
    fn remove_max(mut node: Box<Node<K, V>>) -> (Link<K, V>, (K, V)) {
        match node.right.take() {
            None => {
                let left = node.left.take();
                (left, (node.key, node.value))
            }
            Some(right) => {
                let (right, max) = Self::remove_max(right);
                node.right = right;
                (Some(Self::rebalance_node(node)), max)
            }
        }
    }

    /// Rebalances the subtree at `link` in place. An empty link is left alone.
    fn rebalance(link: &mut Link<K, V>) {
        if let Some(node) = link.take() {
            *link = Some(Self::rebalance_node(node));
        }
    }

    /// Restores AVL condition (balance) at given node if necessary and adjusts height.
    /// Resulting balance will be +1, 0 or -1 height difference between left and right subtree.
    /// Initial balance must not exceed +2 or -2, which always holds after a single update.
    /// Returns the new root of the subtree.
    fn rebalance_node(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        let left_height = node.left_height();
        let right_height = node.right_height();
        debug_assert!(left_height <= right_height + 2);
        debug_assert!(right_height <= left_height + 2);
        if left_height > right_height + 1 {
            // Rebalance right, double rotation only if left child leans right
            if let Some(left) = node.left.take() {
                node.left = Some(if left.right_height() > left.left_height() {
                    Self::rotate_left(left)
                } else {
                    left
                });
            }
            Self::rotate_right(node)
        } else if right_height > left_height + 1 {
            // Rebalance left, double rotation only if right child leans left
            if let Some(right) = node.right.take() {
                node.right = Some(if right.left_height() > right.right_height() {
                    Self::rotate_right(right)
                } else {
                    right
                });
            }
            Self::rotate_left(node)
        } else {
            node.adjust_height();
            node
        }
    }

    //   a              c
    //  / \            / \
    // b   c    =>    a   e
    //    / \        / \
    //   d   e      b   d
    fn rotate_left(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        match node.right.take() {
            None => node,
            Some(mut right) => {
                node.right = right.left.take();
                node.adjust_height();
                right.left = Some(node);
                right.adjust_height();
                right
            }
        }
    }

    //     a          b
    //    / \        / \
    //   b   c  =>  d   a
    //  / \            / \
    // d   e          e   c
    fn rotate_right(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        match node.left.take() {
            None => node,
            Some(mut left) => {
                node.left = left.right.take();
                node.adjust_height();
                left.right = Some(node);
                left.adjust_height();
                left
            }
        }
    }

    fn inorder<'a, F: FnMut(&'a K, &'a V)>(link: &'a Link<K, V>, f: &mut F) {
        if let Some(node) = link {
            Self::inorder(&node.left, f);
            f(&node.key, &node.value);
            Self::inorder(&node.right, f);
        }
    }
}

impl<K: Ord, V> Default for AvlTreeMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + fmt::Debug, V: fmt::Debug> fmt::Debug for AvlTreeMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (keys, values) = self.traverse();
        f.debug_map().entries(keys.into_iter().zip(values)).finish()
    }
}

impl<K: Ord, V> Extend<(K, V)> for AvlTreeMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AvlTreeMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V> Node<K, V> {
    fn create(key: K, value: V) -> Box<Self> {
        Box::new(Node {
            key,
            value,
            left: None,
            right: None,
            height: 1,
        })
    }

    fn left_height(&self) -> usize {
        height(&self.left)
    }

    fn right_height(&self) -> usize {
        height(&self.right)
    }

    fn adjust_height(&mut self) {
        self.height = 1 + cmp::max(self.left_height(), self.right_height());
    }
}

fn height<K, V>(link: &Link<K, V>) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}
