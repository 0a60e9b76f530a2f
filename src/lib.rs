//! An ordered map implemented with an AVL tree.
//!
//! [`AvlTreeMap`] keeps its keys in a height-balanced binary search tree, so insertion,
//! removal and lookup are O(log n). The tree is rebalanced with single or double rotations
//! after every structural change.
//!
//! ```
//! use avl_map::AvlTreeMap;
//!
//! let mut map = AvlTreeMap::new();
//! for key in [5, 3, 8, 1, 4] {
//!     map.insert(key, key * 10);
//! }
//! map.insert(3, 33);
//! map.remove(&8);
//!
//! let (keys, values) = map.traverse();
//! assert_eq!(keys, [&1, &3, &4, &5]);
//! assert_eq!(values, [&10, &33, &40, &50]);
//! ```
//!
//! Enable the `consistency_check` feature to get [`AvlTreeMap::check_consistency`],
//! which panics if any tree invariant is broken.

mod map;
pub use map::AvlTreeMap;
