//! Associative container keyed by integer vectors
//!
//! [`VectorMap`] is a trie over `i64` coordinates. Each node holds an optional
//! value and a hash map of children, so keys of any length (including the
//! empty key) can live in the same map. Every weight-indexed structure in the
//! engine is built on it: polynomial coefficients, dominant-weight sets and
//! the pairwise product memo table.
//!
//! Nodes that hold no value and have no children are pruned on removal, so
//! `len()` and `keys()` always agree after any sequence of puts and removes.
//!
//! The map is not synchronized; wrap it in a lock for shared use.

use ahash::HashMap;
use std::fmt;

struct Node<V> {
    value: Option<V>,
    children: HashMap<i64, Node<V>>,
}

impl<V> Default for Node<V> {
    fn default() -> Self {
        Self {
            value: None,
            children: HashMap::default(),
        }
    }
}

impl<V: Clone> Clone for Node<V> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            children: self.children.clone(),
        }
    }
}

impl<V> Node<V> {
    fn is_vacant(&self) -> bool {
        self.value.is_none() && self.children.is_empty()
    }

    fn remove(&mut self, key: &[i64]) -> Option<V> {
        match key.split_first() {
            None => self.value.take(),
            Some((head, rest)) => {
                let child = self.children.get_mut(head)?;
                let removed = child.remove(rest);
                if child.is_vacant() {
                    self.children.remove(head);
                }
                removed
            }
        }
    }

    fn retain<F>(&mut self, prefix: &mut Vec<i64>, f: &mut F) -> usize
    where
        F: FnMut(&[i64], &mut V) -> bool,
    {
        let mut dropped = 0;
        if let Some(value) = self.value.as_mut() {
            if !f(prefix.as_slice(), value) {
                self.value = None;
                dropped += 1;
            }
        }
        self.children.retain(|coord, child| {
            prefix.push(*coord);
            dropped += child.retain(prefix, f);
            prefix.pop();
            !child.is_vacant()
        });
        dropped
    }
}

/// Map from integer vectors to values
///
/// Keys are copied on insertion; the caller keeps ownership of its slice.
///
/// ```
/// use cblocks_lie::VectorMap;
///
/// let mut map = VectorMap::new();
/// map.put(&[1, 2, 3], "a");
/// map.put(&[1, 2], "b");
/// assert_eq!(map.get(&[1, 2, 3]), Some(&"a"));
/// assert_eq!(map.remove(&[1, 2]), Some("b"));
/// assert_eq!(map.len(), 1);
/// ```
pub struct VectorMap<V> {
    root: Node<V>,
    len: usize,
}

impl<V> Default for VectorMap<V> {
    fn default() -> Self {
        Self {
            root: Node::default(),
            len: 0,
        }
    }
}

impl<V: Clone> Clone for VectorMap<V> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            len: self.len,
        }
    }
}

impl<V> VectorMap<V> {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently holding a value
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no key holds a value
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn node(&self, key: &[i64]) -> Option<&Node<V>> {
        let mut node = &self.root;
        for coord in key {
            node = node.children.get(coord)?;
        }
        Some(node)
    }

    /// Look up the value stored at `key`
    pub fn get(&self, key: &[i64]) -> Option<&V> {
        self.node(key)?.value.as_ref()
    }

    /// Mutable access to the value stored at `key`
    pub fn get_mut(&mut self, key: &[i64]) -> Option<&mut V> {
        let mut node = &mut self.root;
        for coord in key {
            node = node.children.get_mut(coord)?;
        }
        node.value.as_mut()
    }

    /// True if `key` holds a value
    pub fn contains_key(&self, key: &[i64]) -> bool {
        self.get(key).is_some()
    }

    /// Store `value` at `key`, returning the previous value if any
    pub fn put(&mut self, key: &[i64], value: V) -> Option<V> {
        let mut node = &mut self.root;
        for coord in key {
            node = node.children.entry(*coord).or_default();
        }
        let old = node.value.replace(value);
        if old.is_none() {
            self.len += 1;
        }
        old
    }

    /// Value at `key`, inserting the result of `default` first if absent
    pub fn get_or_insert_with<F>(&mut self, key: &[i64], default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let len = &mut self.len;
        let mut node = &mut self.root;
        for coord in key {
            node = node.children.entry(*coord).or_default();
        }
        if node.value.is_none() {
            *len += 1;
        }
        node.value.get_or_insert_with(default)
    }

    /// Remove `key`, returning its value if it was present
    ///
    /// Interior nodes left without values or children are dropped.
    pub fn remove(&mut self, key: &[i64]) -> Option<V> {
        let removed = self.root.remove(key);
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Keep only the entries for which `f` returns true
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&[i64], &mut V) -> bool,
    {
        let mut prefix = Vec::new();
        let dropped = self.root.retain(&mut prefix, &mut f);
        self.len -= dropped;
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.root = Node::default();
        self.len = 0;
    }

    /// All keys currently holding a value, in unspecified order
    pub fn keys(&self) -> Vec<Vec<i64>> {
        self.iter().map(|(key, _)| key).collect()
    }

    /// Iterate over `(key, value)` pairs in unspecified order
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            stack: vec![(Vec::new(), &self.root)],
            remaining: self.len,
        }
    }
}

/// Depth-first iterator over the entries of a [`VectorMap`]
pub struct Iter<'a, V> {
    stack: Vec<(Vec<i64>, &'a Node<V>)>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Vec<i64>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((key, node)) = self.stack.pop() {
            for (coord, child) in &node.children {
                let mut child_key = Vec::with_capacity(key.len() + 1);
                child_key.extend_from_slice(&key);
                child_key.push(*coord);
                self.stack.push((child_key, child));
            }
            if let Some(value) = node.value.as_ref() {
                self.remaining -= 1;
                return Some((key, value));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, V> ExactSizeIterator for Iter<'a, V> {}

impl<'a, V> IntoIterator for &'a VectorMap<V> {
    type Item = (Vec<i64>, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: AsRef<[i64]>, V> FromIterator<(K, V)> for VectorMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = VectorMap::new();
        map.extend(iter);
        map
    }
}

impl<K: AsRef<[i64]>, V> Extend<(K, V)> for VectorMap<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key.as_ref(), value);
        }
    }
}

impl<V: PartialEq> PartialEq for VectorMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().all(|(key, value)| other.get(&key) == Some(value))
    }
}

impl<V: Eq> Eq for VectorMap<V> {}

impl<V: fmt::Debug> fmt::Debug for VectorMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        f.debug_map().entries(entries).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get() {
        let mut map = VectorMap::new();
        assert_eq!(map.put(&[1, 2, 3], 1), None);
        assert_eq!(map.put(&[1, 2], 2), None);
        assert_eq!(map.put(&[4, 5, 6], 3), None);

        assert_eq!(map.get(&[1, 2, 3]), Some(&1));
        assert_eq!(map.get(&[1, 2]), Some(&2));
        assert_eq!(map.get(&[4, 5, 6]), Some(&3));
        assert_eq!(map.get(&[1]), None);
        assert_eq!(map.get(&[4, 5]), None);
        assert_eq!(map.get(&[7]), None);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_overwrite_keeps_len() {
        let mut map = VectorMap::new();
        map.put(&[0, 1], 'a');
        assert_eq!(map.put(&[0, 1], 'b'), Some('a'));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&[0, 1]), Some(&'b'));
    }

    #[test]
    fn test_key_is_copied() {
        let mut map = VectorMap::new();
        let mut key = vec![3, 1, 4];
        map.put(&key, "pi");
        key[0] = 0;
        assert_eq!(map.get(&[3, 1, 4]), Some(&"pi"));
        assert_eq!(map.get(&key), None);
    }

    #[test]
    fn test_empty_key() {
        let mut map = VectorMap::new();
        map.put(&[], 7);
        map.put(&[1], 8);
        assert_eq!(map.get(&[]), Some(&7));
        assert_eq!(map.len(), 2);
        assert_eq!(map.remove(&[]), Some(7));
        assert_eq!(map.keys(), vec![vec![1]]);
    }

    #[test]
    fn test_remove_prunes_path() {
        let mut map = VectorMap::new();
        map.put(&[1, 2, 3], 1);
        map.put(&[1, 2], 2);
        map.put(&[4, 5, 6], 3);

        assert_eq!(map.remove(&[1, 2]), Some(2));
        assert_eq!(map.remove(&[1, 2]), None);
        assert_eq!(map.get(&[1, 2, 3]), Some(&1));
        assert_eq!(map.len(), 2);

        assert_eq!(map.remove(&[4, 5]), None);
        assert_eq!(map.len(), 2);

        assert_eq!(map.remove(&[1, 2, 3]), Some(1));
        assert_eq!(map.remove(&[4, 5, 6]), Some(3));
        assert!(map.is_empty());
        assert!(map.keys().is_empty());
        assert!(map.root.is_vacant());
    }

    #[test]
    fn test_keys() {
        let mut map = VectorMap::new();
        map.put(&[1, 2, 3], ());
        map.put(&[1, 2], ());
        map.put(&[4, 5, 6], ());
        let mut keys = map.keys();
        keys.sort();
        assert_eq!(keys, vec![vec![1, 2], vec![1, 2, 3], vec![4, 5, 6]]);
    }

    #[test]
    fn test_clear() {
        let mut map = VectorMap::new();
        map.put(&[1, 2], 1);
        map.put(&[3], 2);
        map.clear();
        assert!(map.is_empty());
        assert!(map.root.is_vacant());
        assert_eq!(map.get(&[1, 2]), None);

        map.put(&[1], 3);
        assert_eq!(map.keys(), vec![vec![1]]);
    }

    #[test]
    fn test_get_or_insert_with() {
        let mut map: VectorMap<i32> = VectorMap::new();
        *map.get_or_insert_with(&[2, 2], || 0) += 5;
        *map.get_or_insert_with(&[2, 2], || 100) += 5;
        assert_eq!(map.get(&[2, 2]), Some(&10));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_retain_prunes() {
        let mut map: VectorMap<i32> = [(vec![1, 0], 1), (vec![1, 1], 0), (vec![2], 0)]
            .into_iter()
            .collect();
        map.retain(|_, v| *v != 0);
        assert_eq!(map.len(), 1);
        assert_eq!(map.keys(), vec![vec![1, 0]]);
        assert_eq!(map.get(&[2]), None);
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let a: VectorMap<i32> = [(vec![1], 1), (vec![2, 3], 2)].into_iter().collect();
        let b: VectorMap<i32> = [(vec![2, 3], 2), (vec![1], 1)].into_iter().collect();
        let c: VectorMap<i32> = [(vec![2, 3], 2), (vec![1], 9)].into_iter().collect();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    mod property_based_tests {
        use super::*;
        use proptest::prelude::*;
        use std::collections::BTreeMap;

        #[derive(Debug, Clone)]
        enum Op {
            Put(Vec<i64>, u8),
            Remove(Vec<i64>),
        }

        fn key_strategy() -> impl Strategy<Value = Vec<i64>> {
            prop::collection::vec(-3i64..3, 0..4)
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                (key_strategy(), any::<u8>()).prop_map(|(k, v)| Op::Put(k, v)),
                key_strategy().prop_map(Op::Remove),
            ]
        }

        proptest! {
            #[test]
            fn prop_len_matches_keys(ops in prop::collection::vec(op_strategy(), 0..64)) {
                let mut map = VectorMap::new();
                let mut model = BTreeMap::new();
                for op in ops {
                    match op {
                        Op::Put(k, v) => {
                            prop_assert_eq!(map.put(&k, v), model.insert(k, v));
                        }
                        Op::Remove(k) => {
                            prop_assert_eq!(map.remove(&k), model.remove(&k));
                        }
                    }
                    prop_assert_eq!(map.len(), map.keys().len());
                    prop_assert_eq!(map.len(), model.len());
                }
                for (k, v) in &model {
                    prop_assert_eq!(map.get(k), Some(v));
                }
            }

            #[test]
            fn prop_remove_all_leaves_nothing(keys in prop::collection::vec(key_strategy(), 0..32)) {
                let mut map = VectorMap::new();
                for k in &keys {
                    map.put(k, ());
                }
                for k in &keys {
                    map.remove(k);
                }
                prop_assert!(map.is_empty());
                prop_assert!(map.keys().is_empty());
                prop_assert!(map.root.is_vacant());
                for k in &keys {
                    prop_assert!(map.get(k).is_none());
                }
            }
        }
    }
}
