//! An ordered map with unique keys over the red-black tree engine.
//!
//! `insert` keeps the first binding of a key: inserting an existing key
//! changes nothing and reports failure. Replacement goes through the
//! [`Entry`] API, which also covers insert-default-on-miss access.

use std::{fmt, iter::FusedIterator, ops::Index};

use compare::{Compare, NaturalOrder};
use container_error::KeyNotFound;
use rb_tree::RbTree;

pub struct OrdMap<K, V, C = NaturalOrder> {
    tree: RbTree<K, V, C>,
}

impl<K, V> OrdMap<K, V> {
    pub fn new() -> Self { Self { tree: RbTree::new() } }
}

impl<K, V, C> OrdMap<K, V, C> {
    pub fn with_cmp(cmp: C) -> Self { Self { tree: RbTree::with_cmp(cmp) } }

    pub fn len(&self) -> usize { self.tree.len() }
    pub fn is_empty(&self) -> bool { self.tree.is_empty() }
    pub fn clear(&mut self) { self.tree.clear() }

    pub fn first(&self) -> Option<(&K, &V)> { self.tree.first() }
    pub fn last(&self) -> Option<(&K, &V)> { self.tree.last() }

    pub fn iter(&self) -> rb_tree::Iter<'_, K, V> { self.tree.iter() }
    pub fn iter_mut(&mut self) -> rb_tree::IterMut<'_, K, V> {
        self.tree.iter_mut()
    }
    pub fn keys(&self) -> Keys<'_, K, V> { Keys(self.tree.iter()) }
    pub fn values(&self) -> Values<'_, K, V> { Values(self.tree.iter()) }
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut(self.tree.iter_mut())
    }
}

impl<K, V, C: Compare<K>> OrdMap<K, V, C> {
    /// Inserts `key -> value` if the key is absent and reports whether
    /// insertion happened; an existing binding is never overwritten.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.tree.insert_unique(key, value).is_ok()
    }

    pub fn get(&self, key: &K) -> Option<&V> { self.tree.get(key) }
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.tree.get_mut(key)
    }
    pub fn contains_key(&self, key: &K) -> bool { self.tree.contains(key) }

    pub fn at(&self, key: &K) -> Result<&V, KeyNotFound> {
        self.get(key).ok_or(KeyNotFound)
    }
    pub fn at_mut(&mut self, key: &K) -> Result<&mut V, KeyNotFound> {
        self.get_mut(key).ok_or(KeyNotFound)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.tree.remove(key).map(|(_, v)| v)
    }

    pub fn entry(&mut self, key: K) -> Entry<'_, K, V, C> {
        if self.contains_key(&key) {
            Entry::Occupied(OccupiedEntry { key, map: self })
        } else {
            Entry::Vacant(VacantEntry { key, map: self })
        }
    }

    /// Splices entries out of `other`; entries whose key is already
    /// bound in `self` stay behind in `other`.
    pub fn merge(&mut self, other: &mut Self) {
        self.tree.merge_unique(&mut other.tree);
    }
}

impl<K, V, C: Default> Default for OrdMap<K, V, C> {
    fn default() -> Self { Self::with_cmp(C::default()) }
}

impl<K: Clone, V: Clone, C: Clone> Clone for OrdMap<K, V, C> {
    fn clone(&self) -> Self { Self { tree: self.tree.clone() } }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for OrdMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for OrdMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool { self.tree == other.tree }
}
impl<K: Eq, V: Eq, C> Eq for OrdMap<K, V, C> {}

impl<K, V, C: Compare<K>> Index<&K> for OrdMap<K, V, C> {
    type Output = V;
    fn index(&self, key: &K) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("no entry found for key"),
        }
    }
}

impl<K, V, C: Compare<K>> Extend<(K, V)> for OrdMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for OrdMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V, C> IntoIterator for OrdMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = rb_tree::IntoIter<K, V, C>;
    fn into_iter(self) -> Self::IntoIter { self.tree.into_iter() }
}

impl<'a, K, V, C> IntoIterator for &'a OrdMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = rb_tree::Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

impl<'a, K, V, C> IntoIterator for &'a mut OrdMap<K, V, C> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = rb_tree::IterMut<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter { self.iter_mut() }
}

pub struct Keys<'a, K, V>(rb_tree::Iter<'a, K, V>);

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;
    fn next(&mut self) -> Option<&'a K> { self.0.next().map(|(k, _)| k) }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}
impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(k, _)| k)
    }
}
impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}
impl<K, V> FusedIterator for Keys<'_, K, V> {}

pub struct Values<'a, K, V>(rb_tree::Iter<'a, K, V>);

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;
    fn next(&mut self) -> Option<&'a V> { self.0.next().map(|(_, v)| v) }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}
impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(_, v)| v)
    }
}
impl<K, V> ExactSizeIterator for Values<'_, K, V> {}
impl<K, V> FusedIterator for Values<'_, K, V> {}

pub struct ValuesMut<'a, K, V>(rb_tree::IterMut<'a, K, V>);

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;
    fn next(&mut self) -> Option<&'a mut V> { self.0.next().map(|(_, v)| v) }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}
impl<K, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.0.next_back().map(|(_, v)| v)
    }
}
impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}
impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

pub enum Entry<'a, K, V, C = NaturalOrder> {
    Vacant(VacantEntry<'a, K, V, C>),
    Occupied(OccupiedEntry<'a, K, V, C>),
}

pub struct VacantEntry<'a, K, V, C = NaturalOrder> {
    key: K,
    map: &'a mut OrdMap<K, V, C>,
}

pub struct OccupiedEntry<'a, K, V, C = NaturalOrder> {
    key: K,
    map: &'a mut OrdMap<K, V, C>,
}

impl<'a, K, V, C: Compare<K>> Entry<'a, K, V, C> {
    pub fn key(&self) -> &K {
        match *self {
            Self::Occupied(ref entry) => entry.key(),
            Self::Vacant(ref entry) => entry.key(),
        }
    }

    pub fn and_modify<F: FnOnce(&mut V)>(self, f: F) -> Entry<'a, K, V, C> {
        match self {
            Self::Occupied(mut entry) => {
                f(entry.get_mut());
                Self::Occupied(entry)
            }
            Self::Vacant(entry) => Self::Vacant(entry),
        }
    }

    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Self::Occupied(entry) => entry.into_mut(),
            Self::Vacant(entry) => entry.insert(default),
        }
    }
    pub fn or_insert_with<F: FnOnce() -> V>(self, default: F) -> &'a mut V {
        match self {
            Self::Occupied(entry) => entry.into_mut(),
            Self::Vacant(entry) => entry.insert(default()),
        }
    }
    pub fn or_insert_with_key<F: FnOnce(&K) -> V>(
        self,
        default: F,
    ) -> &'a mut V {
        match self {
            Self::Occupied(entry) => entry.into_mut(),
            Self::Vacant(entry) => {
                let value = default(entry.key());
                entry.insert(value)
            }
        }
    }
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        match self {
            Self::Occupied(entry) => entry.into_mut(),
            Self::Vacant(entry) => entry.insert(Default::default()),
        }
    }
}

impl<'a, K, V, C: Compare<K>> VacantEntry<'a, K, V, C> {
    pub fn key(&self) -> &K { &self.key }
    pub fn into_key(self) -> K { self.key }

    pub fn insert(self, value: V) -> &'a mut V {
        let Self { key, map } = self;
        match map.tree.insert_unique(key, value) {
            Ok(value) => value,
            // the key was absent when the entry was handed out, and the
            // map has been mutably borrowed ever since
            Err(_) => unreachable!(),
        }
    }
}

impl<'a, K, V, C: Compare<K>> OccupiedEntry<'a, K, V, C> {
    pub fn key(&self) -> &K { &self.key }

    pub fn get(&self) -> &V { self.map.tree.get(&self.key).unwrap() }
    pub fn get_mut(&mut self) -> &mut V {
        self.map.tree.get_mut(&self.key).unwrap()
    }
    pub fn into_mut(self) -> &'a mut V {
        self.map.tree.get_mut(&self.key).unwrap()
    }

    pub fn insert(&mut self, value: V) -> V {
        std::mem::replace(self.get_mut(), value)
    }

    pub fn remove(self) -> V { self.remove_entry().1 }
    pub fn remove_entry(self) -> (K, V) {
        self.map.tree.remove(&self.key).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use container_error::KeyNotFound;
    use maplit::btreemap;

    use crate::{Entry, OrdMap};

    #[test]
    fn insert_never_overwrites() {
        let mut map = OrdMap::new();
        assert!(map.insert(1, "one"));
        assert!(map.insert(2, "two"));
        assert!(!map.insert(1, "ONE"));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&1), Some(&"one"));
    }

    #[test]
    fn checked_access() {
        let mut map = OrdMap::new();
        map.insert("a", 1);
        assert_eq!(map.at(&"a"), Ok(&1));
        assert_eq!(map.at(&"b"), Err(KeyNotFound));
        *map.at_mut(&"a").unwrap() += 10;
        assert_eq!(map[&"a"], 11);
    }

    #[test]
    #[should_panic(expected = "no entry found for key")]
    fn index_panics_on_miss() {
        let map: OrdMap<i32, i32> = OrdMap::new();
        let _ = map[&1];
    }

    #[test]
    fn entry_inserts_default_on_miss() {
        let mut map: OrdMap<&str, i32> = OrdMap::new();
        *map.entry("hits").or_default() += 1;
        *map.entry("hits").or_default() += 1;
        *map.entry("misses").or_insert(10) += 1;
        assert_eq!(map.get(&"hits"), Some(&2));
        assert_eq!(map.get(&"misses"), Some(&11));
    }

    #[test]
    fn entry_surface() {
        let mut map = OrdMap::new();

        assert_eq!(map.entry(0).key(), &0);
        map.entry(0).or_insert("zero");
        assert_eq!(map.get(&0), Some(&"zero"));

        map.entry(0).or_insert_with(|| "xxx");
        assert_eq!(map.get(&0), Some(&"zero"));

        map.entry(2).or_insert_with_key(|_| "two");
        assert_eq!(map.get(&2), Some(&"two"));

        map.entry(2).and_modify(|v| *v = "second");
        if let Entry::Occupied(mut o) = map.entry(2) {
            assert_eq!(o.get(), &"second");
            assert_eq!(o.insert("again"), "second");
            assert_eq!(o.remove(), "again");
        }
        assert_eq!(map.len(), 1);
        assert!(!map.contains_key(&2));
    }

    #[test]
    fn removal() {
        let mut map: OrdMap<_, _> =
            (0..10).map(|k| (k, k * k)).collect();
        assert_eq!(map.remove(&3), Some(9));
        assert_eq!(map.remove(&3), None);
        assert_eq!(map.len(), 9);
    }

    #[test]
    fn merge_leaves_collisions() {
        let mut a: OrdMap<_, _> =
            [(1, "a"), (3, "a")].into_iter().collect();
        let mut b: OrdMap<_, _> =
            [(2, "b"), (3, "b"), (4, "b")].into_iter().collect();
        a.merge(&mut b);
        let expected = btreemap! { 1 => "a", 2 => "b", 3 => "a", 4 => "b" };
        assert!(a.iter().map(|(&k, &v)| (k, v)).eq(expected.into_iter()));
        assert_eq!(b.len(), 1);
        assert_eq!(b.get(&3), Some(&"b"));
    }

    #[test]
    fn iterates_in_key_order() {
        let map: OrdMap<_, _> =
            [(3, "c"), (1, "a"), (2, "b")].into_iter().collect();
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), [1, 2, 3]);
        assert_eq!(map.values().copied().collect::<Vec<_>>(), [
            "a", "b", "c"
        ]);
        assert_eq!(map.first(), Some((&1, &"a")));
        assert_eq!(map.last(), Some((&3, &"c")));
    }

    #[test]
    fn values_mut_edits_in_place() {
        let mut map: OrdMap<_, _> =
            (0..5).map(|k| (k, k)).collect();
        for v in map.values_mut() {
            *v *= 2;
        }
        assert_eq!(map.values().copied().collect::<Vec<_>>(), [
            0, 2, 4, 6, 8
        ]);
    }

    #[test]
    fn clone_then_mutate_is_independent() {
        let a: OrdMap<_, _> =
            (0..5).map(|k| (k, k.to_string())).collect();
        let mut b = a.clone();
        assert_eq!(a, b);
        b.remove(&0);
        *b.at_mut(&1).unwrap() = "x".to_owned();
        assert_eq!(a.len(), 5);
        assert_eq!(a.get(&0).map(String::as_str), Some("0"));
        assert_eq!(a.get(&1).map(String::as_str), Some("1"));
        assert_ne!(a, b);
    }

    #[test]
    fn custom_comparator() {
        let by_len = |a: &&str, b: &&str| a.len().cmp(&b.len());
        let mut map = OrdMap::with_cmp(by_len);
        assert!(map.insert("bbb", 3));
        assert!(map.insert("a", 1));
        // same length collides under the comparator
        assert!(!map.insert("ccc", 9));
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), ["a", "bbb"]);
    }
}
