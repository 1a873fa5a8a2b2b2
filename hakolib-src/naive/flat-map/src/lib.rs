#![allow(dead_code)]

//! A sorted-vec model of the ordered-container contract, for checking
//! the tree engine against in tests.

pub struct FlatMap<K, V>(Vec<(K, V)>);

impl<K: Ord, V> FlatMap<K, V> {
    pub fn new() -> Self { Self(vec![]) }

    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    fn lower_bound(&self, key: &K) -> usize {
        self.0.partition_point(|(k, _)| k < key)
    }
    fn upper_bound(&self, key: &K) -> usize {
        self.0.partition_point(|(k, _)| k <= key)
    }

    /// Inserts if `key` is absent; reports whether insertion happened.
    pub fn insert_unique(&mut self, key: K, value: V) -> bool {
        let i = self.lower_bound(&key);
        if self.0.get(i).is_some_and(|(k, _)| *k == key) {
            return false;
        }
        self.0.insert(i, (key, value));
        true
    }

    /// Always inserts; an equal key goes behind its whole run.
    pub fn insert_multi(&mut self, key: K, value: V) {
        let i = self.upper_bound(&key);
        self.0.insert(i, (key, value));
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let i = self.lower_bound(key);
        self.0.get(i).filter(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &K) -> bool { self.get(key).is_some() }

    pub fn count(&self, key: &K) -> usize {
        self.upper_bound(key) - self.lower_bound(key)
    }

    /// Removes the first entry of the equal run.
    pub fn remove_first(&mut self, key: &K) -> Option<(K, V)> {
        let i = self.lower_bound(key);
        if self.0.get(i).is_some_and(|(k, _)| k == key) {
            Some(self.0.remove(i))
        } else {
            None
        }
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        self.0.first().map(|(k, v)| (k, v))
    }
    pub fn last(&self) -> Option<(&K, &V)> {
        self.0.last().map(|(k, v)| (k, v))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.0.iter().map(|(k, v)| (k, v))
    }
}

impl<K: Ord, V> Default for FlatMap<K, V> {
    fn default() -> Self { Self::new() }
}

#[test]
fn sanity_check() {
    let mut map = FlatMap::new();
    assert!(map.insert_unique(5, "five"));
    assert!(map.insert_unique(3, "three"));
    assert!(!map.insert_unique(5, "FIVE"));
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&5), Some(&"five"));

    map.insert_multi(5, "again");
    assert_eq!(map.count(&5), 2);
    assert_eq!(map.remove_first(&5), Some((5, "five")));
    assert_eq!(map.get(&5), Some(&"again"));
    assert_eq!(map.remove_first(&4), None);
    assert_eq!(map.first(), Some((&3, &"three")));
    assert_eq!(map.last(), Some((&5, &"again")));
}
