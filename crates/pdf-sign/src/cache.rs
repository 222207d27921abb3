//! Small fixed-capacity LRU map used by the interactive filters.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// A bounded map that evicts the least recently used entry when full.
///
/// Capacities here are single digits, so recency is tracked with a
/// `VecDeque` scan rather than an intrusive list.
#[derive(Debug, Clone)]
pub struct LruCache<K, V> {
    entries: HashMap<K, V>,
    order: VecDeque<K>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Look up an entry and mark it as most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if self.entries.contains_key(key) {
            self.touch(key);
            self.entries.get(key)
        } else {
            None
        }
    }

    /// Insert an entry, evicting the least recently used ones if needed.
    pub fn insert(&mut self, key: K, value: V) {
        if self.entries.contains_key(&key) {
            self.order.retain(|k| k != &key);
        }

        while self.order.len() >= self.capacity {
            if let Some(old_key) = self.order.pop_front() {
                self.entries.remove(&old_key);
            }
        }

        self.entries.insert(key.clone(), value);
        self.order.push_back(key);
    }

    /// Return the cached value, computing and storing it on a miss.
    pub fn get_or_insert_with(&mut self, key: K, compute: impl FnOnce() -> V) -> &V {
        if !self.entries.contains_key(&key) {
            let value = compute();
            self.insert(key.clone(), value);
        } else {
            self.touch(&key);
        }
        &self.entries[&key]
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    fn touch(&mut self, key: &K) {
        self.order.retain(|k| k != key);
        self.order.push_back(key.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_least_recently_used() {
        let mut cache = LruCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);
        assert_eq!(cache.get(&"a"), Some(&1));

        cache.insert("c", 3);
        assert!(cache.contains(&"a"));
        assert!(!cache.contains(&"b"));
        assert!(cache.contains(&"c"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn get_or_insert_computes_only_on_miss() {
        let mut cache = LruCache::new(4);
        let mut calls = 0;
        cache.get_or_insert_with(1u8, || {
            calls += 1;
            "one"
        });
        cache.get_or_insert_with(1u8, || {
            calls += 1;
            "uno"
        });
        assert_eq!(calls, 1);
        assert_eq!(cache.get(&1), Some(&"one"));
    }

    #[test]
    fn reinserting_replaces_value() {
        let mut cache = LruCache::new(2);
        cache.insert(1, "x");
        cache.insert(1, "y");
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&1), Some(&"y"));
    }
}
