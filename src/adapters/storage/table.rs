//! Insertion-ordered keyed rows shared by the in-memory stores.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone)]
pub(crate) struct Table<K, V> {
    rows: HashMap<K, (u64, V)>,
    next_seq: u64,
}

impl<K: Eq + Hash + Copy, V: Clone> Table<K, V> {
    pub fn new() -> Self {
        Self {
            rows: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Inserts or replaces. A replaced row keeps its original position.
    pub fn upsert(&mut self, key: K, value: V) {
        match self.rows.get_mut(&key) {
            Some((_, existing)) => *existing = value,
            None => {
                self.rows.insert(key, (self.next_seq, value));
                self.next_seq += 1;
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.rows.get(key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.rows.get_mut(key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.rows.contains_key(key)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.rows.remove(key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Rows matching `predicate`, in insertion order.
    pub fn select<F>(&self, predicate: F) -> Vec<V>
    where
        F: Fn(&V) -> bool,
    {
        let mut matching: Vec<&(u64, V)> =
            self.rows.values().filter(|(_, v)| predicate(v)).collect();
        matching.sort_by_key(|(seq, _)| *seq);
        matching.into_iter().map(|(_, v)| v.clone()).collect()
    }
}

impl<K: Eq + Hash + Copy, V: Clone> Default for Table<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_keeps_insertion_order_across_updates() {
        let mut table = Table::new();
        table.upsert(3, "c");
        table.upsert(1, "a");
        table.upsert(2, "b");
        table.upsert(3, "C");

        assert_eq!(table.select(|_| true), vec!["C", "a", "b"]);
        assert_eq!(table.select(|v| *v != "a"), vec!["C", "b"]);
        assert_eq!(table.len(), 3);
    }
}
