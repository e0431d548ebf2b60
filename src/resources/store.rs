//! In-memory record storage.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Concurrent id → record map with server-assigned ids.
///
/// Ids start at 1 and are never reused, even after deletes.
pub struct Store<M> {
    records: DashMap<u64, M>,
    next_id: AtomicU64,
}

impl<M: Clone> Store<M> {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Reserve the next id.
    pub fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    pub fn insert(&self, id: u64, record: M) {
        self.records.insert(id, record);
    }

    pub fn get(&self, id: u64) -> Option<M> {
        self.records.get(&id).map(|r| r.value().clone())
    }

    pub fn contains(&self, id: u64) -> bool {
        self.records.contains_key(&id)
    }

    /// All records ordered by id.
    pub fn all(&self) -> Vec<M> {
        let mut entries: Vec<(u64, M)> = self
            .records
            .iter()
            .map(|e| (*e.key(), e.value().clone()))
            .collect();
        entries.sort_by_key(|(id, _)| *id);
        entries.into_iter().map(|(_, record)| record).collect()
    }

    /// Replace a record with the result of `f`, holding the entry lock.
    ///
    /// Returns `None` when `id` is unknown; the record is left untouched
    /// when `f` fails.
    pub fn try_update<E>(&self, id: u64, f: impl FnOnce(&M) -> Result<M, E>) -> Option<Result<M, E>> {
        let mut entry = self.records.get_mut(&id)?;
        let result = f(entry.value()).map(|updated| {
            *entry.value_mut() = updated.clone();
            updated
        });
        Some(result)
    }

    pub fn remove(&self, id: u64) -> Option<M> {
        self.records.remove(&id).map(|(_, record)| record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<M: Clone> Default for Store<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_not_reused() {
        let store = Store::new();
        let a = store.next_id();
        store.insert(a, "a");
        store.remove(a);
        let b = store.next_id();
        assert_eq!((a, b), (1, 2));
        assert!(store.is_empty());
    }

    #[test]
    fn test_all_is_ordered() {
        let store = Store::new();
        for name in ["x", "y", "z"] {
            let id = store.next_id();
            store.insert(id, name);
        }
        assert_eq!(store.all(), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_failed_update_leaves_record() {
        let store = Store::new();
        let id = store.next_id();
        store.insert(id, 10);

        let result = store.try_update(id, |_| Err::<i32, _>("nope"));
        assert_eq!(result, Some(Err("nope")));
        assert_eq!(store.get(id), Some(10));

        assert_eq!(store.try_update(id, |v| Ok::<_, ()>(v + 1)), Some(Ok(11)));
        assert_eq!(store.get(id), Some(11));
        assert_eq!(store.try_update(99, |v| Ok::<_, ()>(*v)), None);
    }
}
