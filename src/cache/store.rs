//! Shared handle to a per-resource cache entry.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::error::ApiError;

use super::entry::{CacheEntry, Cacheable, FetchStatus};

/// Cloneable handle to the cache entry of one resource type.
///
/// All operations are synchronous, in-memory and total: each takes the lock,
/// mutates, and returns. Collaborators receive a clone of the handle rather
/// than reaching for process-global state, so tests can instantiate isolated
/// stores. Reads hand out snapshots, never references into the entry.
pub struct Store<T: Cacheable> {
  inner: Arc<RwLock<CacheEntry<T>>>,
}

impl<T: Cacheable> Store<T> {
  pub fn new() -> Self {
    Self {
      inner: Arc::new(RwLock::new(CacheEntry::default())),
    }
  }

  /// Snapshot of the whole entry.
  pub fn snapshot(&self) -> CacheEntry<T> {
    self.inner.read().clone()
  }

  pub fn items(&self) -> Vec<T> {
    self.inner.read().items().to_vec()
  }

  pub fn focused(&self) -> Option<T> {
    self.inner.read().focused().cloned()
  }

  pub fn status(&self) -> FetchStatus {
    self.inner.read().status()
  }

  pub fn last_error(&self) -> Option<ApiError> {
    self.inner.read().last_error().cloned()
  }

  pub fn last_success_at(&self) -> Option<DateTime<Utc>> {
    self.inner.read().last_success_at()
  }

  pub fn generation(&self) -> u64 {
    self.inner.read().generation()
  }

  pub fn find(&self, id: &str) -> Option<T> {
    self.inner.read().find(id).cloned()
  }

  pub fn replace_all(&self, items: Vec<T>) {
    self.inner.write().replace_all(items);
  }

  pub fn complete_fetch(&self, items: Vec<T>, now: DateTime<Utc>) {
    self.inner.write().complete_fetch(items, now);
  }

  pub fn fail_fetch(&self, error: ApiError) {
    self.inner.write().fail_fetch(error);
  }

  pub fn upsert(&self, item: T) {
    self.inner.write().upsert(item);
  }

  pub fn remove(&self, id: &str) -> Option<(T, usize)> {
    self.inner.write().remove(id)
  }

  pub fn restore(&self, item: T, index: usize, taken_at: u64) -> bool {
    self.inner.write().restore(item, index, taken_at)
  }

  pub fn set_focused(&self, item: Option<T>) {
    self.inner.write().set_focused(item);
  }

  pub fn set_status(&self, status: FetchStatus) {
    self.inner.write().set_status(status);
  }

  pub fn set_error(&self, error: ApiError) {
    self.inner.write().set_error(error);
  }

  pub fn clear_error(&self) {
    self.inner.write().clear_error();
  }
}

impl<T: Cacheable> Default for Store<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: Cacheable> Clone for Store<T> {
  fn clone(&self) -> Self {
    Self {
      inner: Arc::clone(&self.inner),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Debug, Clone, PartialEq)]
  struct Item {
    id: String,
  }

  impl Cacheable for Item {
    fn id(&self) -> &str {
      &self.id
    }

    fn resource_name() -> &'static str {
      "item"
    }
  }

  #[test]
  fn test_clones_share_state() {
    let store = Store::new();
    let other = store.clone();

    store.upsert(Item {
      id: "a".to_string(),
    });

    assert_eq!(other.items().len(), 1);
    assert!(other.find("a").is_some());
  }

  #[test]
  fn test_snapshot_is_detached_from_later_writes() {
    let store = Store::new();
    store.upsert(Item {
      id: "a".to_string(),
    });

    let snapshot = store.snapshot();
    store.remove("a");

    assert_eq!(snapshot.items().len(), 1);
    assert!(store.items().is_empty());
  }
}
