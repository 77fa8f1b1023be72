//! Cache-first orchestration for one resource type.
//!
//! Sits between callers and the network client: decides cache versus fetch,
//! de-duplicates concurrent list fetches, and applies mutations with the
//! per-kind policy — deletes optimistically with rollback on failure,
//! creates and updates pessimistically (the cache changes only after the
//! server confirms). Fetching itself is supplied per call as a closure, the
//! same convention the callers' typed wrappers use.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use crate::error::ApiError;

use super::entry::{Cacheable, FetchStatus};
use super::inflight::Inflight;
use super::mutation::{MutationState, PendingMutation};
use super::policy::FreshnessPolicy;
use super::store::Store;

/// Cache manager for one resource collection.
pub struct ResourceCache<T: Cacheable> {
  store: Store<T>,
  policy: FreshnessPolicy,
  inflight: Arc<Inflight<T>>,
}

impl<T: Cacheable> ResourceCache<T> {
  pub fn new(policy: FreshnessPolicy) -> Self {
    Self {
      store: Store::new(),
      policy,
      inflight: Arc::new(Inflight::new()),
    }
  }

  /// Read access to the underlying store. Reads are always safe; writes
  /// belong to this manager and the fetch paths only.
  pub fn store(&self) -> &Store<T> {
    &self.store
  }

  /// Fetch the collection, serving from cache when it is fresh enough.
  ///
  /// A concurrent call while a fetch is outstanding joins that flight
  /// instead of issuing a second network call.
  pub async fn list<F, Fut>(&self, force: bool, fetch: F) -> Result<Vec<T>, ApiError>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<T>, ApiError>>,
  {
    let entry = self.store.snapshot();
    if !self.inflight.is_loading() && !self.policy.should_fetch(&entry, force) {
      debug!(resource = T::resource_name(), "list served from cache");
      return Ok(entry.into_items());
    }

    let store = self.store.clone();
    self
      .inflight
      .run(|| async move {
        store.set_status(FetchStatus::Loading);
        debug!(resource = T::resource_name(), "fetching list");
        match fetch().await {
          Ok(items) => {
            store.complete_fetch(items.clone(), Utc::now());
            Ok(items)
          }
          Err(error) => {
            store.fail_fetch(error.clone());
            Err(error)
          }
        }
      })
      .await
  }

  /// Fetch one entity and focus it.
  ///
  /// A fresh cached copy of the id is served without a network call;
  /// otherwise the fetched entity is upserted into the collection (so the
  /// focused entity always corresponds to a cached one) and focused.
  pub async fn get<F, Fut>(&self, id: &str, force: bool, fetch: F) -> Result<T, ApiError>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
  {
    if !force {
      let entry = self.store.snapshot();
      if !self.policy.should_fetch(&entry, false) {
        if let Some(cached) = entry.find(id) {
          debug!(resource = T::resource_name(), id, "entity served from cache");
          self.store.set_focused(Some(cached.clone()));
          return Ok(cached.clone());
        }
      }
    }

    match fetch().await {
      Ok(item) => {
        self.store.upsert(item.clone());
        self.store.set_focused(Some(item.clone()));
        self.store.clear_error();
        Ok(item)
      }
      Err(error) => {
        self.store.set_error(error.clone());
        Err(error)
      }
    }
  }

  /// Create an entity. Pessimistic: the server-assigned entity is inserted
  /// at the head of the collection only after the call succeeds.
  pub async fn create<F, Fut>(&self, call: F) -> Result<T, ApiError>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
  {
    let mut pending = PendingMutation::begin_create();
    match call().await {
      Ok(item) => {
        pending.confirm();
        self.store.upsert(item.clone());
        self.store.clear_error();
        Ok(item)
      }
      Err(error) => {
        pending.fail(&self.store);
        self.store.set_error(error.clone());
        Err(error)
      }
    }
  }

  /// Update an entity. Pessimistic: readers keep seeing the old value until
  /// the server's canonical response replaces it in place.
  pub async fn update<F, Fut>(&self, id: &str, call: F) -> Result<T, ApiError>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
  {
    let mut pending = PendingMutation::begin_update(id);
    match call().await {
      Ok(item) => {
        pending.confirm();
        self.store.upsert(item.clone());
        if self.store.focused().is_some_and(|focused| focused.id() == id) {
          self.store.set_focused(Some(item.clone()));
        }
        self.store.clear_error();
        Ok(item)
      }
      Err(error) => {
        pending.fail(&self.store);
        self.store.set_error(error.clone());
        Err(error)
      }
    }
  }

  /// Delete an entity. Optimistic: the item disappears from the collection
  /// immediately and the status stays Ready, so list views don't flash a
  /// spinner. On failure the item is restored — unless a refetch replaced
  /// the collection in the meantime, in which case the fetched state wins.
  pub async fn delete<F, Fut>(&self, id: &str, call: F) -> Result<(), ApiError>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<(), ApiError>>,
  {
    let mut pending = PendingMutation::begin_delete(&self.store, id);
    match call().await {
      Ok(()) => {
        pending.confirm();
        self.store.clear_error();
        Ok(())
      }
      Err(error) => {
        let state = pending.fail(&self.store);
        if state == MutationState::Superseded {
          debug!(
            resource = T::resource_name(),
            id, "rollback skipped, collection was refetched mid-flight"
          );
        }
        self.store.set_error(error.clone());
        Err(error)
      }
    }
  }
}

impl<T: Cacheable> Clone for ResourceCache<T> {
  fn clone(&self) -> Self {
    Self {
      store: self.store.clone(),
      policy: self.policy,
      inflight: Arc::clone(&self.inflight),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::time::Duration;

  #[derive(Debug, Clone, PartialEq)]
  struct Item {
    id: String,
    name: String,
  }

  impl Cacheable for Item {
    fn id(&self) -> &str {
      &self.id
    }

    fn resource_name() -> &'static str {
      "item"
    }
  }

  fn item(id: &str) -> Item {
    Item {
      id: id.to_string(),
      name: format!("name-{}", id),
    }
  }

  fn ids(cache: &ResourceCache<Item>) -> Vec<String> {
    cache.store().items().iter().map(|i| i.id.clone()).collect()
  }

  #[tokio::test]
  async fn test_list_within_ttl_hits_network_once() {
    let cache = ResourceCache::new(FreshnessPolicy::default());
    let calls = AtomicUsize::new(0);

    let fetch = || async {
      calls.fetch_add(1, Ordering::SeqCst);
      Ok(vec![item("a"), item("b")])
    };

    let first = cache.list(false, fetch).await.unwrap();
    let second = cache
      .list(false, || async {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![item("x")])
      })
      .await
      .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(first, second);
    assert_eq!(cache.store().status(), FetchStatus::Ready);
  }

  #[tokio::test]
  async fn test_force_refetches_within_ttl() {
    let cache = ResourceCache::new(FreshnessPolicy::default());
    let calls = AtomicUsize::new(0);

    for force in [false, true] {
      cache
        .list(force, || async {
          calls.fetch_add(1, Ordering::SeqCst);
          Ok(vec![item("a")])
        })
        .await
        .unwrap();
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn test_failed_list_sets_error_and_keeps_old_items() {
    let cache = ResourceCache::new(FreshnessPolicy::default());

    cache
      .list(false, || async { Ok(vec![item("a")]) })
      .await
      .unwrap();

    let outcome = cache
      .list(true, || async {
        Err(ApiError::Server {
          status: 500,
          message: "boom".to_string(),
        })
      })
      .await;

    assert!(outcome.is_err());
    assert_eq!(cache.store().status(), FetchStatus::Failed);
    assert!(cache.store().last_error().is_some());
    assert_eq!(ids(&cache), vec!["a"]);
  }

  #[tokio::test]
  async fn test_concurrent_lists_share_one_fetch() {
    let cache = Arc::new(ResourceCache::new(FreshnessPolicy::default()));
    let calls = Arc::new(AtomicUsize::new(0));

    let first = {
      let cache = Arc::clone(&cache);
      let calls = Arc::clone(&calls);
      tokio::spawn(async move {
        cache
          .list(false, || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(vec![item("a")])
          })
          .await
      })
    };

    tokio::time::sleep(Duration::from_millis(10)).await;

    let second = {
      let cache = Arc::clone(&cache);
      let calls = Arc::clone(&calls);
      tokio::spawn(async move {
        cache
          .list(false, || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![item("x")])
          })
          .await
      })
    };

    let first = first.await.unwrap().unwrap();
    let second = second.await.unwrap().unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(first, second);
  }

  #[tokio::test]
  async fn test_delete_removes_immediately_and_rolls_back_on_failure() {
    let cache = ResourceCache::new(FreshnessPolicy::default());
    cache
      .list(false, || async { Ok(vec![item("a"), item("b"), item("c")]) })
      .await
      .unwrap();

    let store = cache.store().clone();
    let outcome = cache
      .delete("b", || async move {
        // The item is already gone while the call is out, with no spinner
        let mid_flight: Vec<String> = store.items().iter().map(|i| i.id.clone()).collect();
        assert_eq!(mid_flight, vec!["a", "c"]);
        assert_eq!(store.status(), FetchStatus::Ready);
        Err(ApiError::Server {
          status: 500,
          message: "boom".to_string(),
        })
      })
      .await;

    assert!(outcome.is_err());
    assert_eq!(ids(&cache), vec!["a", "b", "c"]);
    assert!(cache.store().last_error().is_some());
  }

  #[tokio::test]
  async fn test_delete_success_keeps_item_removed() {
    let cache = ResourceCache::new(FreshnessPolicy::default());
    cache
      .list(false, || async { Ok(vec![item("a"), item("b")]) })
      .await
      .unwrap();

    cache.delete("a", || async { Ok(()) }).await.unwrap();

    assert_eq!(ids(&cache), vec!["b"]);
    assert!(cache.store().last_error().is_none());
  }

  #[tokio::test]
  async fn test_failed_delete_rollback_loses_to_refetch() {
    let cache = ResourceCache::new(FreshnessPolicy::default());
    cache
      .list(false, || async { Ok(vec![item("a"), item("b")]) })
      .await
      .unwrap();

    let store = cache.store().clone();
    let outcome = cache
      .delete("b", || async move {
        // A background refetch lands while the delete call is out
        store.complete_fetch(vec![item("a"), item("c")], Utc::now());
        Err(ApiError::Network("timeout".to_string()))
      })
      .await;

    assert!(outcome.is_err());
    // The refetched collection is authoritative; "b" stays gone
    assert_eq!(ids(&cache), vec!["a", "c"]);
    assert!(cache.store().last_error().is_some());
  }

  #[tokio::test]
  async fn test_create_inserts_at_head_after_confirmation() {
    let cache = ResourceCache::new(FreshnessPolicy::default());
    cache
      .list(false, || async { Ok(vec![item("a"), item("b"), item("c")]) })
      .await
      .unwrap();

    cache.create(|| async { Ok(item("d")) }).await.unwrap();

    assert_eq!(ids(&cache), vec!["d", "a", "b", "c"]);
  }

  #[tokio::test]
  async fn test_update_is_pessimistic() {
    let cache = ResourceCache::new(FreshnessPolicy::default());
    cache
      .list(false, || async { Ok(vec![item("a"), item("b")]) })
      .await
      .unwrap();

    let store = cache.store().clone();
    let updated = Item {
      id: "b".to_string(),
      name: "renamed".to_string(),
    };
    let response = updated.clone();

    cache
      .update("b", || async move {
        // Readers still see the old value while the call is out
        assert_eq!(store.find("b").unwrap().name, "name-b");
        Ok(response)
      })
      .await
      .unwrap();

    assert_eq!(cache.store().find("b").unwrap().name, "renamed");
    assert_eq!(ids(&cache), vec!["a", "b"]);
  }

  #[tokio::test]
  async fn test_failed_update_leaves_items_untouched() {
    let cache = ResourceCache::new(FreshnessPolicy::default());
    cache
      .list(false, || async { Ok(vec![item("a")]) })
      .await
      .unwrap();

    let outcome = cache
      .update("a", || async {
        Err(ApiError::Validation {
          message: "title is required".to_string(),
          fields: vec!["title is required".to_string()],
        })
      })
      .await;

    assert!(outcome.is_err());
    assert_eq!(cache.store().find("a").unwrap().name, "name-a");
    assert!(cache.store().last_error().is_some());
  }

  #[tokio::test]
  async fn test_get_serves_fresh_cache_without_network() {
    let cache = ResourceCache::new(FreshnessPolicy::default());
    cache
      .list(false, || async { Ok(vec![item("a"), item("b")]) })
      .await
      .unwrap();

    let calls = AtomicUsize::new(0);
    let found = cache
      .get("b", false, || async {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(item("b"))
      })
      .await
      .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(found.id, "b");
    assert_eq!(cache.store().focused().unwrap().id, "b");
  }

  #[tokio::test]
  async fn test_get_fetches_and_upserts_unknown_id() {
    let cache = ResourceCache::new(FreshnessPolicy::default());
    cache
      .list(false, || async { Ok(vec![item("a")]) })
      .await
      .unwrap();

    let found = cache
      .get("b", false, || async { Ok(item("b")) })
      .await
      .unwrap();

    assert_eq!(found.id, "b");
    assert_eq!(ids(&cache), vec!["b", "a"]);
    assert_eq!(cache.store().focused().unwrap().id, "b");
  }

  #[tokio::test]
  async fn test_update_refreshes_matching_focused() {
    let cache = ResourceCache::new(FreshnessPolicy::default());
    cache
      .list(false, || async { Ok(vec![item("a")]) })
      .await
      .unwrap();
    cache
      .get("a", false, || async { Ok(item("a")) })
      .await
      .unwrap();

    let updated = Item {
      id: "a".to_string(),
      name: "renamed".to_string(),
    };
    let response = updated.clone();
    cache.update("a", || async move { Ok(response) }).await.unwrap();

    assert_eq!(cache.store().focused().unwrap().name, "renamed");
  }
}
