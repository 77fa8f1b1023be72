//! Core trait and per-resource cache state.

use chrono::{DateTime, Utc};

use crate::error::ApiError;

/// Trait for entities held in a resource cache.
pub trait Cacheable: Clone + Send + Sync + 'static {
  /// Unique identifier for this entity (the backend's `_id`)
  fn id(&self) -> &str;

  /// Resource label for log messages (e.g. "question", "quiz")
  fn resource_name() -> &'static str;
}

/// Fetch lifecycle of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
  /// Never fetched
  #[default]
  Idle,
  /// A fetch is outstanding (at most one per resource type)
  Loading,
  /// Last fetch succeeded
  Ready,
  /// Last fetch failed
  Failed,
}

/// Cached state of one resource collection.
///
/// `items` is ordered and unique by id. `focused` is the entity currently
/// under detailed view; it is a snapshot taken from `items`, not a live
/// reference, and may go stale if `items` changes afterwards.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
  items: Vec<T>,
  focused: Option<T>,
  status: FetchStatus,
  last_success_at: Option<DateTime<Utc>>,
  last_error: Option<ApiError>,
  generation: u64,
}

impl<T> Default for CacheEntry<T> {
  fn default() -> Self {
    Self {
      items: Vec::new(),
      focused: None,
      status: FetchStatus::Idle,
      last_success_at: None,
      last_error: None,
      generation: 0,
    }
  }
}

impl<T: Cacheable> CacheEntry<T> {
  pub fn items(&self) -> &[T] {
    &self.items
  }

  pub fn into_items(self) -> Vec<T> {
    self.items
  }

  pub fn focused(&self) -> Option<&T> {
    self.focused.as_ref()
  }

  pub fn status(&self) -> FetchStatus {
    self.status
  }

  pub fn last_success_at(&self) -> Option<DateTime<Utc>> {
    self.last_success_at
  }

  pub fn last_error(&self) -> Option<&ApiError> {
    self.last_error.as_ref()
  }

  /// Count of full `items` replacements. Mutations record it when they
  /// start, so a rollback can tell whether a newer fetch superseded it.
  pub fn generation(&self) -> u64 {
    self.generation
  }

  pub fn find(&self, id: &str) -> Option<&T> {
    self.items.iter().find(|item| item.id() == id)
  }

  /// Replace the whole collection. Duplicate ids keep their first
  /// occurrence. Bumps the generation.
  pub fn replace_all(&mut self, items: Vec<T>) {
    let mut unique: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
      if !unique.iter().any(|existing| existing.id() == item.id()) {
        unique.push(item);
      }
    }
    self.items = unique;
    self.generation += 1;
  }

  /// Record a successful full fetch: replace the collection, stamp the
  /// fetch time and clear any previous error.
  pub fn complete_fetch(&mut self, items: Vec<T>, now: DateTime<Utc>) {
    self.replace_all(items);
    self.status = FetchStatus::Ready;
    self.last_success_at = Some(now);
    self.last_error = None;
  }

  /// Record a failed full fetch. The previous items are kept.
  pub fn fail_fetch(&mut self, error: ApiError) {
    self.status = FetchStatus::Failed;
    self.last_error = Some(error);
  }

  /// Insert or replace by id: an existing item is replaced in place, a new
  /// one is inserted at the head (list views show newest first).
  pub fn upsert(&mut self, item: T) {
    match self.items.iter().position(|existing| existing.id() == item.id()) {
      Some(index) => self.items[index] = item,
      None => self.items.insert(0, item),
    }
  }

  /// Remove by id, returning the removed item and its position.
  pub fn remove(&mut self, id: &str) -> Option<(T, usize)> {
    let index = self.items.iter().position(|item| item.id() == id)?;
    Some((self.items.remove(index), index))
  }

  /// Re-insert a snapshot taken by [`remove`](Self::remove) at its original
  /// position, clamped to the current length.
  ///
  /// Returns `false` without touching `items` when the collection has been
  /// fully replaced since `taken_at` — a newer fetch is authoritative and
  /// must not have deleted entries resurrected into it.
  pub fn restore(&mut self, item: T, index: usize, taken_at: u64) -> bool {
    if self.generation != taken_at {
      return false;
    }
    if self.items.iter().any(|existing| existing.id() == item.id()) {
      return false;
    }
    let index = index.min(self.items.len());
    self.items.insert(index, item);
    true
  }

  pub fn set_focused(&mut self, item: Option<T>) {
    self.focused = item;
  }

  pub fn set_status(&mut self, status: FetchStatus) {
    self.status = status;
  }

  pub fn set_error(&mut self, error: ApiError) {
    self.last_error = Some(error);
  }

  pub fn clear_error(&mut self) {
    self.last_error = None;
  }
}
