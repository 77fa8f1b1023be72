//! Bookkeeping for mutations applied ahead of server confirmation.

use super::entry::Cacheable;
use super::store::Store;

/// What kind of change a mutation makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
  Create,
  Update,
  Delete,
}

/// Lifecycle of a pending mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationState {
  /// Local state changed (or, for pessimistic kinds, the server call is out)
  Applied,
  /// Server confirmed; the snapshot is discarded
  Confirmed,
  /// Server rejected; the snapshot was put back
  RolledBack,
  /// Server rejected, but a newer full fetch replaced the collection while
  /// the call was out — the fetched state wins and the rollback is a no-op
  Superseded,
}

/// One in-flight mutation and what is needed to undo it.
///
/// A delete removes the item from the cache immediately and keeps the
/// removed value, its position, and the store generation at the time. On
/// failure the snapshot is re-inserted, unless the collection was fully
/// replaced in the meantime: a completed refetch has already confirmed
/// whether the item exists, and resurrecting it would contradict the server.
#[derive(Debug)]
pub struct PendingMutation<T: Cacheable> {
  kind: MutationKind,
  target_id: Option<String>,
  snapshot: Option<(T, usize)>,
  taken_at: u64,
  state: MutationState,
}

impl<T: Cacheable> PendingMutation<T> {
  /// Optimistically remove `id` from the store and record how to undo it.
  pub fn begin_delete(store: &Store<T>, id: &str) -> Self {
    let taken_at = store.generation();
    let snapshot = store.remove(id);
    Self {
      kind: MutationKind::Delete,
      target_id: Some(id.to_string()),
      snapshot,
      taken_at,
      state: MutationState::Applied,
    }
  }

  /// Track a pessimistic create: nothing to undo, the cache is only touched
  /// after the server answers.
  pub fn begin_create() -> Self {
    Self {
      kind: MutationKind::Create,
      target_id: None,
      snapshot: None,
      taken_at: 0,
      state: MutationState::Applied,
    }
  }

  /// Track a pessimistic update of `id`.
  pub fn begin_update(id: &str) -> Self {
    Self {
      kind: MutationKind::Update,
      target_id: Some(id.to_string()),
      snapshot: None,
      taken_at: 0,
      state: MutationState::Applied,
    }
  }

  pub fn kind(&self) -> MutationKind {
    self.kind
  }

  pub fn target_id(&self) -> Option<&str> {
    self.target_id.as_deref()
  }

  pub fn state(&self) -> MutationState {
    self.state
  }

  /// Server confirmed the mutation; drop the snapshot.
  pub fn confirm(&mut self) -> MutationState {
    self.snapshot = None;
    self.state = MutationState::Confirmed;
    self.state
  }

  /// Server rejected the mutation; undo the local change if there was one
  /// and it has not been superseded by a newer full fetch.
  pub fn fail(&mut self, store: &Store<T>) -> MutationState {
    self.state = match self.snapshot.take() {
      None => MutationState::RolledBack,
      Some((item, index)) => {
        if store.restore(item, index, self.taken_at) {
          MutationState::RolledBack
        } else {
          MutationState::Superseded
        }
      }
    };
    self.state
  }
}
