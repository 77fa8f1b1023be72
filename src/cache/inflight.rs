//! Collapses concurrent list fetches for one resource type into one call.

use std::future::Future;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::error::ApiError;

/// Outcome of a list fetch, shared between the leader and all waiters.
pub type FlightOutcome<T> = Result<Vec<T>, ApiError>;

/// At most one outstanding list fetch per resource type.
///
/// The first caller becomes the leader and executes the work; callers that
/// arrive while the flight is up subscribe and receive the leader's outcome
/// verbatim. The slot is cleared before any waiter is notified, so a call
/// arriving after completion always starts a fresh flight. Each resource
/// type has exactly one collection, so the registry is a single slot rather
/// than a keyed map.
pub struct Inflight<T: Clone> {
  slot: Mutex<Option<broadcast::Sender<FlightOutcome<T>>>>,
}

impl<T: Clone> Inflight<T> {
  pub fn new() -> Self {
    Self {
      slot: Mutex::new(None),
    }
  }

  /// Whether a flight is currently outstanding.
  pub fn is_loading(&self) -> bool {
    self.slot.lock().is_some()
  }

  /// Run `work` de-duplicated: lead if the slot is free, otherwise wait for
  /// the current flight's outcome. `work` runs at most once per flight.
  pub async fn run<F, Fut>(&self, work: F) -> FlightOutcome<T>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = FlightOutcome<T>>,
  {
    let waiter = {
      let mut slot = self.slot.lock();
      match slot.as_ref() {
        Some(sender) => Some(sender.subscribe()),
        None => {
          let (sender, _) = broadcast::channel(1);
          *slot = Some(sender);
          None
        }
      }
    };

    match waiter {
      Some(mut rx) => match rx.recv().await {
        Ok(outcome) => outcome,
        // The leader was dropped before it could broadcast
        Err(_) => Err(ApiError::Network(
          "fetch was abandoned before completing".to_string(),
        )),
      },
      None => {
        // Clears the slot even if this future is dropped mid-flight, so an
        // abandoned fetch never wedges the registry.
        let guard = SlotGuard { slot: &self.slot };
        let outcome = work().await;
        if let Some(sender) = guard.clear() {
          let _ = sender.send(outcome.clone());
        }
        outcome
      }
    }
  }
}

impl<T: Clone> Default for Inflight<T> {
  fn default() -> Self {
    Self::new()
  }
}

struct SlotGuard<'a, T: Clone> {
  slot: &'a Mutex<Option<broadcast::Sender<FlightOutcome<T>>>>,
}

impl<T: Clone> SlotGuard<'_, T> {
  fn clear(&self) -> Option<broadcast::Sender<FlightOutcome<T>>> {
    self.slot.lock().take()
  }
}

impl<T: Clone> Drop for SlotGuard<'_, T> {
  fn drop(&mut self) {
    self.slot.lock().take();
  }
}
