//! Decides when cached data may be served without hitting the network.

use chrono::{DateTime, Duration, Utc};

use super::entry::{CacheEntry, Cacheable};

/// Time-based freshness policy.
///
/// Cached data is trusted for `ttl` after the last successful full fetch.
/// This favors instant response from cache over guaranteed freshness;
/// callers that need current data pass `force`.
#[derive(Debug, Clone, Copy)]
pub struct FreshnessPolicy {
  ttl: Duration,
}

impl Default for FreshnessPolicy {
  fn default() -> Self {
    Self {
      ttl: Duration::minutes(5),
    }
  }
}

impl FreshnessPolicy {
  pub fn new(ttl: Duration) -> Self {
    Self { ttl }
  }

  /// Set the time-to-live for cached data.
  pub fn with_ttl(mut self, ttl: Duration) -> Self {
    self.ttl = ttl;
    self
  }

  pub fn ttl(&self) -> Duration {
    self.ttl
  }

  /// Whether a fetch must hit the network.
  pub fn should_fetch<T: Cacheable>(&self, entry: &CacheEntry<T>, force: bool) -> bool {
    self.should_fetch_at(entry, force, Utc::now())
  }

  fn should_fetch_at<T: Cacheable>(
    &self,
    entry: &CacheEntry<T>,
    force: bool,
    now: DateTime<Utc>,
  ) -> bool {
    if force || entry.items().is_empty() {
      return true;
    }
    match entry.last_success_at() {
      Some(fetched_at) => now - fetched_at > self.ttl,
      None => true,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Debug, Clone)]
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

  fn entry_fetched_at(at: DateTime<Utc>) -> CacheEntry<Item> {
    let mut entry = CacheEntry::default();
    entry.complete_fetch(
      vec![Item {
        id: "a".to_string(),
      }],
      at,
    );
    entry
  }

  #[test]
  fn test_fresh_entry_is_served_from_cache() {
    let policy = FreshnessPolicy::default();
    let now = Utc::now();
    let entry = entry_fetched_at(now - Duration::minutes(2));

    assert!(!policy.should_fetch_at(&entry, false, now));
  }

  #[test]
  fn test_entry_at_ttl_boundary_is_still_fresh() {
    let policy = FreshnessPolicy::default();
    let now = Utc::now();
    let entry = entry_fetched_at(now - Duration::minutes(5));

    assert!(!policy.should_fetch_at(&entry, false, now));
  }

  #[test]
  fn test_stale_entry_must_fetch() {
    let policy = FreshnessPolicy::default();
    let now = Utc::now();
    let entry = entry_fetched_at(now - Duration::minutes(5) - Duration::seconds(1));

    assert!(policy.should_fetch_at(&entry, false, now));
  }

  #[test]
  fn test_force_always_fetches() {
    let policy = FreshnessPolicy::default();
    let now = Utc::now();
    let entry = entry_fetched_at(now);

    assert!(policy.should_fetch_at(&entry, true, now));
  }

  #[test]
  fn test_never_fetched_entry_must_fetch() {
    let policy = FreshnessPolicy::default();
    let entry: CacheEntry<Item> = CacheEntry::default();

    assert!(policy.should_fetch_at(&entry, false, Utc::now()));
  }

  #[test]
  fn test_empty_items_must_fetch_even_if_recent() {
    let policy = FreshnessPolicy::default();
    let now = Utc::now();
    let mut entry: CacheEntry<Item> = CacheEntry::default();
    entry.complete_fetch(Vec::new(), now);

    assert!(policy.should_fetch_at(&entry, false, now));
  }

  #[test]
  fn test_custom_ttl_is_respected() {
    let policy = FreshnessPolicy::default().with_ttl(Duration::seconds(30));
    let now = Utc::now();
    let entry = entry_fetched_at(now - Duration::minutes(2));

    assert!(policy.should_fetch_at(&entry, false, now));
  }
}
