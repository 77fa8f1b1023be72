//! Client-side caching for quiz resources.
//!
//! One cache entry per resource type, holding the collection, a focused
//! entity and fetch metadata. The manager layered on top:
//! - serves lists from cache within a configurable TTL
//! - collapses concurrent fetches for a collection into one network call
//! - deletes optimistically with rollback on failure, creates and updates
//!   pessimistically

mod entry;
mod inflight;
mod manager;
mod mutation;
mod policy;
mod store;

pub use entry::{CacheEntry, Cacheable, FetchStatus};
pub use inflight::{FlightOutcome, Inflight};
pub use manager::ResourceCache;
pub use mutation::{MutationKind, MutationState, PendingMutation};
pub use policy::FreshnessPolicy;
pub use store::Store;
