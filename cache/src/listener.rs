use crate::store::Evicted;

use std::fmt;
use std::sync::Arc;

/// Describes why an entry was evicted from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionReason {
  /// The entry was chosen by a sweep because the cache exceeded its cost or
  /// count limit.
  Capacity,
  /// The entry was removed through the testing hook
  /// `RetainingCache::simulate_eviction`. This is not a real eviction decision
  /// and ignores retention.
  Simulated,
}

impl fmt::Display for EvictionReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      EvictionReason::Capacity => write!(f, "evicted due to capacity"),
      EvictionReason::Simulated => write!(f, "evicted by simulation"),
    }
  }
}

/// A listener that can be registered with the cache to receive notifications
/// when entries are evicted.
///
/// `on_evict` is called exactly once per evicted entry, on the thread that
/// performed the operation, after the cache lock has been released. By then
/// the entry is already gone from the cache, so the listener may call back
/// into it. Explicit removals (`remove`, `clear`) and overwrites are never
/// reported.
pub trait EvictionListener<K, V>: Send + Sync {
  fn on_evict(&self, key: K, value: Arc<V>, reason: EvictionReason);
}

impl<K, V, F> EvictionListener<K, V> for F
where
  F: Fn(K, Arc<V>, EvictionReason) + Send + Sync,
{
  fn on_evict(&self, key: K, value: Arc<V>, reason: EvictionReason) {
    self(key, value, reason)
  }
}

/// Entries removed under the lock, waiting to be reported once it is released.
pub(crate) struct PendingNotifications<K, V> {
  listener: Option<Arc<dyn EvictionListener<K, V>>>,
  evicted: Vec<Evicted<K, V>>,
  reason: EvictionReason,
}

impl<K, V> PendingNotifications<K, V> {
  pub(crate) fn none() -> Self {
    Self {
      listener: None,
      evicted: Vec::new(),
      reason: EvictionReason::Capacity,
    }
  }

  pub(crate) fn new(
    listener: Option<Arc<dyn EvictionListener<K, V>>>,
    evicted: Vec<Evicted<K, V>>,
    reason: EvictionReason,
  ) -> Self {
    Self {
      listener,
      evicted,
      reason,
    }
  }

  pub(crate) fn is_empty(&self) -> bool {
    self.evicted.is_empty()
  }

  /// Hands every pending entry to the listener. Must be called without the
  /// cache lock held.
  pub(crate) fn deliver(self) {
    let Some(listener) = self.listener else {
      return;
    };
    for Evicted { key, value } in self.evicted {
      listener.on_evict(key, value, self.reason);
    }
  }
}
