use crate::listener::{EvictionListener, EvictionReason, PendingNotifications};
use crate::shared::CacheShared;
use crate::store::Evicted;
use crate::MetricsSnapshot;

use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// A thread-safe cache whose entries can be retained against eviction.
///
/// Entries are evicted automatically, least recently used first by default,
/// whenever the total cost or the number of entries exceeds its configured
/// limit. An entry retained under at least one token is never chosen by an
/// eviction sweep, even if that leaves the cache over budget. Dropping the
/// last token makes the entry eligible again; it is not evicted proactively.
///
/// All operations run under a single lock per cache and complete before they
/// return. Eviction listeners run on the calling thread after that lock has
/// been released.
///
/// `RetainingCache` is a cheap handle: clones share the same cache.
pub struct RetainingCache<K, V, T, H = ahash::RandomState> {
  pub(crate) shared: Arc<CacheShared<K, V, T, H>>,
}

impl<K, V, T, H> Clone for RetainingCache<K, V, T, H> {
  fn clone(&self) -> Self {
    Self {
      shared: Arc::clone(&self.shared),
    }
  }
}

impl<K, V, T, H> fmt::Debug for RetainingCache<K, V, T, H> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RetainingCache")
      .field("shared", &self.shared)
      .finish()
  }
}

impl<K, V, T, H> RetainingCache<K, V, T, H>
where
  K: Eq + Hash + Clone,
  T: Eq + Hash,
  H: BuildHasher,
{
  /// Inserts or overwrites the value for `key` with the given cost and marks
  /// it as most recently used.
  ///
  /// Retention state for `key` is left untouched. If the cache ends up over
  /// budget, other unretained entries are evicted and reported to the
  /// listener. The entry just written is never evicted by its own `set`.
  pub fn set(&self, key: K, value: V, cost: u64) {
    let pending = {
      let mut guard = self.shared.state.lock();
      let state = &mut *guard;
      let outcome = state
        .store
        .insert(key, Arc::new(value), cost, &state.retention);

      let counter = if outcome.replaced.is_some() {
        &self.shared.metrics.updates
      } else {
        &self.shared.metrics.inserts
      };
      counter.fetch_add(1, Ordering::Relaxed);

      self.shared.finish_sweep(state, outcome.sweep)
    };
    pending.deliver();
  }

  /// Returns the value for `key` and marks it as most recently used.
  pub fn get(&self, key: &K) -> Option<Arc<V>> {
    let value = self.shared.state.lock().store.lookup(key);
    let counter = if value.is_some() {
      &self.shared.metrics.hits
    } else {
      &self.shared.metrics.misses
    };
    counter.fetch_add(1, Ordering::Relaxed);
    value
  }

  /// "Peeks" at a value without updating its recency or the hit/miss counters.
  pub fn peek(&self, key: &K) -> Option<Arc<V>> {
    self.shared.state.lock().store.peek(key)
  }

  pub fn contains_key(&self, key: &K) -> bool {
    self.shared.state.lock().store.contains_key(key)
  }

  /// Removes the entry for `key` and every retention token held for it.
  ///
  /// This is an explicit removal: retention does not block it and the
  /// eviction listener is not notified. Returns the removed value, if any.
  pub fn remove(&self, key: &K) -> Option<Arc<V>> {
    let mut guard = self.shared.state.lock();
    let removed = guard.store.remove(key);
    let dropped_tokens = guard.retention.clear_key(key);
    self
      .shared
      .metrics
      .record_size(guard.store.total_cost(), guard.store.len());
    drop(guard);

    if removed.is_some() {
      self.shared.metrics.removals.fetch_add(1, Ordering::Relaxed);
    }
    tracing::trace!(
      cache = self.shared.label(),
      removed = removed.is_some(),
      dropped_tokens,
      "remove"
    );
    removed
  }

  /// Protects `key` from eviction under `token`.
  ///
  /// The key does not need to exist yet: a later `set` is protected from the
  /// moment it lands. Retaining again with a token that is already held is a
  /// no-op. Returns `true` if the token was newly added.
  pub fn retain(&self, key: K, token: T) -> bool {
    let (added, count) = {
      let mut guard = self.shared.state.lock();
      let added = guard.retention.retain(key.clone(), token);
      (added, guard.retention.count(&key))
    };

    if added {
      self.shared.metrics.retains.fetch_add(1, Ordering::Relaxed);
    }
    tracing::trace!(cache = self.shared.label(), added, count, "retain");
    added
  }

  /// Drops `token` for `key`. Releasing a token that is not held is a no-op.
  ///
  /// Once the last token is gone the entry may be chosen by a future sweep,
  /// but it is not evicted here. Returns `true` if the token was held.
  pub fn release(&self, key: &K, token: &T) -> bool {
    let (released, count) = {
      let mut guard = self.shared.state.lock();
      let released = guard.retention.release(key, token);
      (released, guard.retention.count(key))
    };

    if released {
      self.shared.metrics.releases.fetch_add(1, Ordering::Relaxed);
    }
    tracing::trace!(cache = self.shared.label(), released, count, "release");
    released
  }

  /// Drops every token held for `key`, leaving it evictable by future sweeps.
  /// Returns the number of tokens that were outstanding.
  pub fn force_release(&self, key: &K) -> usize {
    let dropped = self.shared.state.lock().retention.clear_key(key);
    if dropped > 0 {
      self
        .shared
        .metrics
        .forced_releases
        .fetch_add(1, Ordering::Relaxed);
    }
    tracing::trace!(cache = self.shared.label(), dropped, "force_release");
    dropped
  }

  /// The number of distinct tokens currently held for `key`, whether or not
  /// an entry exists for it. `0` if none.
  pub fn retain_count(&self, key: &K) -> usize {
    self.shared.state.lock().retention.count(key)
  }

  pub fn is_retained(&self, key: &K) -> bool {
    self.shared.state.lock().retention.is_retained(key)
  }

  /// Removes the entry for `key` and its retention state, and reports it to
  /// the listener with [`EvictionReason::Simulated`].
  ///
  /// Testing hook for listener wiring only. It ignores retention and does not
  /// represent a real eviction decision. Returns `true` if an entry was
  /// removed; nothing is reported otherwise.
  #[doc(hidden)]
  pub fn simulate_eviction(&self, key: &K) -> bool {
    let pending = {
      let mut guard = self.shared.state.lock();
      let state = &mut *guard;
      let removed = state.store.remove(key);
      state.retention.clear_key(key);
      self
        .shared
        .metrics
        .record_size(state.store.total_cost(), state.store.len());

      match removed {
        Some(value) => PendingNotifications::new(
          state.listener.clone(),
          vec![Evicted {
            key: key.clone(),
            value,
          }],
          EvictionReason::Simulated,
        ),
        None => PendingNotifications::none(),
      }
    };

    let evicted = !pending.is_empty();
    if evicted {
      self
        .shared
        .metrics
        .simulated_evictions
        .fetch_add(1, Ordering::Relaxed);
    }
    tracing::trace!(cache = self.shared.label(), evicted, "simulated eviction");
    pending.deliver();
    evicted
  }

  /// Removes every entry and all retention state without notifying the
  /// listener.
  pub fn clear(&self) {
    let mut guard = self.shared.state.lock();
    guard.store.clear();
    guard.retention.clear();
    self.shared.metrics.record_size(0, 0);
  }

  /// The number of entries currently stored.
  pub fn len(&self) -> usize {
    self.shared.state.lock().store.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// The sum of the costs of all stored entries.
  pub fn total_cost(&self) -> u64 {
    self.shared.state.lock().store.total_cost()
  }

  /// The total cost limit. `0` means unlimited.
  pub fn cost_limit(&self) -> u64 {
    self.shared.state.lock().store.cost_limit()
  }

  /// The entry count limit. `0` means unlimited.
  pub fn count_limit(&self) -> usize {
    self.shared.state.lock().store.count_limit()
  }

  /// Changes the total cost limit and immediately evicts unretained entries
  /// if the cache is now over budget.
  pub fn set_cost_limit(&self, limit: u64) {
    let pending = {
      let mut guard = self.shared.state.lock();
      guard.store.set_cost_limit(limit);
      tracing::debug!(cache = self.shared.label(), cost_limit = limit, "cost limit changed");
      self.shared.resweep(&mut guard)
    };
    pending.deliver();
  }

  /// Changes the entry count limit and immediately evicts unretained entries
  /// if the cache is now over budget.
  pub fn set_count_limit(&self, limit: usize) {
    let pending = {
      let mut guard = self.shared.state.lock();
      guard.store.set_count_limit(limit);
      tracing::debug!(cache = self.shared.label(), count_limit = limit, "count limit changed");
      self.shared.resweep(&mut guard)
    };
    pending.deliver();
  }

  /// Sets or replaces the eviction listener.
  ///
  /// Evictions already collected by an in-flight operation are still reported
  /// to the listener that was registered when they happened.
  pub fn set_eviction_listener<Listener>(&self, listener: Listener)
  where
    Listener: EvictionListener<K, V> + 'static,
  {
    self.shared.state.lock().listener = Some(Arc::new(listener));
  }

  /// Removes the eviction listener. Evictions are no longer reported.
  pub fn clear_eviction_listener(&self) {
    self.shared.state.lock().listener = None;
  }

  /// The name given to the cache at build time, if any.
  pub fn name(&self) -> Option<&str> {
    self.shared.name.as_deref()
  }

  pub fn metrics(&self) -> MetricsSnapshot {
    self.shared.metrics.snapshot()
  }
}
