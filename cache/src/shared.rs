use crate::listener::{EvictionListener, EvictionReason, PendingNotifications};
use crate::metrics::Metrics;
use crate::retention::RetentionTable;
use crate::store::{EvictionStore, SweepOutcome};

use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::sync::atomic::Ordering;
use std::sync::Arc;

use parking_lot::Mutex;

const UNNAMED: &str = "unnamed";

/// Everything guarded by the cache's single lock.
///
/// The entry table and the retention table live under the same mutex so that
/// an evictability decision and the token count it reads are atomic with
/// respect to `retain`/`release` on the same key.
pub(crate) struct CacheState<K, V, T, H> {
  pub(crate) store: EvictionStore<K, V, H>,
  pub(crate) retention: RetentionTable<K, T>,
  pub(crate) listener: Option<Arc<dyn EvictionListener<K, V>>>,
}

/// The internal, thread-safe core of the cache.
pub(crate) struct CacheShared<K, V, T, H> {
  pub(crate) state: Mutex<CacheState<K, V, T, H>>,
  pub(crate) metrics: Metrics,
  pub(crate) name: Option<String>,
}

impl<K, V, T, H> fmt::Debug for CacheShared<K, V, T, H> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CacheShared")
      .field("name", &self.name)
      .field("metrics", &self.metrics.snapshot())
      .finish_non_exhaustive()
  }
}

impl<K, V, T, H> CacheShared<K, V, T, H>
where
  K: Eq + Hash + Clone,
  T: Eq + Hash,
  H: BuildHasher,
{
  pub(crate) fn new(
    store: EvictionStore<K, V, H>,
    listener: Option<Arc<dyn EvictionListener<K, V>>>,
    name: Option<String>,
  ) -> Self {
    Self {
      state: Mutex::new(CacheState {
        store,
        retention: RetentionTable::new(),
        listener,
      }),
      metrics: Metrics::new(),
      name,
    }
  }

  #[inline]
  pub(crate) fn label(&self) -> &str {
    self.name.as_deref().unwrap_or(UNNAMED)
  }

  /// Accounts for a finished sweep and prepares its notifications.
  ///
  /// Must be called with the lock held; the returned value must be delivered
  /// after the lock is released.
  pub(crate) fn finish_sweep(
    &self,
    state: &CacheState<K, V, T, H>,
    sweep: SweepOutcome<K, V>,
  ) -> PendingNotifications<K, V> {
    self
      .metrics
      .record_size(state.store.total_cost(), state.store.len());

    if sweep.over_budget {
      self.metrics.overflow_sweeps.fetch_add(1, Ordering::Relaxed);
      tracing::debug!(
        cache = self.label(),
        total_cost = state.store.total_cost(),
        cost_limit = state.store.cost_limit(),
        count = state.store.len(),
        count_limit = state.store.count_limit(),
        "sweep left cache over budget; remaining candidates are retained"
      );
    }

    if sweep.evicted.is_empty() {
      return PendingNotifications::none();
    }

    let evicted = sweep.evicted.len();
    self
      .metrics
      .evicted_by_capacity
      .fetch_add(evicted as u64, Ordering::Relaxed);
    tracing::debug!(
      cache = self.label(),
      evicted,
      total_cost = state.store.total_cost(),
      count = state.store.len(),
      "evicted entries over budget"
    );

    PendingNotifications::new(state.listener.clone(), sweep.evicted, EvictionReason::Capacity)
  }

  /// Re-runs the budget sweep after a limit change.
  pub(crate) fn resweep(&self, state: &mut CacheState<K, V, T, H>) -> PendingNotifications<K, V> {
    let sweep = state.store.sweep(&state.retention, None);
    self.finish_sweep(state, sweep)
  }
}
