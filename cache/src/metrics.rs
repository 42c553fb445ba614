use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crossbeam_utils::CachePadded;

/// A thread-safe, internal metrics collector for the cache.
/// All fields are atomic so snapshots can be taken without the cache lock.
#[derive(Debug)]
pub(crate) struct Metrics {
  // --- Hit/Miss Ratios ---
  pub(crate) hits: CachePadded<AtomicU64>,
  pub(crate) misses: CachePadded<AtomicU64>,

  // --- Throughput ---
  pub(crate) inserts: CachePadded<AtomicU64>,
  pub(crate) updates: CachePadded<AtomicU64>,
  pub(crate) removals: CachePadded<AtomicU64>,

  // --- Eviction Stats ---
  pub(crate) evicted_by_capacity: CachePadded<AtomicU64>,
  pub(crate) simulated_evictions: CachePadded<AtomicU64>,
  pub(crate) overflow_sweeps: CachePadded<AtomicU64>,

  // --- Retention ---
  pub(crate) retains: CachePadded<AtomicU64>,
  pub(crate) releases: CachePadded<AtomicU64>,
  pub(crate) forced_releases: CachePadded<AtomicU64>,

  // --- Cost / Size ---
  pub(crate) current_cost: CachePadded<AtomicU64>,
  pub(crate) current_count: CachePadded<AtomicU64>,

  created_at: Instant,
}

impl Default for Metrics {
  fn default() -> Self {
    Self {
      hits: CachePadded::new(AtomicU64::new(0)),
      misses: CachePadded::new(AtomicU64::new(0)),
      inserts: CachePadded::new(AtomicU64::new(0)),
      updates: CachePadded::new(AtomicU64::new(0)),
      removals: CachePadded::new(AtomicU64::new(0)),
      evicted_by_capacity: CachePadded::new(AtomicU64::new(0)),
      simulated_evictions: CachePadded::new(AtomicU64::new(0)),
      overflow_sweeps: CachePadded::new(AtomicU64::new(0)),
      retains: CachePadded::new(AtomicU64::new(0)),
      releases: CachePadded::new(AtomicU64::new(0)),
      forced_releases: CachePadded::new(AtomicU64::new(0)),
      current_cost: CachePadded::new(AtomicU64::new(0)),
      current_count: CachePadded::new(AtomicU64::new(0)),
      created_at: Instant::now(),
    }
  }
}

impl Metrics {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  /// Publishes the store's current size. Called with the cache lock held.
  #[inline]
  pub(crate) fn record_size(&self, cost: u64, count: usize) {
    self.current_cost.store(cost, Ordering::Relaxed);
    self.current_count.store(count as u64, Ordering::Relaxed);
  }

  /// Creates a point-in-time snapshot of the current metrics.
  pub(crate) fn snapshot(&self) -> MetricsSnapshot {
    let hits = self.hits.load(Ordering::Relaxed);
    let misses = self.misses.load(Ordering::Relaxed);
    let total_lookups = hits + misses;

    MetricsSnapshot {
      hits,
      misses,
      hit_ratio: if total_lookups == 0 {
        0.0
      } else {
        hits as f64 / total_lookups as f64
      },
      inserts: self.inserts.load(Ordering::Relaxed),
      updates: self.updates.load(Ordering::Relaxed),
      removals: self.removals.load(Ordering::Relaxed),
      evicted_by_capacity: self.evicted_by_capacity.load(Ordering::Relaxed),
      simulated_evictions: self.simulated_evictions.load(Ordering::Relaxed),
      overflow_sweeps: self.overflow_sweeps.load(Ordering::Relaxed),
      retains: self.retains.load(Ordering::Relaxed),
      releases: self.releases.load(Ordering::Relaxed),
      forced_releases: self.forced_releases.load(Ordering::Relaxed),
      current_cost: self.current_cost.load(Ordering::Relaxed),
      current_count: self.current_count.load(Ordering::Relaxed),
      uptime_secs: self.created_at.elapsed().as_secs(),
    }
  }
}

/// A point-in-time, public-facing snapshot of the cache's metrics.
#[derive(Clone)]
pub struct MetricsSnapshot {
  /// The number of successful lookups.
  pub hits: u64,
  /// The number of failed lookups.
  pub misses: u64,
  /// The cache hit ratio (hits / (hits + misses)).
  pub hit_ratio: f64,
  /// The number of `set` calls that created a new entry.
  pub inserts: u64,
  /// The number of `set` calls that overwrote an existing entry.
  pub updates: u64,
  /// The number of entries removed explicitly via `remove`.
  pub removals: u64,
  /// The number of entries evicted by budget sweeps.
  pub evicted_by_capacity: u64,
  /// The number of entries removed through the simulation hook.
  pub simulated_evictions: u64,
  /// The number of sweeps that left the cache over budget because every
  /// remaining candidate was retained.
  pub overflow_sweeps: u64,
  /// The number of `retain` calls that added a new token.
  pub retains: u64,
  /// The number of `release` calls that removed a token.
  pub releases: u64,
  /// The number of `force_release` calls that dropped at least one token.
  pub forced_releases: u64,
  /// The current total cost of all entries.
  pub current_cost: u64,
  /// The current number of entries.
  pub current_count: u64,
  /// The number of seconds the cache has been running.
  pub uptime_secs: u64,
}

impl fmt::Debug for MetricsSnapshot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("MetricsSnapshot")
      .field("hits", &self.hits)
      .field("misses", &self.misses)
      .field("hit_ratio", &format!("{:.2}%", self.hit_ratio * 100.0))
      .field("inserts", &self.inserts)
      .field("updates", &self.updates)
      .field("removals", &self.removals)
      .field("evicted_by_capacity", &self.evicted_by_capacity)
      .field("simulated_evictions", &self.simulated_evictions)
      .field("overflow_sweeps", &self.overflow_sweeps)
      .field("retains", &self.retains)
      .field("releases", &self.releases)
      .field("forced_releases", &self.forced_releases)
      .field("current_cost", &self.current_cost)
      .field("current_count", &self.current_count)
      .field("uptime_secs", &self.uptime_secs)
      .finish()
  }
}
