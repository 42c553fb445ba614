use crate::entry::CacheEntry;
use crate::policy::{EvictionGuard, EvictionPolicy};

use core::fmt;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

/// An entry that left the store through an eviction sweep.
#[derive(Debug)]
pub(crate) struct Evicted<K, V> {
  pub(crate) key: K,
  pub(crate) value: Arc<V>,
}

/// The result of one eviction sweep.
#[derive(Debug)]
pub(crate) struct SweepOutcome<K, V> {
  /// Victims in the order they were selected.
  pub(crate) evicted: Vec<Evicted<K, V>>,
  /// True if the store is still over budget because every remaining
  /// candidate was protected.
  pub(crate) over_budget: bool,
}

impl<K, V> Default for SweepOutcome<K, V> {
  fn default() -> Self {
    Self {
      evicted: Vec::new(),
      over_budget: false,
    }
  }
}

/// The result of an insert.
#[derive(Debug)]
pub(crate) struct InsertOutcome<K, V> {
  /// The value that was overwritten, if the key was already present.
  pub(crate) replaced: Option<Arc<V>>,
  pub(crate) sweep: SweepOutcome<K, V>,
}

/// A bounded associative store enforcing a total-cost and/or entry-count
/// budget.
///
/// The store owns entry storage and cost accounting. Recency lives only in the
/// configured [`EvictionPolicy`], which also supplies victim order; every
/// candidate is checked
/// against an [`EvictionGuard`] supplied by the caller before it is removed.
/// A limit of `0` means "unlimited".
///
/// The store is not synchronised on its own; the owning cache wraps it in a
/// single lock together with the guard's state.
pub(crate) struct EvictionStore<K, V, H> {
  entries: HashMap<K, CacheEntry<V>, H>,
  policy: Box<dyn EvictionPolicy<K>>,
  total_cost: u64,
  cost_limit: u64,
  count_limit: usize,
}

impl<K, V, H> fmt::Debug for EvictionStore<K, V, H> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("EvictionStore")
      .field("len", &self.entries.len())
      .field("total_cost", &self.total_cost)
      .field("cost_limit", &self.cost_limit)
      .field("count_limit", &self.count_limit)
      .finish_non_exhaustive()
  }
}

impl<K, V, H> EvictionStore<K, V, H>
where
  K: Eq + Hash + Clone,
  H: BuildHasher,
{
  pub(crate) fn new(
    policy: Box<dyn EvictionPolicy<K>>,
    cost_limit: u64,
    count_limit: usize,
    hasher: H,
  ) -> Self {
    Self {
      entries: HashMap::with_hasher(hasher),
      policy,
      total_cost: 0,
      cost_limit,
      count_limit,
    }
  }

  /// Inserts or overwrites `key`, marks it most recent, then sweeps if the
  /// store is over budget.
  ///
  /// The key just written is never a victim of its own insert's sweep.
  pub(crate) fn insert<G>(
    &mut self,
    key: K,
    value: Arc<V>,
    cost: u64,
    guard: &G,
  ) -> InsertOutcome<K, V>
  where
    G: EvictionGuard<K> + ?Sized,
  {
    self.policy.on_insert(&key);

    let previous = self
      .entries
      .insert(key.clone(), CacheEntry::new(value, cost));
    if let Some(old) = &previous {
      self.total_cost = self.total_cost.saturating_sub(old.cost());
    }
    self.total_cost = self.total_cost.saturating_add(cost);

    let sweep = self.sweep(guard, Some(&key));
    InsertOutcome {
      replaced: previous.map(CacheEntry::into_value),
      sweep,
    }
  }

  /// Returns the value for `key` and marks it most recent.
  pub(crate) fn lookup(&mut self, key: &K) -> Option<Arc<V>> {
    let value = self.entries.get(key)?.value();
    self.policy.on_access(key);
    Some(value)
  }

  /// Returns the value for `key` without affecting its recency.
  pub(crate) fn peek(&self, key: &K) -> Option<Arc<V>> {
    self.entries.get(key).map(CacheEntry::value)
  }

  /// Unconditionally deletes `key`. The guard is not consulted.
  pub(crate) fn remove(&mut self, key: &K) -> Option<Arc<V>> {
    self.take(key).map(CacheEntry::into_value)
  }

  fn take(&mut self, key: &K) -> Option<CacheEntry<V>> {
    let entry = self.entries.remove(key)?;
    self.total_cost = self.total_cost.saturating_sub(entry.cost());
    self.policy.on_remove(key);
    Some(entry)
  }

  #[inline]
  fn within_budget(&self, cost: u64, count: usize) -> bool {
    (self.cost_limit == 0 || cost <= self.cost_limit)
      && (self.count_limit == 0 || count <= self.count_limit)
  }

  pub(crate) fn is_over_budget(&self) -> bool {
    !self.within_budget(self.total_cost, self.entries.len())
  }

  /// Removes evictable entries in policy order until the store is within
  /// budget or no evictable candidate remains.
  ///
  /// Candidates are visited once, first candidate first, so the victims of a
  /// sweep are fully determined by the policy order and the guard.
  pub(crate) fn sweep<G>(&mut self, guard: &G, exempt: Option<&K>) -> SweepOutcome<K, V>
  where
    G: EvictionGuard<K> + ?Sized,
  {
    if !self.is_over_budget() {
      return SweepOutcome::default();
    }

    let mut cost = self.total_cost;
    let mut count = self.entries.len();
    let mut victims = Vec::new();
    for key in self.policy.candidates() {
      if self.within_budget(cost, count) {
        break;
      }
      if exempt == Some(key) || !guard.is_evictable(key) {
        continue;
      }
      if let Some(entry) = self.entries.get(key) {
        cost = cost.saturating_sub(entry.cost());
        count -= 1;
        victims.push(key.clone());
      }
    }

    let evicted = victims
      .into_iter()
      .filter_map(|key| {
        let entry = self.take(&key)?;
        Some(Evicted {
          key,
          value: entry.into_value(),
        })
      })
      .collect();

    SweepOutcome {
      evicted,
      over_budget: self.is_over_budget(),
    }
  }

  pub(crate) fn contains_key(&self, key: &K) -> bool {
    self.entries.contains_key(key)
  }

  pub(crate) fn len(&self) -> usize {
    self.entries.len()
  }

  pub(crate) fn total_cost(&self) -> u64 {
    self.total_cost
  }

  pub(crate) fn cost_limit(&self) -> u64 {
    self.cost_limit
  }

  pub(crate) fn count_limit(&self) -> usize {
    self.count_limit
  }

  pub(crate) fn set_cost_limit(&mut self, limit: u64) {
    self.cost_limit = limit;
  }

  pub(crate) fn set_count_limit(&mut self, limit: usize) {
    self.count_limit = limit;
  }

  /// Drops every entry without reporting them.
  pub(crate) fn clear(&mut self) {
    self.entries.clear();
    self.policy.clear();
    self.total_cost = 0;
  }

  #[cfg(test)]
  pub(crate) fn victim_order(&self) -> Vec<K> {
    self.policy.candidates().cloned().collect()
  }
}
