pub mod fifo;
pub mod lru;

pub(crate) mod recency_list;

/// Decides whether a candidate victim may actually be removed by an
/// eviction sweep.
///
/// The store consults the guard for every candidate before removing it.
/// Explicit removal never goes through the guard.
pub trait EvictionGuard<K: ?Sized> {
  fn is_evictable(&self, key: &K) -> bool;
}

impl<K: ?Sized, F> EvictionGuard<K> for F
where
  F: Fn(&K) -> bool,
{
  #[inline]
  fn is_evictable(&self, key: &K) -> bool {
    self(key)
  }
}

/// A trait for implementing victim selection orders.
///
/// The policy only tracks keys and their order. Cost accounting, budget
/// checks and the evictability decision belong to the store that drives it,
/// so a policy can be swapped without affecting retention.
///
/// All methods are called while the owning cache's lock is held.
pub trait EvictionPolicy<K>: Send {
  /// Called when a key is written, whether it is new or overwritten.
  fn on_insert(&mut self, key: &K);

  /// Called on a successful lookup.
  fn on_access(&mut self, key: &K);

  /// Called when a key leaves the store for any reason.
  fn on_remove(&mut self, key: &K);

  /// Returns every tracked key, first eviction candidate first.
  ///
  /// The order must be deterministic for a given history of calls.
  fn candidates(&self) -> Box<dyn Iterator<Item = &K> + '_>;

  /// Clears all state from the policy.
  fn clear(&mut self);
}
