use std::sync::Arc;

/// A container for a value in the store, holding the metadata the store needs
/// for budget accounting.
#[derive(Debug)]
pub(crate) struct CacheEntry<V> {
  /// The user's value, wrapped in an Arc so handles can be given out cheaply.
  value: Arc<V>,
  /// The cost associated with this entry.
  cost: u64,
}

impl<V> CacheEntry<V> {
  /// Creates a new `CacheEntry`.
  pub(crate) fn new(value: Arc<V>, cost: u64) -> Self {
    Self { value, cost }
  }

  /// Returns a clone of the `Arc` containing the value.
  #[inline]
  pub(crate) fn value(&self) -> Arc<V> {
    self.value.clone()
  }

  /// Returns the cost of the entry.
  #[inline]
  pub(crate) fn cost(&self) -> u64 {
    self.cost
  }

  /// Consumes the entry, handing back its value.
  #[inline]
  pub(crate) fn into_value(self) -> Arc<V> {
    self.value
  }
}
