use super::recency_list::RecencyList;
use super::EvictionPolicy;

use std::hash::Hash;

/// An eviction policy that offers entries in First-In, First-Out order.
///
/// Lookups and overwrites do not reorder keys; a key's position is fixed by
/// its first insert until it leaves the store.
#[derive(Debug)]
pub struct FifoPolicy<K: Eq + Hash + Clone> {
  list: RecencyList<K>,
}

impl<K: Eq + Hash + Clone> FifoPolicy<K> {
  pub fn new() -> Self {
    Self {
      list: RecencyList::new(),
    }
  }
}

impl<K: Eq + Hash + Clone> Default for FifoPolicy<K> {
  fn default() -> Self {
    Self::new()
  }
}

impl<K> EvictionPolicy<K> for FifoPolicy<K>
where
  K: Eq + Hash + Clone + Send,
{
  fn on_insert(&mut self, key: &K) {
    // Re-inserting keeps the original position.
    if !self.list.contains(key) {
      self.list.push_front(key.clone());
    }
  }

  /// A FIFO policy does not care about access patterns. This is a no-op.
  fn on_access(&mut self, _key: &K) {}

  fn on_remove(&mut self, key: &K) {
    self.list.remove(key);
  }

  fn candidates(&self) -> Box<dyn Iterator<Item = &K> + '_> {
    Box::new(self.list.iter_from_back())
  }

  fn clear(&mut self) {
    self.list.clear();
  }
}
