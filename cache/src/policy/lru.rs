use super::recency_list::RecencyList;
use super::EvictionPolicy;

use std::hash::Hash;

/// An eviction policy that offers the least recently used entries first.
///
/// Both writes and successful lookups promote a key, so candidates come out
/// strictly least recently used first. This is the default policy.
#[derive(Debug)]
pub struct LruPolicy<K: Eq + Hash + Clone> {
  list: RecencyList<K>,
}

impl<K: Eq + Hash + Clone> LruPolicy<K> {
  pub fn new() -> Self {
    Self {
      list: RecencyList::new(),
    }
  }
}

impl<K: Eq + Hash + Clone> Default for LruPolicy<K> {
  fn default() -> Self {
    Self::new()
  }
}

impl<K> EvictionPolicy<K> for LruPolicy<K>
where
  K: Eq + Hash + Clone + Send,
{
  fn on_insert(&mut self, key: &K) {
    self.list.push_front(key.clone());
  }

  fn on_access(&mut self, key: &K) {
    self.list.move_to_front(key);
  }

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
