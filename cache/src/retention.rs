use crate::policy::EvictionGuard;

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Per-key sets of outstanding retention tokens.
///
/// A key with a non-empty token set must not be chosen as an eviction victim.
/// Token sets are created lazily on the first `retain` and dropped as soon as
/// they become empty, so the table only ever holds keys that are retained.
/// Retaining a key that has no entry yet is allowed.
#[derive(Debug)]
pub(crate) struct RetentionTable<K, T> {
  tokens: HashMap<K, HashSet<T>>,
}

impl<K, T> RetentionTable<K, T>
where
  K: Eq + Hash,
  T: Eq + Hash,
{
  pub(crate) fn new() -> Self {
    Self {
      tokens: HashMap::new(),
    }
  }

  /// Adds `token` to the key's set. Returns `false` if it was already there.
  pub(crate) fn retain(&mut self, key: K, token: T) -> bool {
    self.tokens.entry(key).or_default().insert(token)
  }

  /// Removes `token` from the key's set. Returns `false` if it was absent.
  pub(crate) fn release(&mut self, key: &K, token: &T) -> bool {
    let Some(set) = self.tokens.get_mut(key) else {
      return false;
    };
    let removed = set.remove(token);
    if set.is_empty() {
      self.tokens.remove(key);
    }
    removed
  }

  /// Drops every token for `key`. Returns how many were outstanding.
  pub(crate) fn clear_key(&mut self, key: &K) -> usize {
    self.tokens.remove(key).map_or(0, |set| set.len())
  }

  pub(crate) fn count(&self, key: &K) -> usize {
    self.tokens.get(key).map_or(0, HashSet::len)
  }

  pub(crate) fn is_retained(&self, key: &K) -> bool {
    self.tokens.contains_key(key)
  }

  pub(crate) fn clear(&mut self) {
    self.tokens.clear();
  }
}

impl<K, T> EvictionGuard<K> for RetentionTable<K, T>
where
  K: Eq + Hash,
  T: Eq + Hash,
{
  #[inline]
  fn is_evictable(&self, key: &K) -> bool {
    !self.is_retained(key)
  }
}
