#![allow(dead_code)]

use std::sync::Arc;

use fibre_retaining_cache::{CacheBuilder, EvictionListener, EvictionReason, RetainingCache};
use parking_lot::Mutex;

pub type TestCache = RetainingCache<&'static str, String, &'static str>;

/// Records every notification it receives, in order.
#[derive(Clone, Default)]
pub struct RecordingListener {
  events: Arc<Mutex<Vec<(&'static str, String, EvictionReason)>>>,
}

impl RecordingListener {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn events(&self) -> Vec<(&'static str, String, EvictionReason)> {
    self.events.lock().clone()
  }

  pub fn keys(&self) -> Vec<&'static str> {
    self.events.lock().iter().map(|(key, _, _)| *key).collect()
  }

  pub fn count(&self) -> usize {
    self.events.lock().len()
  }
}

impl EvictionListener<&'static str, String> for RecordingListener {
  fn on_evict(&self, key: &'static str, value: Arc<String>, reason: EvictionReason) {
    self.events.lock().push((key, (*value).clone(), reason));
  }
}

/// Builds a cost-limited LRU cache wired to a fresh recording listener.
pub fn build_test_cache_with_cost(cost_limit: u64) -> (TestCache, RecordingListener) {
  let listener = RecordingListener::new();
  let cache = CacheBuilder::new()
    .cost_limit(cost_limit)
    .eviction_listener(listener.clone())
    .build().unwrap();
  (cache, listener)
}

/// Builds a count-limited LRU cache wired to a fresh recording listener.
pub fn build_test_cache_with_count(count_limit: usize) -> (TestCache, RecordingListener) {
  let listener = RecordingListener::new();
  let cache = CacheBuilder::new()
    .count_limit(count_limit)
    .eviction_listener(listener.clone())
    .build().unwrap();
  (cache, listener)
}
