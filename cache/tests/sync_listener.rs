mod common;

use common::{build_test_cache_with_cost, RecordingListener, TestCache};
use fibre_retaining_cache::{CacheBuilder, EvictionReason, RetainingCache};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc, Mutex,
};

#[test]
fn test_listener_fires_once_per_capacity_eviction() {
  let (cache, listener) = build_test_cache_with_cost(3);
  for key in ["a", "b", "c", "d", "e"] {
    cache.set(key, key.to_uppercase(), 1);
  }

  assert_eq!(
    listener.events(),
    vec![
      ("a", "A".to_string(), EvictionReason::Capacity),
      ("b", "B".to_string(), EvictionReason::Capacity),
    ]
  );
  assert_eq!(cache.metrics().evicted_by_capacity, 2);
}

#[test]
fn test_listener_not_called_for_explicit_removal_or_overwrite() {
  let (cache, listener) = build_test_cache_with_cost(100);
  cache.set("a", "one".to_string(), 1);
  cache.set("a", "two".to_string(), 1);
  cache.set("b", "bee".to_string(), 1);

  cache.remove(&"a");
  cache.clear();

  assert_eq!(listener.count(), 0);
}

#[test]
fn test_single_sweep_reports_every_victim() {
  let (cache, listener) = build_test_cache_with_cost(10);
  cache.set("a", "a".to_string(), 3);
  cache.set("b", "b".to_string(), 3);
  cache.set("c", "c".to_string(), 3);

  cache.set("big", "big".to_string(), 8);

  assert_eq!(listener.keys(), vec!["a", "b", "c"]);
  assert_eq!(cache.total_cost(), 8);
}

#[test]
fn test_simulated_eviction_bypasses_retention() {
  let (cache, listener) = build_test_cache_with_cost(0);
  cache.set("a", "alpha".to_string(), 1);
  cache.retain("a", "t1");

  assert!(cache.simulate_eviction(&"a"));

  assert_eq!(
    listener.events(),
    vec![("a", "alpha".to_string(), EvictionReason::Simulated)]
  );
  assert!(!cache.contains_key(&"a"));
  assert_eq!(cache.retain_count(&"a"), 0);
  assert_eq!(cache.metrics().simulated_evictions, 1);
}

#[test]
fn test_simulated_eviction_of_absent_key_reports_nothing() {
  let (cache, listener) = build_test_cache_with_cost(0);
  cache.retain("ghost", "t1");

  assert!(!cache.simulate_eviction(&"ghost"));
  assert_eq!(listener.count(), 0);
  assert_eq!(cache.retain_count(&"ghost"), 0, "Retention state is cleared");
}

#[test]
fn test_listener_can_be_replaced_and_cleared() {
  let (cache, first) = build_test_cache_with_cost(1);
  cache.set("a", "a".to_string(), 1);
  cache.set("b", "b".to_string(), 1);

  let second = RecordingListener::new();
  cache.set_eviction_listener(second.clone());
  cache.set("c", "c".to_string(), 1);

  cache.clear_eviction_listener();
  cache.set("d", "d".to_string(), 1);

  assert_eq!(first.keys(), vec!["a"]);
  assert_eq!(second.keys(), vec!["b"]);
  assert_eq!(cache.metrics().evicted_by_capacity, 3);
}

#[test]
fn test_closure_listener() {
  let seen = Arc::new(Mutex::new(Vec::new()));
  let cache: RetainingCache<u32, u32, u8> = CacheBuilder::new()
    .count_limit(1)
    .eviction_listener({
      let seen = seen.clone();
      move |key: u32, value: Arc<u32>, reason: EvictionReason| {
        seen.lock().unwrap().push((key, *value, reason));
      }
    })
    .build().unwrap();

  cache.set(1, 10, 0);
  cache.set(2, 20, 0);

  assert_eq!(
    *seen.lock().unwrap(),
    vec![(1, 10, EvictionReason::Capacity)]
  );
}

#[test]
fn test_entry_is_gone_when_listener_runs() {
  // The listener calls back into the cache; this must neither deadlock nor
  // observe the entry being evicted.
  let slot: Arc<Mutex<Option<TestCache>>> = Arc::new(Mutex::new(None));
  let still_present = Arc::new(AtomicUsize::new(0));
  let calls = Arc::new(AtomicUsize::new(0));

  let cache: TestCache = CacheBuilder::new()
    .count_limit(1)
    .eviction_listener({
      let slot = slot.clone();
      let still_present = still_present.clone();
      let calls = calls.clone();
      move |key: &'static str, _value: Arc<String>, _reason: EvictionReason| {
        calls.fetch_add(1, Ordering::SeqCst);
        let guard = slot.lock().unwrap();
        if let Some(cache) = guard.as_ref() {
          if cache.contains_key(&key) || cache.retain_count(&key) > 0 {
            still_present.fetch_add(1, Ordering::SeqCst);
          }
        }
      }
    })
    .build().unwrap();
  *slot.lock().unwrap() = Some(cache.clone());

  cache.set("a", "a".to_string(), 1);
  cache.set("b", "b".to_string(), 1);
  cache.set("c", "c".to_string(), 1);

  assert_eq!(calls.load(Ordering::SeqCst), 2);
  assert_eq!(still_present.load(Ordering::SeqCst), 0);

  // Break the reference cycle between the cache and its listener.
  slot.lock().unwrap().take();
}

#[test]
fn test_shrinking_limit_reports_evictions() {
  let (cache, listener) = build_test_cache_with_cost(0);
  cache.set("a", "a".to_string(), 5);
  cache.set("b", "b".to_string(), 5);
  cache.retain("a", "t1");
  cache.set("c", "c".to_string(), 5);

  cache.set_cost_limit(6);

  // No entry is exempt from a limit change sweep, so both unretained
  // entries go, oldest first.
  assert_eq!(listener.keys(), vec!["b", "c"]);
  assert!(cache.contains_key(&"a"));
  assert_eq!(cache.total_cost(), 5);
  assert_eq!(cache.cost_limit(), 6);
}
