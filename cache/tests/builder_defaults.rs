use fibre_retaining_cache::{CacheBuilder, CacheConfig, ConfigError, PolicyKind, RetainingCache};

#[test]
fn test_default_builder_is_unbounded() {
  let cache: RetainingCache<u64, u64, u64> = CacheBuilder::default().build().unwrap();

  for i in 0..1_000 {
    cache.set(i, i, 1_000);
  }
  assert_eq!(cache.len(), 1_000);
  assert_eq!(cache.cost_limit(), 0);
  assert_eq!(cache.count_limit(), 0);
  assert_eq!(cache.metrics().evicted_by_capacity, 0);
  assert_eq!(cache.name(), None);
}

#[test]
fn test_unbounded_clears_previous_limits() {
  let cache: RetainingCache<u64, u64, u64> = CacheBuilder::new()
    .cost_limit(1)
    .count_limit(1)
    .unbounded()
    .build().unwrap();

  cache.set(1, 1, 5);
  cache.set(2, 2, 5);
  assert_eq!(cache.len(), 2);
}

#[test]
fn test_builder_from_config() {
  let config = CacheConfig::new(10, 2)
    .unwrap()
    .with_name("thumbnails")
    .with_policy(PolicyKind::Fifo);
  let cache: RetainingCache<u64, u64, u64> = CacheBuilder::from_config(config).build().unwrap();

  assert_eq!(cache.name(), Some("thumbnails"));
  assert_eq!(cache.cost_limit(), 10);
  assert_eq!(cache.count_limit(), 2);

  cache.set(1, 1, 1);
  cache.set(2, 2, 1);
  cache.get(&1);
  cache.set(3, 3, 1);
  assert!(!cache.contains_key(&1), "FIFO ignores the read of key 1");
}

#[test]
fn test_custom_hasher() {
  let cache: RetainingCache<u64, u64, u64, std::collections::hash_map::RandomState> =
    CacheBuilder::new()
      .count_limit(2)
      .hasher(std::collections::hash_map::RandomState::new())
      .build().unwrap();

  cache.set(1, 1, 0);
  cache.set(2, 2, 0);
  cache.set(3, 3, 0);
  assert_eq!(cache.len(), 2);
  assert!(!cache.contains_key(&1));
}

#[test]
fn test_build_rejects_empty_name() {
  let err = CacheBuilder::<u64, u64, u64>::new().name("").build().unwrap_err();
  assert_eq!(err, ConfigError::EmptyName);
  assert_eq!(err.to_string(), "cache name cannot be empty");

  let result: Result<RetainingCache<u64, u64, u64>, ConfigError> =
    CacheBuilder::new().name("hot").count_limit(1).build();
  assert_eq!(result.unwrap().name(), Some("hot"));
}

#[cfg(feature = "rapidhash")]
#[test]
fn test_rapidhash_builder() {
  let cache: RetainingCache<u64, u64, u64, rapidhash::RapidRandomState> =
    CacheBuilder::rapidhash().count_limit(2).build().unwrap();

  cache.set(1, 1, 0);
  cache.set(2, 2, 0);
  cache.set(3, 3, 0);
  assert_eq!(cache.len(), 2);
  assert!(!cache.contains_key(&1));
  assert_eq!(cache.get(&3).as_deref(), Some(&3));
}

#[test]
fn test_debug_output_names_cache() {
  let builder = CacheBuilder::<u64, u64, u64>::new().name("debuggable");
  assert!(format!("{:?}", builder).contains("debuggable"));

  let cache = builder.build().unwrap();
  assert!(format!("{:?}", cache).contains("debuggable"));
}

#[test]
fn test_cache_is_send_and_sync() {
  fn assert_send_sync<T: Send + Sync>() {}
  assert_send_sync::<RetainingCache<String, Vec<u8>, u64>>();
}
