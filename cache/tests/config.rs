use fibre_retaining_cache::{CacheBuilder, CacheConfig, ConfigError, PolicyKind, RetainingCache};
use pretty_assertions::assert_eq;

#[test]
fn test_yaml_config() {
  let config = CacheConfig::from_yaml_str(
    r#"
name: thumbnails
cost_limit: 1024
count_limit: 16
policy: fifo
"#,
  )
  .unwrap();

  assert_eq!(
    config,
    CacheConfig {
      name: Some("thumbnails".to_string()),
      cost_limit: 1024,
      count_limit: 16,
      policy: PolicyKind::Fifo,
    }
  );
}

#[test]
fn test_json_config_defaults() {
  let config = CacheConfig::from_json_str(r#"{ "cost_limit": 7 }"#).unwrap();
  assert_eq!(config.cost_limit, 7);
  assert_eq!(config.count_limit, 0);
  assert_eq!(config.policy, PolicyKind::Lru);
  assert_eq!(config.name, None);
}

#[test]
fn test_negative_limits_fail_fast() {
  assert_eq!(
    CacheConfig::from_yaml_str("cost_limit: -10"),
    Err(ConfigError::NegativeLimit {
      field: "cost_limit",
      value: -10
    })
  );
  assert_eq!(
    CacheConfig::from_json_str(r#"{ "count_limit": -1 }"#),
    Err(ConfigError::NegativeLimit {
      field: "count_limit",
      value: -1
    })
  );
}

#[test]
fn test_unknown_policy_is_rejected() {
  assert_eq!(
    CacheConfig::from_yaml_str("policy: clock"),
    Err(ConfigError::UnknownPolicy("clock".to_string()))
  );
}

#[test]
fn test_unknown_fields_are_rejected() {
  let err = CacheConfig::from_yaml_str("capacity: 10").unwrap_err();
  assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");

  let err = CacheConfig::from_json_str("{ not json").unwrap_err();
  assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
}

#[test]
fn test_loaded_config_builds_working_cache() {
  let config = CacheConfig::from_yaml_str("cost_limit: 10").unwrap();
  let cache: RetainingCache<&str, u32, &str> = CacheBuilder::from_config(config).build().unwrap();

  cache.set("a", 1, 6);
  cache.set("b", 2, 6);
  assert!(!cache.contains_key(&"a"));
  assert_eq!(cache.total_cost(), 6);
}

#[test]
fn test_blank_name_fails_at_build() {
  let config = CacheConfig::from_yaml_str("name: '  '\ncost_limit: 10").unwrap();
  let result = CacheBuilder::<&str, u32, &str>::from_config(config).build();
  assert_eq!(result.unwrap_err(), ConfigError::EmptyName);
}
