//! Validated cache configuration, optionally loaded from YAML or JSON.
//!
//! ```yaml
//! name: thumbnails
//! cost_limit: 67108864
//! count_limit: 500
//! policy: lru
//! ```

use crate::error::{ConfigError, Result};

use std::fmt;
use std::str::FromStr;

/// The shipped victim selection orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicyKind {
  /// Least recently used first. See [`crate::policy::lru::LruPolicy`].
  #[default]
  Lru,
  /// Oldest insertion first. See [`crate::policy::fifo::FifoPolicy`].
  Fifo,
}

impl FromStr for PolicyKind {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "lru" => Ok(PolicyKind::Lru),
      "fifo" => Ok(PolicyKind::Fifo),
      _ => Err(ConfigError::UnknownPolicy(s.to_string())),
    }
  }
}

impl fmt::Display for PolicyKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PolicyKind::Lru => write!(f, "lru"),
      PolicyKind::Fifo => write!(f, "fifo"),
    }
  }
}

/// A validated cache configuration. Limits of `0` mean "unlimited".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CacheConfig {
  pub name: Option<String>,
  pub cost_limit: u64,
  pub count_limit: usize,
  pub policy: PolicyKind,
}

impl CacheConfig {
  /// Validates signed limits, rejecting negative values.
  pub fn new(cost_limit: i64, count_limit: i64) -> Result<Self> {
    Ok(Self {
      name: None,
      cost_limit: non_negative("cost_limit", cost_limit)?,
      count_limit: to_count("count_limit", count_limit)?,
      policy: PolicyKind::default(),
    })
  }

  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  pub fn with_policy(mut self, policy: PolicyKind) -> Self {
    self.policy = policy;
    self
  }
}

fn non_negative(field: &'static str, value: i64) -> Result<u64> {
  u64::try_from(value).map_err(|_| ConfigError::NegativeLimit { field, value })
}

fn to_count(field: &'static str, value: i64) -> Result<usize> {
  let value_u64 = non_negative(field, value)?;
  usize::try_from(value_u64).map_err(|_| ConfigError::LimitTooLarge { field, value })
}

#[cfg(feature = "serde")]
mod raw {
  use serde::Deserialize;

  /// Maps directly onto the YAML/JSON document. Limits are signed so that a
  /// negative value reaches validation instead of failing as a type error.
  #[derive(Debug, Deserialize, PartialEq, Default)]
  #[serde(deny_unknown_fields)]
  pub(super) struct CacheConfigRaw {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub cost_limit: Option<i64>,
    #[serde(default)]
    pub count_limit: Option<i64>,
    #[serde(default)]
    pub policy: Option<String>,
  }
}

#[cfg(feature = "serde")]
impl CacheConfig {
  fn from_raw(raw: raw::CacheConfigRaw) -> Result<Self> {
    let policy = match raw.policy {
      Some(name) => name.parse()?,
      None => PolicyKind::default(),
    };
    let mut config = CacheConfig::new(raw.cost_limit.unwrap_or(0), raw.count_limit.unwrap_or(0))?
      .with_policy(policy);
    config.name = raw.name;
    Ok(config)
  }

  /// Parses and validates a YAML document.
  pub fn from_yaml_str(yaml: &str) -> Result<Self> {
    let raw: raw::CacheConfigRaw =
      serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
    Self::from_raw(raw)
  }

  /// Parses and validates a JSON document.
  pub fn from_json_str(json: &str) -> Result<Self> {
    let raw: raw::CacheConfigRaw =
      serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
    Self::from_raw(raw)
  }
}
