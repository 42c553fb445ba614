use thiserror::Error;

/// Errors that can occur when configuring a cache.
///
/// Configuration is the only place a cache can fail; every cache operation is
/// infallible.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
  /// A cost or count limit was negative. Use `0` for "unlimited".
  #[error("invalid configuration value for '{field}': {value} is negative (use 0 for unlimited)")]
  NegativeLimit { field: &'static str, value: i64 },

  /// A limit does not fit the platform's `usize`.
  #[error("invalid configuration value for '{field}': {value} is too large")]
  LimitTooLarge { field: &'static str, value: i64 },

  /// The cache name was empty or only whitespace.
  #[error("cache name cannot be empty")]
  EmptyName,

  /// The configured eviction policy name is not recognised.
  #[error("unknown eviction policy '{0}' (expected 'lru' or 'fifo')")]
  UnknownPolicy(String),

  /// The configuration document could not be deserialised.
  #[error("failed to parse configuration: {0}")]
  Parse(String),
}

/// A specialized `Result` type for configuration operations.
pub type Result<T, E = ConfigError> = std::result::Result<T, E>;
