use crate::config::{CacheConfig, PolicyKind};
use crate::error::{ConfigError, Result};
use crate::handles::RetainingCache;
use crate::listener::EvictionListener;
use crate::policy::fifo::FifoPolicy;
use crate::policy::lru::LruPolicy;
use crate::policy::EvictionPolicy;
use crate::shared::CacheShared;
use crate::store::EvictionStore;

use core::fmt;
use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;
use std::sync::Arc;

/// A builder for creating `RetainingCache` instances.
///
/// `K` is the key type, `V` the value type and `T` the retention token type.
pub struct CacheBuilder<K, V, T, H = ahash::RandomState> {
  name: Option<String>,
  cost_limit: u64,
  count_limit: usize,
  hasher: H,
  policy_kind: PolicyKind,
  cache_policy: Option<Box<dyn EvictionPolicy<K>>>,
  listener: Option<Arc<dyn EvictionListener<K, V>>>,
  _token_marker: PhantomData<fn() -> T>,
}

impl<K, V, T, H> fmt::Debug for CacheBuilder<K, V, T, H> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CacheBuilder")
      .field("name", &self.name)
      .field("cost_limit", &self.cost_limit)
      .field("count_limit", &self.count_limit)
      .field("policy_kind", &self.policy_kind)
      .field("has_custom_policy", &self.cache_policy.is_some())
      .field("has_listener", &self.listener.is_some())
      .finish_non_exhaustive()
  }
}

// --- General Configuration Methods ---
impl<K, V, T, H> CacheBuilder<K, V, T, H> {
  /// Sets the maximum total cost of the cache. `0` means unlimited.
  pub fn cost_limit(mut self, limit: u64) -> Self {
    self.cost_limit = limit;
    self
  }

  /// Sets the maximum number of entries in the cache. `0` means unlimited.
  pub fn count_limit(mut self, limit: usize) -> Self {
    self.count_limit = limit;
    self
  }

  /// Removes both limits. Nothing is ever evicted automatically.
  pub fn unbounded(mut self) -> Self {
    self.cost_limit = 0;
    self.count_limit = 0;
    self
  }

  /// Names the cache. The name is attached to its log events.
  pub fn name(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  /// Sets the eviction listener for the cache.
  pub fn eviction_listener<Listener>(mut self, listener: Listener) -> Self
  where
    Listener: EvictionListener<K, V> + 'static,
  {
    self.listener = Some(Arc::new(listener));
    self
  }

  /// Selects one of the shipped victim orders. Defaults to LRU.
  ///
  /// Ignored if a custom policy is set with [`Self::cache_policy`].
  pub fn policy(mut self, kind: PolicyKind) -> Self {
    self.policy_kind = kind;
    self
  }

  /// Sets a custom victim order for the cache.
  pub fn cache_policy<Policy>(mut self, policy: Policy) -> Self
  where
    Policy: EvictionPolicy<K> + 'static,
  {
    self.cache_policy = Some(Box::new(policy));
    self
  }

  /// Replaces the hasher used for the cache's entry table.
  pub fn hasher<H2: BuildHasher>(self, hasher: H2) -> CacheBuilder<K, V, T, H2> {
    CacheBuilder {
      name: self.name,
      cost_limit: self.cost_limit,
      count_limit: self.count_limit,
      hasher,
      policy_kind: self.policy_kind,
      cache_policy: self.cache_policy,
      listener: self.listener,
      _token_marker: PhantomData,
    }
  }
}

// --- Default Constructor ---
impl<K, V, T> CacheBuilder<K, V, T> {
  /// Creates a new `CacheBuilder` with default settings: no limits, LRU,
  /// `ahash` hashing.
  pub fn new() -> Self {
    Self {
      name: None,
      cost_limit: 0,
      count_limit: 0,
      hasher: ahash::RandomState::new(),
      policy_kind: PolicyKind::default(),
      cache_policy: None,
      listener: None,
      _token_marker: PhantomData,
    }
  }

  /// Creates a builder seeded from a validated [`CacheConfig`].
  pub fn from_config(config: CacheConfig) -> Self {
    let builder = Self::new()
      .cost_limit(config.cost_limit)
      .count_limit(config.count_limit)
      .policy(config.policy);
    match config.name {
      Some(name) => builder.name(name),
      None => builder,
    }
  }
}

impl<K, V, T> Default for CacheBuilder<K, V, T> {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(feature = "rapidhash")]
impl<K, V, T> CacheBuilder<K, V, T, rapidhash::RapidRandomState> {
  /// Creates a new `CacheBuilder` that hashes keys with `rapidhash`.
  pub fn rapidhash() -> Self {
    CacheBuilder::<K, V, T>::new().hasher(rapidhash::RapidRandomState::default())
  }
}

// --- Build Methods ---
impl<K, V, T, H> CacheBuilder<K, V, T, H>
where
  K: Eq + Hash + Clone + Send + 'static,
  V: Send + Sync + 'static,
  T: Eq + Hash + Send + 'static,
  H: BuildHasher + Send + 'static,
{
  /// Builds the cache.
  pub fn build(self) -> Result<RetainingCache<K, V, T, H>> {
    self.validate()?;

    let policy: Box<dyn EvictionPolicy<K>> = match self.cache_policy {
      Some(policy) => policy,
      None => match self.policy_kind {
        PolicyKind::Lru => Box::new(LruPolicy::new()),
        PolicyKind::Fifo => Box::new(FifoPolicy::new()),
      },
    };
    let store = EvictionStore::new(policy, self.cost_limit, self.count_limit, self.hasher);

    tracing::debug!(
      cache = self.name.as_deref().unwrap_or("unnamed"),
      cost_limit = self.cost_limit,
      count_limit = self.count_limit,
      "built retaining cache"
    );

    Ok(RetainingCache {
      shared: Arc::new(CacheShared::new(store, self.listener, self.name)),
    })
  }

  /// Validates the builder configuration.
  pub(crate) fn validate(&self) -> Result<()> {
    if self.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
      return Err(ConfigError::EmptyName);
    }
    Ok(())
  }
}
