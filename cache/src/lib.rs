//! A concurrent key-value cache with cost and count bounded eviction, where
//! callers can pin entries against eviction with named retention tokens.
//!
//! # Features
//! - **Bounded**: A total-cost limit and/or an entry-count limit, enforced by
//!   eviction sweeps that run on insert. Victims are chosen least recently
//!   used first (or FIFO, or any custom [`policy::EvictionPolicy`]).
//! - **Retention**: `retain(key, token)` protects an entry for as long as any
//!   token is outstanding. Tokens are idempotent, releases are tolerant, and
//!   retention may precede the entry's existence.
//! - **Exact Notifications**: An [`EvictionListener`] hears about every entry
//!   removed by a sweep, exactly once, after it is already gone. Explicit
//!   removals are never reported.
//! - **Thread-Safe**: One lock covers entries and retention state together,
//!   so a release racing an eviction can never let a retained entry go.
//! - **Observability**: `tracing` events and a [`MetricsSnapshot`].
//!
//! ```
//! use fibre_retaining_cache::CacheBuilder;
//!
//! let cache = CacheBuilder::<&str, String, &str>::new().cost_limit(10).build().unwrap();
//!
//! cache.set("a", "alpha".to_string(), 6);
//! cache.retain("a", "renderer");
//! cache.set("b", "beta".to_string(), 6);
//!
//! // "a" is retained, so the cache runs over budget instead of evicting it.
//! assert!(cache.contains_key(&"a"));
//! assert_eq!(cache.total_cost(), 12);
//! ```

// Public modules that form the API
pub mod builder;
pub mod config;
pub mod error;
pub mod handles;
pub mod listener;
pub mod metrics;
pub mod policy;

// Internal, crate-only modules
mod entry;
mod retention;
mod shared;
mod store;

// Re-export the primary user-facing types for convenience
pub use builder::CacheBuilder;
pub use config::{CacheConfig, PolicyKind};
pub use error::ConfigError;
pub use handles::RetainingCache;
pub use listener::{EvictionListener, EvictionReason};
pub use metrics::MetricsSnapshot;
