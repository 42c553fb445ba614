use fibre_retaining_cache::{CacheBuilder, EvictionReason};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
    .init();

  // At most 10 units of cost; the listener prints every eviction.
  let cache = CacheBuilder::<&'static str, String, &'static str>::new()
    .name("thumbnails")
    .cost_limit(10)
    .eviction_listener(|key: &'static str, value: Arc<String>, reason: EvictionReason| {
      println!("--- Evicted '{}' ({}): {}", key, value, reason);
    })
    .build()
    .expect("Failed to build cache");

  println!("Inserting 'a' (cost 6) and retaining it for the renderer.");
  cache.set("a", "alpha.png".to_string(), 6);
  cache.retain("a", "renderer");

  println!("Inserting 'b' (cost 6). 'a' is retained, so nothing is evicted.");
  cache.set("b", "beta.png".to_string(), 6);
  println!("Total cost is now {} (limit {}).", cache.total_cost(), cache.cost_limit());

  println!("\nReleasing 'a'. It stays until the next sweep needs room.");
  cache.release(&"a", &"renderer");
  assert!(cache.contains_key(&"a"));

  println!("Inserting 'c' (cost 2), which triggers a sweep.");
  cache.set("c", "gamma.png".to_string(), 2);
  println!("Total cost is now {}.", cache.total_cost());

  println!("\nRetaining 'd' before it exists, then inserting it.");
  cache.retain("d", "prefetcher");
  cache.set("d", "delta.png".to_string(), 9);
  println!(
    "'d' retain count: {}, present: {}",
    cache.retain_count(&"d"),
    cache.contains_key(&"d")
  );

  println!("\n{:#?}", cache.metrics());
}
