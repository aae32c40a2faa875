// evict/tests/policies.rs

mod common;

use common::{init_tracing, objects, zipf_trace};
use fibre_evict::{
  CacheObject, EvictionPolicy, Fifo, Lru, PolicyConfig, ScoredPolicy, SimulatedCache,
};

fn run_keys<P: EvictionPolicy<&'static str>>(cache: &mut SimulatedCache<&'static str, P>, keys: &[&'static str]) {
  for obj in objects(keys) {
    cache.get(obj).unwrap();
  }
}

// --- Scored Policy Tests ---
mod scored {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn test_unhit_key_is_evicted_before_hit_key() {
    init_tracing();
    let mut cache = SimulatedCache::new(3, ScoredPolicy::new()).unwrap();
    run_keys(&mut cache, &["a", "b", "c", "a"]);

    cache.get(CacheObject::new("d", 1)).unwrap();
    assert!(!cache.contains(&"b"), "b was never hit and is older than c");
    assert!(cache.contains(&"a"));
    assert!(cache.contains(&"c"));
    assert!(cache.contains(&"d"));
  }

  #[test]
  fn test_heavily_hit_key_survives_and_stays_finite() {
    let mut cache = SimulatedCache::new(2, ScoredPolicy::new()).unwrap();
    cache.get(CacheObject::new("hot", 1)).unwrap();
    for _ in 0..1000 {
      assert!(cache.get(CacheObject::new("hot", 1)).unwrap());
    }
    run_keys(&mut cache, &["cold1", "cold2", "cold3"]);

    assert!(cache.contains(&"hot"));
    let now = cache.access_count();
    let score = cache.policy().score(&"hot", now);
    assert!(score.is_finite());

    let record = cache.policy().metadata().get(&"hot").unwrap();
    assert!(record.predictive_score <= cache.policy().config().max_predictive_score);
  }

  #[test]
  fn test_metadata_matches_cache_after_every_request() {
    let trace = zipf_trace(200, 2_000, 7);
    let config = PolicyConfig::default().coupling(Default::default());
    let mut cache = SimulatedCache::new(32, ScoredPolicy::with_config(config).unwrap()).unwrap();
    for request in trace.iter() {
      cache.get(request.clone()).unwrap();
      assert!(cache.is_consistent(), "diverged at access {}", cache.access_count());
    }
    assert!(cache.metrics().evictions > 0);
  }

  #[test]
  fn test_same_requests_evict_same_keys() {
    let trace = zipf_trace(100, 1_000, 42);
    let run = || {
      let mut cache = SimulatedCache::new(16, ScoredPolicy::new()).unwrap();
      let mut residency = Vec::new();
      for request in trace.iter() {
        cache.get(request.clone()).unwrap();
        let mut keys: Vec<String> = cache.snapshot().keys().cloned().collect();
        keys.sort();
        residency.push(keys);
      }
      residency
    };
    assert_eq!(run(), run());
  }

  #[test]
  fn test_boxed_policy_drives_cache() {
    let policy: Box<dyn EvictionPolicy<&'static str>> = Box::new(ScoredPolicy::new());
    let mut cache = SimulatedCache::new(1, policy).unwrap();
    run_keys(&mut cache, &["a", "b"]);
    assert_eq!(cache.policy().name(), "scored");
    assert!(cache.contains(&"b"));
    assert!(cache.is_consistent());
  }
}

// --- Baseline Policy Tests ---
mod baselines {
  use super::*;

  #[test]
  fn test_fifo_ignores_hits() {
    let mut cache = SimulatedCache::new(3, Fifo::new()).unwrap();
    run_keys(&mut cache, &["a", "b", "c", "a", "d"]);
    assert!(!cache.contains(&"a"), "a was inserted first");
    assert!(cache.contains(&"b"));
  }

  #[test]
  fn test_lru_evicts_least_recently_used() {
    let mut cache = SimulatedCache::new(3, Lru::new()).unwrap();
    run_keys(&mut cache, &["a", "b", "c", "a", "d"]);
    assert!(!cache.contains(&"b"));
    assert!(cache.contains(&"a"));
    assert!(cache.is_consistent());
  }

  #[test]
  fn test_baselines_stay_consistent() {
    let trace = zipf_trace(50, 500, 3);
    let mut fifo = SimulatedCache::new(8, Fifo::new()).unwrap();
    let mut lru = SimulatedCache::new(8, Lru::new()).unwrap();
    for request in trace.iter() {
      fifo.get(request.clone()).unwrap();
      lru.get(request.clone()).unwrap();
      assert!(fifo.is_consistent());
      assert!(lru.is_consistent());
    }
  }
}
