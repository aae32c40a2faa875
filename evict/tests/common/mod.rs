#![allow(dead_code)]

use fibre_evict::{CacheObject, Trace};

use rand::SeedableRng;
use rand_distr::Distribution;
use rand_pcg::Pcg64;

/// Routes `tracing` output to the test harness. Safe to call from every test.
pub fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
}

/// A skewed, reproducible trace of `len` unit-sized requests over
/// `universe` distinct keys.
pub fn zipf_trace(universe: u64, len: usize, seed: u64) -> Trace {
  let mut rng = Pcg64::seed_from_u64(seed);
  let zipf = rand_distr::Zipf::new(universe as f64, 1.01).unwrap();
  let requests = (0..len)
    .map(|_| {
      let key = zipf.sample(&mut rng) as u64;
      CacheObject::new(format!("k{}", key), 1)
    })
    .collect();
  Trace::new(requests)
}

/// Unit-sized objects for the given keys.
pub fn objects(keys: &[&'static str]) -> Vec<CacheObject<&'static str>> {
  keys.iter().map(|k| CacheObject::new(*k, 1)).collect()
}
