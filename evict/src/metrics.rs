use std::fmt;

/// Counters maintained by the simulated cache.
#[derive(Debug, Default, Clone)]
pub(crate) struct Metrics {
  pub(crate) hits: u64,
  pub(crate) misses: u64,
  pub(crate) inserts: u64,
  pub(crate) evictions: u64,
  // Misses for objects larger than the whole cache.
  pub(crate) rejected: u64,
}

impl Metrics {
  pub(crate) fn snapshot(&self, current_size: u64, len: usize) -> MetricsSnapshot {
    let total_lookups = self.hits + self.misses;
    MetricsSnapshot {
      hits: self.hits,
      misses: self.misses,
      hit_ratio: if total_lookups == 0 {
        0.0
      } else {
        self.hits as f64 / total_lookups as f64
      },
      inserts: self.inserts,
      evictions: self.evictions,
      rejected: self.rejected,
      current_size,
      len,
    }
  }
}

/// A point-in-time, public-facing snapshot of the simulated cache's metrics.
#[derive(Clone, PartialEq)]
pub struct MetricsSnapshot {
  /// The number of requests served from the cache.
  pub hits: u64,
  /// The number of requests not served from the cache.
  pub misses: u64,
  /// The cache hit ratio (hits / (hits + misses)).
  pub hit_ratio: f64,
  /// The number of objects inserted after a miss.
  pub inserts: u64,
  /// The number of objects evicted to make room.
  pub evictions: u64,
  /// The number of objects not admitted because they exceed the capacity.
  pub rejected: u64,
  /// The total size of the cached objects.
  pub current_size: u64,
  /// The number of cached objects.
  pub len: usize,
}

impl MetricsSnapshot {
  /// The cache miss ratio (misses / (hits + misses)).
  pub fn miss_ratio(&self) -> f64 {
    let total = self.hits + self.misses;
    if total == 0 {
      0.0
    } else {
      self.misses as f64 / total as f64
    }
  }
}

impl fmt::Debug for MetricsSnapshot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("MetricsSnapshot")
      .field("hits", &self.hits)
      .field("misses", &self.misses)
      .field("hit_ratio", &format!("{:.2}%", self.hit_ratio * 100.0))
      .field("inserts", &self.inserts)
      .field("evictions", &self.evictions)
      .field("rejected", &self.rejected)
      .field("current_size", &self.current_size)
      .field("len", &self.len)
      .finish()
  }
}
