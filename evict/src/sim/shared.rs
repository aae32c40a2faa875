use crate::error::Result;
use crate::metrics::MetricsSnapshot;
use crate::object::CacheObject;
use crate::policy::EvictionPolicy;
use crate::sim::cache::SimulatedCache;

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

/// A thread-safe handle to a [`SimulatedCache`].
///
/// Each access holds the lock for its whole hit or miss sequence, so the
/// policy never observes a half-applied eviction. Clones share the cache.
pub struct SharedCache<K, P> {
  inner: Arc<Mutex<SimulatedCache<K, P>>>,
}

impl<K, P> Clone for SharedCache<K, P> {
  fn clone(&self) -> Self {
    Self {
      inner: Arc::clone(&self.inner),
    }
  }
}

impl<K, P> SharedCache<K, P>
where
  K: Eq + Hash + Clone + Debug,
  P: EvictionPolicy<K>,
{
  pub fn new(cache: SimulatedCache<K, P>) -> Self {
    Self {
      inner: Arc::new(Mutex::new(cache)),
    }
  }

  /// Requests `obj`, returning whether it was a hit.
  pub fn access(&self, obj: CacheObject<K>) -> Result<bool> {
    self.inner.lock().get(obj)
  }

  pub fn contains(&self, key: &K) -> bool {
    self.inner.lock().contains(key)
  }

  pub fn metrics(&self) -> MetricsSnapshot {
    self.inner.lock().metrics()
  }

  /// Runs `f` with exclusive access to the underlying cache.
  pub fn with_cache<R>(&self, f: impl FnOnce(&mut SimulatedCache<K, P>) -> R) -> R {
    let mut guard = self.inner.lock();
    f(&mut guard)
  }
}

impl<K: Debug, P: Debug> Debug for SharedCache<K, P> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SharedCache").field("inner", &*self.inner.lock()).finish()
  }
}
