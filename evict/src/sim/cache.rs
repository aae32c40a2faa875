use crate::config::SimulationConfig;
use crate::error::{ConfigError, Result, SimulationError};
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::object::CacheObject;
use crate::policy::EvictionPolicy;
use crate::snapshot::CacheSnapshot;
use crate::store::ObjectStore;

use std::fmt::Debug;
use std::hash::Hash;

/// A capacity-bounded cache that delegates every eviction decision to an
/// [`EvictionPolicy`].
///
/// On a miss the cache asks the policy for victims until the new object
/// fits, notifying the policy after each removal, then inserts the object
/// and notifies the policy once more. The access counter is bumped before
/// the policy sees the request.
#[derive(Debug)]
pub struct SimulatedCache<K, P> {
  store: ObjectStore<K>,
  capacity: u64,
  consider_obj_size: bool,
  access_count: u64,
  hit_count: u64,
  policy: P,
  metrics: Metrics,
}

impl<K, P> SimulatedCache<K, P>
where
  K: Eq + Hash + Clone + Debug,
  P: EvictionPolicy<K>,
{
  /// Creates a cache that honours object sizes.
  pub fn new(capacity: u64, policy: P) -> Result<Self, ConfigError> {
    if capacity == 0 {
      return Err(ConfigError::invalid("capacity", "must be a positive integer"));
    }
    Ok(Self {
      store: ObjectStore::new(),
      capacity,
      consider_obj_size: true,
      access_count: 0,
      hit_count: 0,
      policy,
      metrics: Metrics::default(),
    })
  }

  pub fn from_config(config: &SimulationConfig, policy: P) -> Result<Self, ConfigError> {
    config.validate()?;
    let mut cache = Self::new(config.capacity, policy)?;
    cache.consider_obj_size = config.consider_obj_size;
    Ok(cache)
  }

  /// When disabled every object counts as size 1.
  pub fn consider_obj_size(mut self, consider: bool) -> Self {
    self.consider_obj_size = consider;
    self
  }

  /// Requests `obj`. Returns `Ok(true)` on a hit and `Ok(false)` on a miss,
  /// inserting the object on a miss if it fits in the cache at all.
  ///
  /// # Errors
  ///
  /// A zero-sized object is rejected before any state changes. A policy
  /// error or an invalid victim aborts a miss part way: the access and the
  /// miss stay counted, victims removed earlier in the same miss stay
  /// evicted, and `obj` is not inserted. The cache is still consistent with
  /// the policy, but the request counts as a miss that was never completed.
  pub fn get(&mut self, obj: CacheObject<K>) -> Result<bool> {
    let size = obj.size();
    let obj = CacheObject::sized(obj.into_key(), size, self.consider_obj_size);
    if obj.size() == 0 {
      return Err(SimulationError::ZeroSizedObject {
        key: format!("{:?}", obj.key()),
      });
    }

    self.access_count += 1;

    if self.store.contains(obj.key()) {
      self.hit_count += 1;
      self.metrics.hits += 1;
      let snapshot = CacheSnapshot::new(&self.store, self.capacity, self.access_count, self.hit_count);
      self.policy.on_hit(&snapshot, obj.key());
      return Ok(true);
    }

    self.metrics.misses += 1;
    if obj.size() > self.capacity {
      self.metrics.rejected += 1;
      return Ok(false);
    }

    while self.store.total_size() + obj.size() > self.capacity {
      let snapshot = CacheSnapshot::new(&self.store, self.capacity, self.access_count, self.hit_count);
      let victim = self.policy.evict(&snapshot, &obj)?;
      if self.store.remove(&victim).is_none() {
        return Err(SimulationError::InvalidVictim {
          key: format!("{:?}", victim),
        });
      }
      self.metrics.evictions += 1;
      let snapshot = CacheSnapshot::new(&self.store, self.capacity, self.access_count, self.hit_count);
      self.policy.on_evict(&snapshot, &obj, &victim);
    }

    let key = obj.key().clone();
    self.store.insert(obj);
    self.metrics.inserts += 1;
    let snapshot = CacheSnapshot::new(&self.store, self.capacity, self.access_count, self.hit_count);
    self.policy.on_insert(&snapshot, &key);
    Ok(false)
  }

  /// A read-only view of the cache, as handed to the policy.
  pub fn snapshot(&self) -> CacheSnapshot<'_, K> {
    CacheSnapshot::new(&self.store, self.capacity, self.access_count, self.hit_count)
  }

  pub fn contains(&self, key: &K) -> bool {
    self.store.contains(key)
  }

  pub fn len(&self) -> usize {
    self.store.len()
  }

  pub fn is_empty(&self) -> bool {
    self.store.is_empty()
  }

  pub fn size(&self) -> u64 {
    self.store.total_size()
  }

  pub fn capacity(&self) -> u64 {
    self.capacity
  }

  pub fn access_count(&self) -> u64 {
    self.access_count
  }

  pub fn hit_count(&self) -> u64 {
    self.hit_count
  }

  pub fn miss_count(&self) -> u64 {
    self.access_count - self.hit_count
  }

  pub fn policy(&self) -> &P {
    &self.policy
  }

  pub fn metrics(&self) -> MetricsSnapshot {
    self.metrics.snapshot(self.store.total_size(), self.store.len())
  }

  /// True when the policy tracks exactly the cached keys.
  pub fn is_consistent(&self) -> bool {
    self.policy.tracked_len() == self.store.len() && self.store.keys().all(|k| self.policy.is_tracking(k))
  }

  /// Empties the cache and the policy, and resets every counter.
  pub fn clear(&mut self) {
    self.store.clear();
    self.policy.clear();
    self.access_count = 0;
    self.hit_count = 0;
    self.metrics = Metrics::default();
  }

  pub fn into_policy(self) -> P {
    self.policy
  }
}
