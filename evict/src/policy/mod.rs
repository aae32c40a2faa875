pub mod fifo;
pub mod lru;
pub mod metadata;
pub mod score;
pub mod scored;

mod order_list;

use crate::error::PolicyError;
use crate::object::CacheObject;
use crate::snapshot::CacheSnapshot;

/// The contract between a cache manager and an eviction policy.
///
/// The manager drives every call and owns the storage; the policy owns only
/// its own bookkeeping. For one request the manager either calls `on_hit`,
/// or calls `evict` followed by `on_evict` as many times as space requires
/// and then `on_insert` for the new object.
///
/// A policy must keep exactly one piece of bookkeeping per cached key: it is
/// created by `on_insert` and dropped by `on_evict`.
pub trait EvictionPolicy<K> {
  /// A short, stable name used in logs and reports.
  fn name(&self) -> &'static str;

  /// Chooses the key to evict to make room for `incoming`.
  ///
  /// Must not change any state, and must return a key present in
  /// `snapshot`. Returns [`PolicyError::EmptyCache`] if there is nothing to
  /// evict.
  fn evict(&self, snapshot: &CacheSnapshot<'_, K>, incoming: &CacheObject<K>) -> Result<K, PolicyError>;

  /// Called after a request for `key` was served from the cache.
  fn on_hit(&mut self, snapshot: &CacheSnapshot<'_, K>, key: &K);

  /// Called after `key` was inserted into the cache.
  fn on_insert(&mut self, snapshot: &CacheSnapshot<'_, K>, key: &K);

  /// Called after `evicted` was removed to make room for `incoming`.
  /// `incoming` is not yet in the cache.
  fn on_evict(&mut self, snapshot: &CacheSnapshot<'_, K>, incoming: &CacheObject<K>, evicted: &K);

  /// Returns true if the policy holds bookkeeping for `key`.
  fn is_tracking(&self, key: &K) -> bool;

  /// The number of keys the policy holds bookkeeping for.
  fn tracked_len(&self) -> usize;

  /// Drops all bookkeeping.
  fn clear(&mut self);
}

impl<K, P> EvictionPolicy<K> for Box<P>
where
  P: EvictionPolicy<K> + ?Sized,
{
  fn name(&self) -> &'static str {
    (**self).name()
  }

  fn evict(&self, snapshot: &CacheSnapshot<'_, K>, incoming: &CacheObject<K>) -> Result<K, PolicyError> {
    (**self).evict(snapshot, incoming)
  }

  fn on_hit(&mut self, snapshot: &CacheSnapshot<'_, K>, key: &K) {
    (**self).on_hit(snapshot, key)
  }

  fn on_insert(&mut self, snapshot: &CacheSnapshot<'_, K>, key: &K) {
    (**self).on_insert(snapshot, key)
  }

  fn on_evict(&mut self, snapshot: &CacheSnapshot<'_, K>, incoming: &CacheObject<K>, evicted: &K) {
    (**self).on_evict(snapshot, incoming, evicted)
  }

  fn is_tracking(&self, key: &K) -> bool {
    (**self).is_tracking(key)
  }

  fn tracked_len(&self) -> usize {
    (**self).tracked_len()
  }

  fn clear(&mut self) {
    (**self).clear()
  }
}
