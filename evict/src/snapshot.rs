use crate::store::ObjectStore;

use std::hash::Hash;

/// A read-only, point-in-time view of a cache, handed to an eviction policy
/// on every callback.
///
/// `access_count` is the cache's logical clock: the manager bumps it once
/// per access (hit or miss) before consulting the policy.
#[derive(Debug, Clone, Copy)]
pub struct CacheSnapshot<'a, K> {
  store: &'a ObjectStore<K>,
  capacity: u64,
  access_count: u64,
  hit_count: u64,
}

impl<'a, K: Eq + Hash> CacheSnapshot<'a, K> {
  pub fn new(store: &'a ObjectStore<K>, capacity: u64, access_count: u64, hit_count: u64) -> Self {
    Self {
      store,
      capacity,
      access_count,
      hit_count,
    }
  }

  /// The cached objects, keyed by object key.
  #[inline]
  pub fn cache(&self) -> &'a ObjectStore<K> {
    self.store
  }

  #[inline]
  pub fn keys(&self) -> impl Iterator<Item = &'a K> {
    self.store.keys()
  }

  #[inline]
  pub fn contains(&self, key: &K) -> bool {
    self.store.contains(key)
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.store.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.store.is_empty()
  }

  #[inline]
  pub fn access_count(&self) -> u64 {
    self.access_count
  }

  #[inline]
  pub fn capacity(&self) -> u64 {
    self.capacity
  }

  /// The total size of all cached objects.
  #[inline]
  pub fn size(&self) -> u64 {
    self.store.total_size()
  }

  #[inline]
  pub fn hit_count(&self) -> u64 {
    self.hit_count
  }

  #[inline]
  pub fn miss_count(&self) -> u64 {
    self.access_count.saturating_sub(self.hit_count)
  }
}
