use super::order_list::OrderList;
use super::EvictionPolicy;
use crate::error::PolicyError;
use crate::object::CacheObject;
use crate::snapshot::CacheSnapshot;

use std::hash::Hash;

/// An eviction policy that evicts entries in a First-In, First-Out (FIFO) manner.
#[derive(Debug)]
pub struct Fifo<K: Eq + Hash + Clone> {
  list: OrderList<K>,
}

impl<K: Eq + Hash + Clone> Fifo<K> {
  pub fn new() -> Self {
    Self {
      list: OrderList::new(),
    }
  }
}

impl<K: Eq + Hash + Clone> Default for Fifo<K> {
  fn default() -> Self {
    Self::new()
  }
}

impl<K: Eq + Hash + Clone> EvictionPolicy<K> for Fifo<K> {
  fn name(&self) -> &'static str {
    "fifo"
  }

  /// The first inserted key still in the cache.
  fn evict(&self, snapshot: &CacheSnapshot<'_, K>, _incoming: &CacheObject<K>) -> Result<K, PolicyError> {
    self.list.victim_in(snapshot)
  }

  /// A FIFO policy does not care about access patterns. This is a no-op.
  fn on_hit(&mut self, _snapshot: &CacheSnapshot<'_, K>, _key: &K) {}

  fn on_insert(&mut self, _snapshot: &CacheSnapshot<'_, K>, key: &K) {
    // Re-inserting a tracked key keeps its original position.
    if !self.list.contains(key) {
      self.list.push_front(key.clone());
    }
  }

  fn on_evict(&mut self, _snapshot: &CacheSnapshot<'_, K>, _incoming: &CacheObject<K>, evicted: &K) {
    self.list.remove(evicted);
  }

  fn is_tracking(&self, key: &K) -> bool {
    self.list.contains(key)
  }

  fn tracked_len(&self) -> usize {
    self.list.len()
  }

  fn clear(&mut self) {
    self.list.clear();
  }
}
