use super::order_list::OrderList;
use super::EvictionPolicy;
use crate::error::PolicyError;
use crate::object::CacheObject;
use crate::snapshot::CacheSnapshot;

use std::hash::Hash;

/// An eviction policy that evicts the least recently used entries.
#[derive(Debug)]
pub struct Lru<K: Eq + Hash + Clone> {
  // Front is most recent.
  order: OrderList<K>,
}

impl<K: Eq + Hash + Clone> Lru<K> {
  pub fn new() -> Self {
    Self {
      order: OrderList::new(),
    }
  }
}

impl<K: Eq + Hash + Clone> Default for Lru<K> {
  fn default() -> Self {
    Self::new()
  }
}

impl<K: Eq + Hash + Clone> EvictionPolicy<K> for Lru<K> {
  fn name(&self) -> &'static str {
    "lru"
  }

  fn evict(&self, snapshot: &CacheSnapshot<'_, K>, _incoming: &CacheObject<K>) -> Result<K, PolicyError> {
    self.order.victim_in(snapshot)
  }

  /// When an item is hit, move it to the front of the usage queue.
  fn on_hit(&mut self, snapshot: &CacheSnapshot<'_, K>, key: &K) {
    if self.order.contains(key) || snapshot.contains(key) {
      self.order.push_front(key.clone());
    }
  }

  /// When an item is inserted, it is the most recently used.
  fn on_insert(&mut self, _snapshot: &CacheSnapshot<'_, K>, key: &K) {
    self.order.push_front(key.clone());
  }

  fn on_evict(&mut self, _snapshot: &CacheSnapshot<'_, K>, _incoming: &CacheObject<K>, evicted: &K) {
    self.order.remove(evicted);
  }

  fn is_tracking(&self, key: &K) -> bool {
    self.order.contains(key)
  }

  fn tracked_len(&self) -> usize {
    self.order.len()
  }

  fn clear(&mut self) {
    self.order.clear();
  }
}
