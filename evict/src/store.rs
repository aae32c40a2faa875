use crate::object::CacheObject;

use core::fmt;
use std::collections::HashMap;
use std::hash::Hash;

// Fixed seeds keep iteration order identical from run to run, so a
// simulation replayed over the same trace visits keys in the same order.
const STORE_SEEDS: [u64; 4] = [
  0x243F_6A88_85A3_08D3,
  0x1319_8A2E_0370_7344,
  0xA409_3822_299F_31D0,
  0x082E_FA98_EC4E_6C89,
];

pub(crate) fn deterministic_state() -> ahash::RandomState {
  ahash::RandomState::with_seeds(STORE_SEEDS[0], STORE_SEEDS[1], STORE_SEEDS[2], STORE_SEEDS[3])
}

/// The storage backing a simulated cache: a key to object map that keeps
/// a running total of the stored objects' sizes.
pub struct ObjectStore<K> {
  objects: HashMap<K, CacheObject<K>, ahash::RandomState>,
  total_size: u64,
}

impl<K> fmt::Debug for ObjectStore<K> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ObjectStore")
      .field("len", &self.objects.len())
      .field("total_size", &self.total_size)
      .finish()
  }
}

impl<K: Eq + Hash> Default for ObjectStore<K> {
  fn default() -> Self {
    Self::new()
  }
}

impl<K: Eq + Hash> ObjectStore<K> {
  pub fn new() -> Self {
    Self {
      objects: HashMap::with_hasher(deterministic_state()),
      total_size: 0,
    }
  }

  #[inline]
  pub fn contains(&self, key: &K) -> bool {
    self.objects.contains_key(key)
  }

  #[inline]
  pub fn get(&self, key: &K) -> Option<&CacheObject<K>> {
    self.objects.get(key)
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.objects.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.objects.is_empty()
  }

  /// The sum of the sizes of all stored objects.
  #[inline]
  pub fn total_size(&self) -> u64 {
    self.total_size
  }

  pub fn keys(&self) -> impl Iterator<Item = &K> {
    self.objects.keys()
  }

  pub fn objects(&self) -> impl Iterator<Item = &CacheObject<K>> {
    self.objects.values()
  }

  /// Inserts an object, replacing (and returning) any object stored under
  /// the same key.
  pub fn insert(&mut self, obj: CacheObject<K>) -> Option<CacheObject<K>>
  where
    K: Clone,
  {
    self.total_size += obj.size();
    let previous = self.objects.insert(obj.key().clone(), obj);
    if let Some(old) = &previous {
      self.total_size = self.total_size.saturating_sub(old.size());
    }
    previous
  }

  pub fn remove(&mut self, key: &K) -> Option<CacheObject<K>> {
    let removed = self.objects.remove(key)?;
    self.total_size = self.total_size.saturating_sub(removed.size());
    Some(removed)
  }

  pub fn clear(&mut self) {
    self.objects.clear();
    self.total_size = 0;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn size_tracks_inserts_and_removals() {
    let mut store = ObjectStore::new();
    store.insert(CacheObject::new("a", 3));
    store.insert(CacheObject::new("b", 4));
    assert_eq!(store.total_size(), 7);

    // Replacing an object swaps its size in.
    let old = store.insert(CacheObject::new("a", 1));
    assert_eq!(old.map(|o| o.size()), Some(3));
    assert_eq!(store.total_size(), 5);

    assert!(store.remove(&"b").is_some());
    assert!(store.remove(&"b").is_none());
    assert_eq!(store.total_size(), 1);
    assert_eq!(store.len(), 1);
  }

  #[test]
  fn iteration_order_is_reproducible() {
    let build = || {
      let mut store = ObjectStore::new();
      for i in 0..64u32 {
        store.insert(CacheObject::new(i, 1));
      }
      store.keys().copied().collect::<Vec<_>>()
    };
    assert_eq!(build(), build());
  }
}
