/// An object presented to, or held by, the simulated cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheObject<K> {
  key: K,
  size: u64,
}

impl<K> CacheObject<K> {
  /// Creates a new object with the given key and size.
  pub fn new(key: K, size: u64) -> Self {
    Self { key, size }
  }

  /// Creates an object for a cache that may ignore object sizes.
  ///
  /// When `consider_size` is false every object counts as a single unit
  /// against the cache capacity.
  pub fn sized(key: K, size: u64, consider_size: bool) -> Self {
    let size = if consider_size { size } else { 1 };
    Self { key, size }
  }

  #[inline]
  pub fn key(&self) -> &K {
    &self.key
  }

  #[inline]
  pub fn size(&self) -> u64 {
    self.size
  }

  pub fn into_key(self) -> K {
    self.key
  }
}
