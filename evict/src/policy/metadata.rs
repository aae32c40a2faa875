use crate::store::deterministic_state;

use std::collections::HashMap;
use std::hash::Hash;

type Map<K, V> = HashMap<K, V, ahash::RandomState>;

/// The per-key record kept by a [`ScoredPolicy`](super::scored::ScoredPolicy).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyMetadata {
  /// Logical timestamp (`access_count`) of the last insert or hit.
  pub recency: u64,
  /// Access counter, decayed after evictions.
  pub frequency: f64,
  /// Estimate of reuse, raised on hits and decayed after evictions.
  pub predictive_score: f64,
  /// Position in insertion order, assigned when the record is created.
  pub sequence: u64,
}

/// Owns every policy record plus the optional coupling links between keys.
///
/// Coupling links are symmetric: a strength stored under `a -> b` is always
/// mirrored under `b -> a`.
#[derive(Debug)]
pub struct PolicyMetadata<K> {
  records: Map<K, KeyMetadata>,
  links: Map<K, Map<K, f64>>,
  next_sequence: u64,
}

impl<K: Eq + Hash + Clone> Default for PolicyMetadata<K> {
  fn default() -> Self {
    Self::new()
  }
}

impl<K: Eq + Hash + Clone> PolicyMetadata<K> {
  pub fn new() -> Self {
    Self {
      records: HashMap::with_hasher(deterministic_state()),
      links: HashMap::with_hasher(deterministic_state()),
      next_sequence: 0,
    }
  }

  #[inline]
  pub fn get(&self, key: &K) -> Option<&KeyMetadata> {
    self.records.get(key)
  }

  #[inline]
  pub(crate) fn get_mut(&mut self, key: &K) -> Option<&mut KeyMetadata> {
    self.records.get_mut(key)
  }

  #[inline]
  pub fn contains(&self, key: &K) -> bool {
    self.records.contains_key(key)
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.records.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  pub fn keys(&self) -> impl Iterator<Item = &K> {
    self.records.keys()
  }

  /// Creates (or replaces) the record for `key`, stamping it with the next
  /// insertion sequence number.
  pub(crate) fn insert(&mut self, key: K, recency: u64, frequency: f64, predictive_score: f64) -> &mut KeyMetadata {
    let sequence = self.next_sequence;
    self.next_sequence += 1;
    let record = KeyMetadata {
      recency,
      frequency,
      predictive_score,
      sequence,
    };
    let slot = self.records.entry(key).or_insert(record);
    *slot = record;
    slot
  }

  /// Deletes the record for `key` and every coupling link touching it.
  pub(crate) fn remove(&mut self, key: &K) -> Option<KeyMetadata> {
    if let Some(row) = self.links.remove(key) {
      for neighbor in row.keys() {
        let now_empty = match self.links.get_mut(neighbor) {
          Some(neighbor_row) => {
            neighbor_row.remove(key);
            neighbor_row.is_empty()
          }
          None => false,
        };
        if now_empty {
          self.links.remove(neighbor);
        }
      }
    }
    self.records.remove(key)
  }

  /// Multiplies the frequency and predictive score of every record, and the
  /// strength of every coupling link, by `factor`. Anything belonging to
  /// `except` is left untouched.
  pub(crate) fn decay_all(&mut self, factor: f64, except: &K) {
    if factor == 1.0 {
      return;
    }
    for (key, record) in self.records.iter_mut() {
      if key != except {
        record.frequency *= factor;
        record.predictive_score *= factor;
      }
    }
    for (from, row) in self.links.iter_mut() {
      if from == except {
        continue;
      }
      for (to, strength) in row.iter_mut() {
        if to != except {
          *strength *= factor;
        }
      }
    }
  }

  /// Multiplies the frequency of every record except `key`'s by `factor`.
  pub(crate) fn decay_frequency_except(&mut self, key: &K, factor: f64) {
    if factor == 1.0 {
      return;
    }
    for (other, record) in self.records.iter_mut() {
      if other != key {
        record.frequency *= factor;
      }
    }
  }

  /// The sum of all coupling strengths attached to `key`.
  pub fn coupling_strength(&self, key: &K) -> f64 {
    self
      .links
      .get(key)
      .map_or(0.0, |row| row.values().sum())
  }

  /// The strength of the link between `a` and `b`, zero if unlinked.
  pub fn link_strength(&self, a: &K, b: &K) -> f64 {
    self
      .links
      .get(a)
      .and_then(|row| row.get(b))
      .copied()
      .unwrap_or(0.0)
  }

  pub fn neighbor_count(&self, key: &K) -> usize {
    self.links.get(key).map_or(0, |row| row.len())
  }

  /// Adds `delta` to the link between `a` and `b`. Each side keeps at most
  /// `max_neighbors` links; beyond that the weakest other link is cut.
  pub(crate) fn strengthen(&mut self, a: &K, b: &K, delta: f64, max_neighbors: usize) {
    if a == b || delta <= 0.0 {
      return;
    }
    self.add_half_link(a, b, delta);
    self.add_half_link(b, a, delta);
    self.enforce_bound(a, b, max_neighbors);
    self.enforce_bound(b, a, max_neighbors);
  }

  fn add_half_link(&mut self, from: &K, to: &K, delta: f64) {
    let row = self
      .links
      .entry(from.clone())
      .or_insert_with(|| HashMap::with_hasher(deterministic_state()));
    *row.entry(to.clone()).or_insert(0.0) += delta;
  }

  fn enforce_bound(&mut self, key: &K, keep: &K, max_neighbors: usize) {
    loop {
      let weakest = match self.links.get(key) {
        Some(row) if row.len() > max_neighbors => row
          .iter()
          .filter(|(neighbor, _)| *neighbor != keep)
          .min_by(|(_, x), (_, y)| x.total_cmp(*y))
          .map(|(neighbor, _)| neighbor.clone()),
        _ => None,
      };
      let Some(weakest) = weakest else {
        return;
      };
      self.unlink(key, &weakest);
    }
  }

  fn unlink(&mut self, a: &K, b: &K) {
    for (from, to) in [(a, b), (b, a)] {
      let now_empty = match self.links.get_mut(from) {
        Some(row) => {
          row.remove(to);
          row.is_empty()
        }
        None => false,
      };
      if now_empty {
        self.links.remove(from);
      }
    }
  }

  pub(crate) fn clear(&mut self) {
    self.records.clear();
    self.links.clear();
  }
}
