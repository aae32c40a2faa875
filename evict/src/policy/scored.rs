use super::metadata::{KeyMetadata, PolicyMetadata};
use super::score::Rank;
use super::EvictionPolicy;
use crate::config::PolicyConfig;
use crate::error::{ConfigError, PolicyError};
use crate::object::CacheObject;
use crate::snapshot::CacheSnapshot;

use std::cmp::Ordering;
use std::fmt::Debug;
use std::hash::Hash;

/// A policy that evicts the key with the lowest weighted composite score of
/// recency, frequency, predictive score and (optionally) coupling.
///
/// Victim selection is a pure function of the metadata and the snapshot's
/// logical clock: equal call sequences always pick equal victims.
#[derive(Debug)]
pub struct ScoredPolicy<K> {
  config: PolicyConfig,
  metadata: PolicyMetadata<K>,
  // The key touched by the previous hit or insert, for coupling.
  last_touched: Option<K>,
}

impl<K> ScoredPolicy<K>
where
  K: Eq + Hash + Clone + Debug,
{
  /// Creates a policy with the default configuration.
  pub fn new() -> Self {
    Self {
      config: PolicyConfig::default(),
      metadata: PolicyMetadata::new(),
      last_touched: None,
    }
  }

  /// Creates a policy after validating `config`.
  pub fn with_config(config: PolicyConfig) -> Result<Self, ConfigError> {
    config.validate()?;
    Ok(Self {
      config,
      metadata: PolicyMetadata::new(),
      last_touched: None,
    })
  }

  pub fn config(&self) -> &PolicyConfig {
    &self.config
  }

  pub fn metadata(&self) -> &PolicyMetadata<K> {
    &self.metadata
  }

  /// The composite score `key` would be ranked by at `access_count`.
  pub fn score(&self, key: &K, access_count: u64) -> f64 {
    self.rank(key, access_count).score
  }

  // Stand-in for a record that should exist but does not.
  fn fallback_record(&self) -> KeyMetadata {
    KeyMetadata {
      recency: self.config.initial_recency,
      frequency: 0.0,
      predictive_score: 0.0,
      sequence: u64::MAX,
    }
  }

  fn rank(&self, key: &K, access_count: u64) -> Rank {
    let record = match self.metadata.get(key) {
      Some(record) => *record,
      None => {
        tracing::debug!(?key, "no policy metadata for cached key, ranking with defaults");
        self.fallback_record()
      }
    };
    let coupling = if self.config.coupling.is_some() {
      self.metadata.coupling_strength(key)
    } else {
      0.0
    };
    Rank {
      score: self.config.score_weights.score(&record, access_count, coupling),
      recency: record.recency,
      sequence: record.sequence,
    }
  }

  fn link_to_last_touched(&mut self, key: &K, strength: f64) {
    let Some(coupling) = self.config.coupling else {
      return;
    };
    if let Some(previous) = &self.last_touched {
      if self.metadata.contains(previous) {
        self
          .metadata
          .strengthen(key, previous, strength, coupling.max_neighbors);
      }
    }
  }
}

impl<K> Default for ScoredPolicy<K>
where
  K: Eq + Hash + Clone + Debug,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<K> EvictionPolicy<K> for ScoredPolicy<K>
where
  K: Eq + Hash + Clone + Debug,
{
  fn name(&self) -> &'static str {
    "scored"
  }

  /// Picks the cached key with the minimum rank.
  fn evict(&self, snapshot: &CacheSnapshot<'_, K>, _incoming: &CacheObject<K>) -> Result<K, PolicyError> {
    let access_count = snapshot.access_count();
    let tie_break = self.config.tie_break;

    let mut best: Option<(&K, Rank)> = None;
    for key in snapshot.keys() {
      let rank = self.rank(key, access_count);
      let replace = match &best {
        Some((_, current)) => rank.cmp_with(current, tie_break) == Ordering::Less,
        None => true,
      };
      if replace {
        best = Some((key, rank));
      }
    }

    let (victim, rank) = best.ok_or(PolicyError::EmptyCache)?;
    tracing::trace!(key = ?victim, score = rank.score, "selected eviction victim");
    Ok(victim.clone())
  }

  fn on_hit(&mut self, snapshot: &CacheSnapshot<'_, K>, key: &K) {
    let now = snapshot.access_count();
    let hit_boost = self.config.hit_boost;
    let ceiling = self.config.max_predictive_score;

    if !self.metadata.contains(key) {
      if !snapshot.contains(key) {
        tracing::debug!(?key, "hit on a key that is not cached, ignoring");
        return;
      }
      tracing::debug!(?key, "hit on a key without policy metadata, creating a record");
      self.metadata.insert(
        key.clone(),
        now,
        self.config.initial_frequency,
        self.config.initial_predictive_score,
      );
    }
    if let Some(record) = self.metadata.get_mut(key) {
      record.recency = now;
      record.frequency += 1.0;
      record.predictive_score = (record.predictive_score + hit_boost).min(ceiling);
    }

    self
      .metadata
      .decay_frequency_except(key, self.config.hit_decay_factor);

    if let Some(coupling) = self.config.coupling {
      self.link_to_last_touched(key, coupling.hit_strength);
    }
    self.last_touched = Some(key.clone());
  }

  fn on_insert(&mut self, snapshot: &CacheSnapshot<'_, K>, key: &K) {
    self.metadata.insert(
      key.clone(),
      snapshot.access_count(),
      self.config.initial_frequency,
      self.config.initial_predictive_score,
    );

    if let Some(coupling) = self.config.coupling {
      self.link_to_last_touched(key, coupling.insert_strength);
    }
    self.last_touched = Some(key.clone());
  }

  fn on_evict(&mut self, _snapshot: &CacheSnapshot<'_, K>, incoming: &CacheObject<K>, evicted: &K) {
    if self.metadata.remove(evicted).is_none() {
      tracing::debug!(key = ?evicted, "evicted key had no policy metadata");
    }
    if self.last_touched.as_ref() == Some(evicted) {
      self.last_touched = None;
    }
    self.metadata.decay_all(self.config.decay_factor, incoming.key());
  }

  fn is_tracking(&self, key: &K) -> bool {
    self.metadata.contains(key)
  }

  fn tracked_len(&self) -> usize {
    self.metadata.len()
  }

  fn clear(&mut self) {
    self.metadata.clear();
    self.last_touched = None;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::CouplingConfig;
  use crate::policy::score::{ScoreWeights, TieBreak};
  use crate::store::ObjectStore;

  /// A minimal manager: the tests move the clock and the store by hand.
  struct Harness {
    store: ObjectStore<&'static str>,
    clock: u64,
  }

  impl Harness {
    fn new() -> Self {
      Self {
        store: ObjectStore::new(),
        clock: 0,
      }
    }

    fn snapshot(&self) -> CacheSnapshot<'_, &'static str> {
      CacheSnapshot::new(&self.store, 100, self.clock, 0)
    }

    fn insert(&mut self, policy: &mut ScoredPolicy<&'static str>, key: &'static str, at: u64) {
      self.clock = at;
      self.store.insert(CacheObject::new(key, 1));
      let snapshot = CacheSnapshot::new(&self.store, 100, self.clock, 0);
      policy.on_insert(&snapshot, &key);
    }

    fn hit(&mut self, policy: &mut ScoredPolicy<&'static str>, key: &'static str, at: u64) {
      self.clock = at;
      let snapshot = CacheSnapshot::new(&self.store, 100, self.clock, 0);
      policy.on_hit(&snapshot, &key);
    }

    fn evict(&mut self, policy: &mut ScoredPolicy<&'static str>, incoming: &'static str) -> &'static str {
      let incoming = CacheObject::new(incoming, 1);
      let victim = policy.evict(&self.snapshot(), &incoming).unwrap();
      self.store.remove(&victim);
      let snapshot = CacheSnapshot::new(&self.store, 100, self.clock, 0);
      policy.on_evict(&snapshot, &incoming, &victim);
      victim
    }
  }

  #[test]
  fn evict_on_empty_cache_fails() {
    let policy = ScoredPolicy::<&str>::new();
    let store = ObjectStore::new();
    let snapshot = CacheSnapshot::new(&store, 10, 0, 0);
    let result = policy.evict(&snapshot, &CacheObject::new("x", 1));
    assert_eq!(result, Err(PolicyError::EmptyCache));
  }

  #[test]
  fn untouched_older_key_is_evicted_first() {
    let mut policy = ScoredPolicy::new();
    let mut h = Harness::new();
    h.insert(&mut policy, "a", 0);
    h.insert(&mut policy, "b", 1);
    h.insert(&mut policy, "c", 2);
    h.hit(&mut policy, "a", 3);

    assert_eq!(h.evict(&mut policy, "d"), "b");
  }

  #[test]
  fn equal_scores_fall_back_to_recency_then_insertion() {
    // Only frequency counts, so every fresh key has the same score.
    let config = PolicyConfig::default().score_weights(ScoreWeights {
      recency: 0.0,
      frequency: 1.0,
      predictive: 0.0,
      coupling: 0.0,
    });
    let mut policy = ScoredPolicy::with_config(config).unwrap();
    let mut h = Harness::new();
    h.insert(&mut policy, "b", 5);
    h.insert(&mut policy, "a", 5);
    h.insert(&mut policy, "c", 4);

    // Oldest recency first: c was stamped at 4.
    assert_eq!(h.evict(&mut policy, "x"), "c");
    // b and a share recency 5, b was inserted first.
    assert_eq!(h.evict(&mut policy, "x"), "b");
  }

  #[test]
  fn insertion_order_tie_break_ignores_recency() {
    let config = PolicyConfig::default()
      .score_weights(ScoreWeights {
        recency: 0.0,
        frequency: 1.0,
        predictive: 0.0,
        coupling: 0.0,
      })
      .tie_break(TieBreak::InsertionOrder);
    let mut policy = ScoredPolicy::with_config(config).unwrap();
    let mut h = Harness::new();
    h.insert(&mut policy, "b", 5);
    h.insert(&mut policy, "c", 4);

    assert_eq!(h.evict(&mut policy, "x"), "b");
  }

  #[test]
  fn hit_updates_recency_and_clamps_predictive_score() {
    let config = PolicyConfig::default().hit_boost(3.0).max_predictive_score(5.0);
    let mut policy = ScoredPolicy::with_config(config).unwrap();
    let mut h = Harness::new();
    h.insert(&mut policy, "a", 0);
    h.hit(&mut policy, "a", 7);
    h.hit(&mut policy, "a", 7);

    let record = policy.metadata().get(&"a").unwrap();
    assert_eq!(record.recency, 7);
    assert_eq!(record.frequency, 3.0);
    assert_eq!(record.predictive_score, 5.0);
  }

  #[test]
  fn repeated_hits_keep_favouring_the_hit_key() {
    let mut policy = ScoredPolicy::new();
    let mut h = Harness::new();
    h.insert(&mut policy, "hot", 0);
    h.insert(&mut policy, "cold", 0);

    let mut previous_gap = 0.0;
    for t in 1..=1000 {
      h.hit(&mut policy, "hot", t);
      let hot = policy.score(&"hot", t);
      let cold = policy.score(&"cold", t);
      assert!(hot.is_finite());
      assert!(hot - cold > previous_gap, "gap shrank at access {}", t);
      previous_gap = hot - cold;
    }
    assert_eq!(h.evict(&mut policy, "new"), "cold");
  }

  #[test]
  fn hit_on_cached_untracked_key_creates_record() {
    let mut policy = ScoredPolicy::new();
    let mut store = ObjectStore::new();
    store.insert(CacheObject::new("ghost", 1));
    policy.on_hit(&CacheSnapshot::new(&store, 10, 4, 1), &"ghost");

    let record = policy.metadata().get(&"ghost").unwrap();
    assert_eq!(record.recency, 4);
    assert_eq!(policy.tracked_len(), 1);
  }

  #[test]
  fn hit_on_absent_key_leaves_no_record() {
    let mut policy = ScoredPolicy::with_config(PolicyConfig::default().coupling(CouplingConfig::default())).unwrap();
    let mut h = Harness::new();
    h.insert(&mut policy, "a", 0);
    h.hit(&mut policy, "ghost", 1);

    assert!(!policy.is_tracking(&"ghost"));
    assert_eq!(policy.tracked_len(), 1);
    assert_eq!(policy.metadata().coupling_strength(&"a"), 0.0);
  }

  #[test]
  fn hit_decay_only_touches_other_keys() {
    let config = PolicyConfig::default().hit_decay_factor(0.5);
    let mut policy = ScoredPolicy::with_config(config).unwrap();
    let mut h = Harness::new();
    h.insert(&mut policy, "a", 0);
    h.insert(&mut policy, "b", 1);
    h.hit(&mut policy, "a", 2);

    assert_eq!(policy.metadata().get(&"a").unwrap().frequency, 2.0);
    assert_eq!(policy.metadata().get(&"b").unwrap().frequency, 0.5);
  }

  #[test]
  fn eviction_removes_record_and_decays_the_rest() {
    let config = PolicyConfig::default().decay_factor(0.5);
    let mut policy = ScoredPolicy::with_config(config).unwrap();
    let mut h = Harness::new();
    h.insert(&mut policy, "a", 0);
    h.insert(&mut policy, "b", 1);
    h.hit(&mut policy, "b", 2);

    assert_eq!(h.evict(&mut policy, "c"), "a");
    assert!(!policy.is_tracking(&"a"));
    assert_eq!(policy.tracked_len(), 1);

    let b = policy.metadata().get(&"b").unwrap();
    assert_eq!(b.frequency, 1.0);
    assert_eq!(b.predictive_score, 0.5);
  }

  #[test]
  fn missing_metadata_is_ranked_with_defaults() {
    let policy = ScoredPolicy::<&str>::new();
    let mut store = ObjectStore::new();
    store.insert(CacheObject::new("ghost", 1));
    let snapshot = CacheSnapshot::new(&store, 10, 3, 0);

    let victim = policy.evict(&snapshot, &CacheObject::new("x", 1)).unwrap();
    assert_eq!(victim, "ghost");
    assert!(policy.score(&"ghost", 3).is_finite());
  }

  #[test]
  fn self_eviction_leaves_no_trace() {
    let mut policy = ScoredPolicy::with_config(PolicyConfig::default().coupling(CouplingConfig::default())).unwrap();
    let mut h = Harness::new();
    h.insert(&mut policy, "k", 0);

    let victim = h.evict(&mut policy, "k");
    assert_eq!(victim, "k");
    assert!(!policy.is_tracking(&"k"));
    assert_eq!(policy.tracked_len(), 0);
    assert_eq!(policy.metadata().coupling_strength(&"k"), 0.0);
  }

  #[test]
  fn coupling_links_consecutive_touches() {
    let config = PolicyConfig::default().coupling(CouplingConfig {
      max_neighbors: 4,
      hit_strength: 1.0,
      insert_strength: 0.5,
    });
    let mut policy = ScoredPolicy::with_config(config).unwrap();
    let mut h = Harness::new();
    h.insert(&mut policy, "a", 0);
    h.insert(&mut policy, "b", 1);
    h.hit(&mut policy, "a", 2);

    let meta = policy.metadata();
    assert_eq!(meta.link_strength(&"a", &"b"), 1.5);
    assert_eq!(meta.link_strength(&"b", &"a"), 1.5);

    // Coupled keys score higher than an otherwise identical loner.
    h.insert(&mut policy, "c", 3);
    let b_score = policy.score(&"b", 3);
    let mut loner = ScoredPolicy::new();
    let mut h2 = Harness::new();
    h2.insert(&mut loner, "b", 1);
    assert!(b_score > loner.score(&"b", 3));
  }

  #[test]
  fn coupling_is_off_by_default() {
    let mut policy = ScoredPolicy::new();
    let mut h = Harness::new();
    h.insert(&mut policy, "a", 0);
    h.insert(&mut policy, "b", 1);
    h.hit(&mut policy, "a", 2);
    assert_eq!(policy.metadata().coupling_strength(&"a"), 0.0);
  }

  #[test]
  fn clear_drops_everything() {
    let mut policy = ScoredPolicy::new();
    let mut h = Harness::new();
    h.insert(&mut policy, "a", 0);
    policy.clear();
    assert_eq!(policy.tracked_len(), 0);
  }
}
