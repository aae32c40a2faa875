use super::metadata::KeyMetadata;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Weights of the composite score. Lower scores are evicted first.
///
/// ```text
/// score = recency    * 1 / (1 + age)
///       + frequency  * frequency
///       + predictive * predictive_score
///       + coupling   * sum(link strengths)
/// ```
///
/// `age` is the number of accesses since the key was last touched, so every
/// term grows as a key becomes more worth keeping. The `+ 1` keeps the
/// recency term finite for a key touched at the current access.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScoreWeights {
  pub recency: f64,
  pub frequency: f64,
  pub predictive: f64,
  pub coupling: f64,
}

impl Default for ScoreWeights {
  fn default() -> Self {
    Self {
      recency: 1.0,
      frequency: 1.0,
      predictive: 1.0,
      coupling: 1.0,
    }
  }
}

impl ScoreWeights {
  /// Computes the composite score of a record as seen at `access_count`.
  pub fn score(&self, meta: &KeyMetadata, access_count: u64, coupling: f64) -> f64 {
    let age = access_count.saturating_sub(meta.recency) as f64;
    let recency_term = 1.0 / (1.0 + age);
    self.recency * recency_term
      + self.frequency * meta.frequency
      + self.predictive * meta.predictive_score
      + self.coupling * coupling
  }
}

/// How candidates with equal composite scores are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
  /// The least recently touched key first, then the first inserted.
  #[default]
  OldestFirst,
  /// The first inserted key first, ignoring recency.
  InsertionOrder,
}

/// An eviction candidate's rank. The minimum over all candidates under
/// [`Rank::cmp_with`] is the victim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Rank {
  pub(crate) score: f64,
  pub(crate) recency: u64,
  pub(crate) sequence: u64,
}

impl Rank {
  pub(crate) fn cmp_with(&self, other: &Rank, tie_break: TieBreak) -> Ordering {
    let by_score = self.score.total_cmp(&other.score);
    match tie_break {
      TieBreak::OldestFirst => by_score
        .then(self.recency.cmp(&other.recency))
        .then(self.sequence.cmp(&other.sequence)),
      TieBreak::InsertionOrder => by_score.then(self.sequence.cmp(&other.sequence)),
    }
  }
}
