//! Configuration for the scored policy and the simulator.
//!
//! Every struct here deserializes from YAML or JSON with unknown fields
//! rejected. Values parsed from text are validated before they are returned;
//! values assembled in code with the builder methods are validated when a
//! policy or simulator is constructed from them.

use crate::error::ConfigError;
use crate::policy::score::{ScoreWeights, TieBreak};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Ready-made weightings covering the common shapes of scoring heuristics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyPreset {
  /// Recency, frequency and predictive score weighted equally.
  Balanced,
  /// Approximates LRU: recency dominates, frequency only breaks near-ties.
  RecencyBiased,
  /// Approximates a decayed LFU: frequency dominates.
  FrequencyBiased,
}

/// Settings for the optional key-to-key coupling extension.
///
/// When enabled, each hit or insert links the touched key to the key touched
/// just before it, and the sum of a key's link strengths contributes to its
/// score with weight `score_weights.coupling`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CouplingConfig {
  /// Maximum number of links kept per key. The weakest link is dropped when
  /// a new one would exceed this.
  pub max_neighbors: usize,
  /// Strength added to a link when one side is hit right after the other.
  pub hit_strength: f64,
  /// Strength of the link created when a key is inserted.
  pub insert_strength: f64,
}

impl Default for CouplingConfig {
  fn default() -> Self {
    Self {
      max_neighbors: 8,
      hit_strength: 1.0,
      insert_strength: 0.5,
    }
  }
}

/// Configuration of a [`ScoredPolicy`](crate::policy::scored::ScoredPolicy).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
  /// Recency assumed for a key whose metadata is missing.
  pub initial_recency: u64,
  pub initial_frequency: f64,
  pub initial_predictive_score: f64,
  /// Added to the predictive score on every hit.
  pub hit_boost: f64,
  /// Ceiling for the predictive score.
  pub max_predictive_score: f64,
  /// Multiplier applied to every remaining key after an eviction.
  pub decay_factor: f64,
  /// Multiplier applied to every other key's frequency on a hit.
  /// `1.0` disables hit decay.
  pub hit_decay_factor: f64,
  pub score_weights: ScoreWeights,
  pub tie_break: TieBreak,
  /// `None` disables coupling.
  pub coupling: Option<CouplingConfig>,
}

impl Default for PolicyConfig {
  fn default() -> Self {
    Self {
      initial_recency: 0,
      initial_frequency: 1.0,
      initial_predictive_score: 0.0,
      hit_boost: 1.0,
      max_predictive_score: 16.0,
      decay_factor: 0.95,
      hit_decay_factor: 1.0,
      score_weights: ScoreWeights::default(),
      tie_break: TieBreak::default(),
      coupling: None,
    }
  }
}

impl PolicyConfig {
  /// Creates a configuration from a preset. Builder methods can refine it.
  pub fn preset(preset: PolicyPreset) -> Self {
    let score_weights = match preset {
      PolicyPreset::Balanced => ScoreWeights::default(),
      PolicyPreset::RecencyBiased => ScoreWeights {
        recency: 8.0,
        frequency: 0.01,
        predictive: 0.0,
        coupling: 0.0,
      },
      PolicyPreset::FrequencyBiased => ScoreWeights {
        recency: 0.01,
        frequency: 1.0,
        predictive: 0.25,
        coupling: 0.0,
      },
    };
    Self {
      score_weights,
      ..Self::default()
    }
  }

  pub fn initial_recency(mut self, recency: u64) -> Self {
    self.initial_recency = recency;
    self
  }

  pub fn initial_frequency(mut self, frequency: f64) -> Self {
    self.initial_frequency = frequency;
    self
  }

  pub fn initial_predictive_score(mut self, score: f64) -> Self {
    self.initial_predictive_score = score;
    self
  }

  pub fn hit_boost(mut self, boost: f64) -> Self {
    self.hit_boost = boost;
    self
  }

  pub fn max_predictive_score(mut self, max: f64) -> Self {
    self.max_predictive_score = max;
    self
  }

  pub fn decay_factor(mut self, factor: f64) -> Self {
    self.decay_factor = factor;
    self
  }

  pub fn hit_decay_factor(mut self, factor: f64) -> Self {
    self.hit_decay_factor = factor;
    self
  }

  pub fn score_weights(mut self, weights: ScoreWeights) -> Self {
    self.score_weights = weights;
    self
  }

  pub fn tie_break(mut self, tie_break: TieBreak) -> Self {
    self.tie_break = tie_break;
    self
  }

  /// Enables the coupling extension.
  pub fn coupling(mut self, coupling: CouplingConfig) -> Self {
    self.coupling = Some(coupling);
    self
  }

  /// Checks that every value keeps scores finite and totally ordered.
  pub fn validate(&self) -> Result<(), ConfigError> {
    non_negative("initial_frequency", self.initial_frequency)?;
    non_negative("initial_predictive_score", self.initial_predictive_score)?;
    non_negative("hit_boost", self.hit_boost)?;
    non_negative("max_predictive_score", self.max_predictive_score)?;
    if self.initial_predictive_score > self.max_predictive_score {
      return Err(ConfigError::invalid(
        "initial_predictive_score",
        "must not exceed max_predictive_score",
      ));
    }
    unit_factor("decay_factor", self.decay_factor)?;
    unit_factor("hit_decay_factor", self.hit_decay_factor)?;

    let w = &self.score_weights;
    non_negative("score_weights.recency", w.recency)?;
    non_negative("score_weights.frequency", w.frequency)?;
    non_negative("score_weights.predictive", w.predictive)?;
    non_negative("score_weights.coupling", w.coupling)?;

    if let Some(coupling) = &self.coupling {
      if coupling.max_neighbors == 0 {
        return Err(ConfigError::invalid(
          "coupling.max_neighbors",
          "must be at least 1",
        ));
      }
      non_negative("coupling.hit_strength", coupling.hit_strength)?;
      non_negative("coupling.insert_strength", coupling.insert_strength)?;
    }
    Ok(())
  }

  pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
    let config: Self = parse(text, ConfigFormat::Json)?;
    config.validate()?;
    Ok(config)
  }

  #[cfg(feature = "yaml")]
  pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
    let config: Self = parse(text, ConfigFormat::Yaml)?;
    config.validate()?;
    Ok(config)
  }

  /// Loads a configuration file, choosing the format from its extension.
  pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
    let config: Self = load(path)?;
    config.validate()?;
    Ok(config)
  }
}

/// Describes how to read an access trace: one request per row, fields
/// separated by `delimiter`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TraceFormat {
  /// Zero-based column holding the object key.
  pub key_column: usize,
  /// Zero-based column holding the object size. `None` gives every object
  /// a size of 1.
  pub size_column: Option<usize>,
  /// Skip the first row.
  pub has_header: bool,
  pub delimiter: char,
}

impl Default for TraceFormat {
  fn default() -> Self {
    Self {
      key_column: 0,
      size_column: None,
      has_header: false,
      delimiter: ',',
    }
  }
}

/// Configuration of a trace-driven simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
  /// Capacity of the simulated cache, in the same unit as object sizes.
  pub capacity: u64,
  /// When false, every object counts as size 1 regardless of the trace.
  #[serde(default)]
  pub consider_obj_size: bool,
  #[serde(default)]
  pub trace: TraceFormat,
}

impl SimulationConfig {
  pub fn new(capacity: u64) -> Self {
    Self {
      capacity,
      consider_obj_size: false,
      trace: TraceFormat::default(),
    }
  }

  pub fn consider_obj_size(mut self, consider: bool) -> Self {
    self.consider_obj_size = consider;
    self
  }

  pub fn trace_format(mut self, format: TraceFormat) -> Self {
    self.trace = format;
    self
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.capacity == 0 {
      return Err(ConfigError::invalid("capacity", "must be a positive integer"));
    }
    if self.trace.size_column.is_some_and(|c| c == self.trace.key_column) {
      return Err(ConfigError::invalid(
        "trace.size_column",
        "must differ from trace.key_column",
      ));
    }
    Ok(())
  }

  pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
    let config: Self = parse(text, ConfigFormat::Json)?;
    config.validate()?;
    Ok(config)
  }

  #[cfg(feature = "yaml")]
  pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
    let config: Self = parse(text, ConfigFormat::Yaml)?;
    config.validate()?;
    Ok(config)
  }

  pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
    let config: Self = load(path)?;
    config.validate()?;
    Ok(config)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
  Json,
  #[cfg(feature = "yaml")]
  Yaml,
}

impl ConfigFormat {
  fn from_path(path: &Path) -> Result<Self, ConfigError> {
    match path.extension().and_then(|e| e.to_str()) {
      Some("json") => Ok(ConfigFormat::Json),
      #[cfg(feature = "yaml")]
      Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
      other => Err(ConfigError::Parse(format!(
        "unsupported configuration file extension: {:?}",
        other
      ))),
    }
  }
}

fn parse<T: DeserializeOwned>(text: &str, format: ConfigFormat) -> Result<T, ConfigError> {
  match format {
    ConfigFormat::Json => serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string())),
    #[cfg(feature = "yaml")]
    ConfigFormat::Yaml => serde_yaml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string())),
  }
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
  let format = ConfigFormat::from_path(path)?;
  let text = fs::read_to_string(path)?;
  parse(&text, format)
}

fn non_negative(field: &str, value: f64) -> Result<(), ConfigError> {
  if !value.is_finite() || value < 0.0 {
    return Err(ConfigError::invalid(
      field,
      format!("must be finite and non-negative, got {}", value),
    ));
  }
  Ok(())
}

fn unit_factor(field: &str, value: f64) -> Result<(), ConfigError> {
  if !(value > 0.0 && value <= 1.0) {
    return Err(ConfigError::invalid(
      field,
      format!("must be in (0, 1], got {}", value),
    ));
  }
  Ok(())
}
