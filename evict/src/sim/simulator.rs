use crate::config::SimulationConfig;
use crate::error::{ConfigError, Result, SimulationError};
use crate::metrics::MetricsSnapshot;
use crate::policy::EvictionPolicy;
use crate::sim::cache::SimulatedCache;
use crate::sim::trace::Trace;

use std::path::Path;

/// Replays access traces through a [`SimulatedCache`] and reports how the
/// policy fared.
#[derive(Debug, Clone)]
pub struct Simulator {
  config: SimulationConfig,
}

/// The outcome of a single simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
  pub policy: &'static str,
  pub accesses: u64,
  pub hits: u64,
  /// `1 - hits / accesses`, rounded to four decimal places.
  pub miss_ratio: f64,
  pub metrics: MetricsSnapshot,
}

impl Simulator {
  pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
    config.validate()?;
    Ok(Self { config })
  }

  pub fn config(&self) -> &SimulationConfig {
    &self.config
  }

  /// Reads a trace file using the configured trace format.
  pub fn load_trace(&self, path: &Path) -> Result<Trace> {
    Ok(Trace::open(path, &self.config.trace)?)
  }

  /// Runs `trace` against a fresh cache driven by `policy`.
  pub fn run<P>(&self, trace: &Trace, policy: P) -> Result<SimulationReport>
  where
    P: EvictionPolicy<String>,
  {
    if trace.is_empty() {
      return Err(SimulationError::EmptyTrace);
    }

    let name = policy.name();
    let mut cache = SimulatedCache::from_config(&self.config, policy)?;
    for request in trace.iter() {
      cache.get(request.clone())?;
    }

    let accesses = cache.access_count();
    let hits = cache.hit_count();
    let miss_ratio = round4(1.0 - hits as f64 / accesses as f64);
    let metrics = cache.metrics();

    tracing::debug!(
      policy = name,
      capacity = self.config.capacity,
      accesses,
      hits,
      miss_ratio,
      evictions = metrics.evictions,
      "simulation finished"
    );

    Ok(SimulationReport {
      policy: name,
      accesses,
      hits,
      miss_ratio,
      metrics,
    })
  }
}

/// Relative improvement of `miss_ratio` over `baseline`.
///
/// Positive when `miss_ratio` is lower than the baseline. A regression is
/// measured against `miss_ratio` and an improvement against `baseline`, so
/// the result always lies in `[-1, 1]`.
pub fn miss_ratio_reduction(miss_ratio: f64, baseline: f64) -> Result<f64> {
  if miss_ratio == 0.0 || baseline == 0.0 {
    return Err(SimulationError::ZeroMissRatio);
  }
  if miss_ratio > baseline {
    Ok((baseline - miss_ratio) / miss_ratio)
  } else {
    Ok((baseline - miss_ratio) / baseline)
  }
}

fn round4(value: f64) -> f64 {
  (value * 10_000.0).round() / 10_000.0
}
