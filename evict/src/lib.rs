//! A scoring-based, pluggable cache eviction policy and a trace-driven cache
//! simulator to evaluate it.
//!
//! # Features
//! - **Policy Contract**: Any [`EvictionPolicy`] can drive a cache manager
//!   through four calls: `evict`, `on_hit`, `on_insert` and `on_evict`.
//! - **Scored Eviction**: [`ScoredPolicy`] ranks keys by a weighted blend of
//!   recency, decayed frequency, a bounded predictive score and optional
//!   key-to-key coupling. The lowest score is evicted.
//! - **Deterministic**: Equal scores are broken by age and insertion order,
//!   so the same trace always yields the same victims.
//! - **Configurable**: Every constant deserializes from YAML or JSON, with
//!   presets for recency- and frequency-leaning weightings.
//! - **Simulation**: [`Simulator`] replays access traces and reports miss
//!   ratios, with FIFO and LRU baselines for comparison.

pub mod config;
pub mod error;
pub mod metrics;
pub mod object;
pub mod policy;
pub mod sim;
pub mod snapshot;
pub mod store;

pub use config::{CouplingConfig, PolicyConfig, PolicyPreset, SimulationConfig, TraceFormat};
pub use error::{ConfigError, PolicyError, Result, SimulationError, TraceError};
pub use metrics::MetricsSnapshot;
pub use object::CacheObject;
pub use policy::fifo::Fifo;
pub use policy::lru::Lru;
pub use policy::metadata::{KeyMetadata, PolicyMetadata};
pub use policy::score::{ScoreWeights, TieBreak};
pub use policy::scored::ScoredPolicy;
pub use policy::EvictionPolicy;
pub use sim::{miss_ratio_reduction, SharedCache, SimulatedCache, SimulationReport, Simulator, Trace};
pub use snapshot::CacheSnapshot;
pub use store::ObjectStore;
