use thiserror::Error;

/// Errors surfaced by an eviction policy to its cache manager.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
  /// `evict` was called while the cache held no objects. This is a bug in
  /// the calling cache manager's capacity accounting.
  #[error("cannot choose an eviction victim from an empty cache")]
  EmptyCache,
}

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Failed to read configuration file: {0}")]
  Read(#[from] std::io::Error),

  #[error("Failed to parse configuration: {0}")]
  Parse(String),

  #[error("Invalid configuration value for '{field}': {message}")]
  InvalidValue { field: String, message: String },
}

impl ConfigError {
  pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
    ConfigError::InvalidValue {
      field: field.to_string(),
      message: message.into(),
    }
  }
}

/// Errors raised while reading an access trace.
#[derive(Debug, Error)]
pub enum TraceError {
  #[error("Failed to read trace: {0}")]
  Io(#[from] std::io::Error),

  #[error("Trace line {line} has no column {column}")]
  MissingColumn { line: usize, column: usize },

  #[error("Trace line {line} has an invalid object size '{value}'")]
  InvalidSize { line: usize, value: String },
}

/// Errors raised by the simulated cache manager.
#[derive(Debug, Error)]
pub enum SimulationError {
  #[error(transparent)]
  Policy(#[from] PolicyError),

  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Trace(#[from] TraceError),

  /// The policy named a victim that is not present in the cache.
  #[error("policy chose victim '{key}' which is not in the cache")]
  InvalidVictim { key: String },

  /// An object size of zero was presented to the cache.
  #[error("object '{key}' has a size of zero")]
  ZeroSizedObject { key: String },

  #[error("simulation requires a non-empty trace")]
  EmptyTrace,

  /// Miss ratios of zero cannot be compared as a relative reduction.
  #[error("miss ratio must be non-zero to compute a reduction")]
  ZeroMissRatio,
}

/// A specialized `Result` type for `fibre_evict` operations.
pub type Result<T, E = SimulationError> = std::result::Result<T, E>;
