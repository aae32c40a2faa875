use crate::config::TraceFormat;
use crate::error::TraceError;
use crate::object::CacheObject;

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// An ordered sequence of requests to replay through a simulated cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
  requests: Vec<CacheObject<String>>,
}

impl Trace {
  pub fn new(requests: Vec<CacheObject<String>>) -> Self {
    Self { requests }
  }

  /// Builds a trace of unit-sized requests.
  pub fn from_keys<I, S>(keys: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      requests: keys.into_iter().map(|k| CacheObject::new(k.into(), 1)).collect(),
    }
  }

  /// Parses delimiter-separated rows. Blank lines are skipped.
  pub fn from_reader<R: BufRead>(reader: R, format: &TraceFormat) -> Result<Self, TraceError> {
    let mut requests = Vec::new();
    for (index, line) in reader.lines().enumerate() {
      let line = line?;
      let line_no = index + 1;
      if index == 0 && format.has_header {
        continue;
      }
      if line.trim().is_empty() {
        continue;
      }

      // Runs of whitespace count as one separator.
      let fields: Vec<&str> = if format.delimiter.is_whitespace() {
        line.split_whitespace().collect()
      } else {
        line.split(format.delimiter).map(str::trim).collect()
      };
      let key = fields
        .get(format.key_column)
        .ok_or(TraceError::MissingColumn {
          line: line_no,
          column: format.key_column,
        })?;

      let size = match format.size_column {
        Some(column) => {
          let raw = fields.get(column).ok_or(TraceError::MissingColumn { line: line_no, column })?;
          match raw.parse::<u64>() {
            Ok(size) if size > 0 => size,
            _ => {
              return Err(TraceError::InvalidSize {
                line: line_no,
                value: raw.to_string(),
              })
            }
          }
        }
        None => 1,
      };

      requests.push(CacheObject::new(key.to_string(), size));
    }

    tracing::debug!(requests = requests.len(), "parsed access trace");
    Ok(Self { requests })
  }

  pub fn open(path: &Path, format: &TraceFormat) -> Result<Self, TraceError> {
    let file = File::open(path)?;
    Self::from_reader(BufReader::new(file), format)
  }

  pub fn len(&self) -> usize {
    self.requests.len()
  }

  pub fn is_empty(&self) -> bool {
    self.requests.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &CacheObject<String>> {
    self.requests.iter()
  }

  /// The number of distinct keys requested.
  pub fn unique_keys(&self) -> usize {
    self.requests.iter().map(|r| r.key()).collect::<HashSet<_>>().len()
  }

  /// The trace restricted to requests `start..end`.
  pub fn slice(&self, start: usize, end: usize) -> Trace {
    let end = end.min(self.requests.len());
    let start = start.min(end);
    Trace {
      requests: self.requests[start..end].to_vec(),
    }
  }
}
