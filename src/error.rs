//! Errors raised while building or synthesizing a stack.

use thiserror::Error;

use crate::types::LogicalId;

/// Result type of stack construction and synthesis.
pub type Result<T> = std::result::Result<T, SynthError>;

/// Errors detected from the in-memory resource graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthError {
  #[error("duplicate logical id '{id}' for construct at '{path}'")]
  DuplicateId { id: LogicalId, path: String },

  #[error("cannot derive a logical id for construct path '{path}'")]
  InvalidId { path: String },

  #[error("no resource '{0}' in this stack")]
  UnknownResource(LogicalId),

  #[error("'{referrer}' references '{target}', which does not exist in this stack")]
  UnresolvedReference {
    referrer: LogicalId,
    target: LogicalId,
  },

  #[error("cyclic dependency: {}", join_cycle(.cycle))]
  CyclicDependency { cycle: Vec<LogicalId> },

  #[error("invalid property '{property}' on '{id}': {reason}")]
  InvalidProperty {
    id: LogicalId,
    property: String,
    reason: String,
  },

  #[error("{} errors: {}", .0.len(), join_errors(.0))]
  Aggregate(Vec<SynthError>),
}

fn join_cycle(cycle: &[LogicalId]) -> String {
  let mut parts: Vec<&str> = cycle.iter().map(LogicalId::as_str).collect();
  if let Some(first) = cycle.first() {
    parts.push(first.as_str());
  }
  parts.join(" -> ")
}

fn join_errors(errors: &[SynthError]) -> String {
  errors
    .iter()
    .map(|e| e.to_string())
    .collect::<Vec<_>>()
    .join("; ")
}

impl SynthError {
  /// Flattens an aggregate into its member errors.
  pub fn into_errors(self) -> Vec<SynthError> {
    match self {
      SynthError::Aggregate(errors) => errors.into_iter().flat_map(Self::into_errors).collect(),
      other => vec![other],
    }
  }

  /// Ok for no errors, the error itself for one, an aggregate for several.
  pub fn aggregate(errors: Vec<SynthError>) -> Result<()> {
    let mut errors: Vec<SynthError> = errors.into_iter().flat_map(Self::into_errors).collect();
    match errors.len() {
      0 => Ok(()),
      1 => Err(errors.remove(0)),
      _ => Err(SynthError::Aggregate(errors)),
    }
  }
}
