//! Logical identifiers and the construction paths they are derived from.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Hex digits of the path hash appended to ids of nested constructs.
const PATH_HASH_LEN: usize = 8;

/// Stack-unique name of a resource or output; its key in the template document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogicalId(String);

impl LogicalId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for LogicalId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for LogicalId {
  fn from(id: &str) -> Self {
    Self(id.to_string())
  }
}

/// Construction path of a scope below the stack root.
///
/// Scopes are plain values threaded explicitly into every creation call; the
/// stack root is the empty path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Scope {
  segments: Vec<String>,
}

impl Scope {
  pub fn root() -> Self {
    Self::default()
  }

  /// Returns the scope nested under this one with the given local name.
  pub fn child(&self, name: impl Into<String>) -> Self {
    let mut segments = self.segments.clone();
    segments.push(name.into());
    Self { segments }
  }

  pub fn segments(&self) -> &[String] {
    &self.segments
  }

  pub fn is_root(&self) -> bool {
    self.segments.is_empty()
  }

  /// Full path of a construct named `local_name` inside this scope.
  pub(crate) fn path_of(&self, local_name: &str) -> Vec<String> {
    let mut path = self.segments.clone();
    path.push(local_name.to_string());
    path
  }
}

/// Joins path components with `/` for display and metadata.
pub(crate) fn display_path(path: &[String]) -> String {
  path.join("/")
}

/// Keeps only ASCII alphanumeric characters of a path component.
pub(crate) fn sanitize(component: &str) -> String {
  component
    .chars()
    .filter(|c| c.is_ascii_alphanumeric())
    .collect()
}

/// Returns true if a local name can take part in id derivation.
pub(crate) fn is_valid_local_name(name: &str) -> bool {
  !name.contains('/') && name.chars().any(|c| c.is_ascii_alphanumeric())
}

/// First hex digits (upper case) of the SHA-256 of the `/`-joined path.
pub(crate) fn path_hash(path: &[String]) -> String {
  let mut hasher = Sha256::new();
  hasher.update(display_path(path).as_bytes());
  let digest = format!("{:x}", hasher.finalize());
  digest[..PATH_HASH_LEN].to_ascii_uppercase()
}

/// Derives the logical id of the construct at `path` (scope segments plus local name).
///
/// Constructs created directly under the stack keep their sanitized local name;
/// nested constructs get the concatenated sanitized components plus a hash of
/// the full path. Returns `None` when some component cannot be used.
pub(crate) fn derive_logical_id(path: &[String]) -> Option<LogicalId> {
  if path.is_empty() || !path.iter().all(|c| is_valid_local_name(c)) {
    return None;
  }
  let human: String = path.iter().map(|c| sanitize(c)).collect();
  if path.len() == 1 {
    return Some(LogicalId(human));
  }
  Some(LogicalId(format!("{}{}", human, path_hash(path))))
}
