//! A typed infrastructure object owned by a stack.

use indexmap::IndexSet;

use super::logical_id::display_path;
use super::{LogicalId, Properties, StackId, Token, Value};

/// A single typed infrastructure object (role, function, REST API, ...).
#[derive(Debug, Clone)]
pub struct ResourceNode {
  pub(crate) logical_id: LogicalId,
  /// Construction path, local name last.
  pub(crate) path: Vec<String>,
  pub(crate) type_tag: String,
  pub(crate) properties: Properties,
  /// Resources that must be created strictly before this one.
  pub(crate) explicit_dependencies: IndexSet<LogicalId>,
}

impl ResourceNode {
  pub fn logical_id(&self) -> &LogicalId {
    &self.logical_id
  }

  pub fn path(&self) -> String {
    display_path(&self.path)
  }

  pub fn type_tag(&self) -> &str {
    &self.type_tag
  }

  pub fn properties(&self) -> &Properties {
    &self.properties
  }

  pub fn explicit_dependencies(&self) -> impl Iterator<Item = &LogicalId> {
    self.explicit_dependencies.iter()
  }

  /// Resources referenced from properties (implicit dependencies), first occurrence order.
  pub fn references(&self) -> Vec<&ResourceHandle> {
    let mut seen = IndexSet::new();
    for value in self.properties.values() {
      for target in value.references() {
        seen.insert(target);
      }
    }
    seen.into_iter().collect()
  }

  /// Returns false if the dependency was already recorded.
  pub(crate) fn add_dependency(&mut self, on: LogicalId) -> bool {
    self.explicit_dependencies.insert(on)
  }
}

/// Handle returned by resource creation; mints tokens pointing at the resource.
///
/// A handle is bound to the stack that created it: stacks reject handles
/// (and tokens) minted elsewhere even when the logical id matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceHandle {
  stack: StackId,
  logical_id: LogicalId,
}

impl ResourceHandle {
  pub(crate) fn new(stack: StackId, logical_id: LogicalId) -> Self {
    Self { stack, logical_id }
  }

  /// Stack owning the resource.
  pub fn stack(&self) -> StackId {
    self.stack
  }

  pub fn logical_id(&self) -> &LogicalId {
    &self.logical_id
  }

  /// Token for the generated identifier of the resource.
  pub fn reference(&self) -> Value {
    Value::Token(Token::Ref(self.clone()))
  }

  /// Token for a named attribute of the resource.
  pub fn attribute(&self, name: impl Into<String>) -> Value {
    Value::Token(Token::GetAtt {
      target: self.clone(),
      attribute: name.into(),
    })
  }
}
