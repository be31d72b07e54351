//! Declared stack outputs.

use super::logical_id::display_path;
use super::{LogicalId, ResourceHandle, Value};

/// Optional settings of a stack output.
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
  pub description: Option<String>,
  /// Name under which the value is exported to other stacks.
  pub export_name: Option<Value>,
}

impl OutputOptions {
  pub fn described(description: impl Into<String>) -> Self {
    Self {
      description: Some(description.into()),
      export_name: None,
    }
  }
}

/// A named value published by the stack after deployment.
#[derive(Debug, Clone)]
pub struct OutputDecl {
  pub(crate) logical_id: LogicalId,
  pub(crate) path: Vec<String>,
  pub(crate) value: Value,
  pub(crate) options: OutputOptions,
}

impl OutputDecl {
  pub fn logical_id(&self) -> &LogicalId {
    &self.logical_id
  }

  pub fn path(&self) -> String {
    display_path(&self.path)
  }

  pub fn value(&self) -> &Value {
    &self.value
  }

  pub fn description(&self) -> Option<&str> {
    self.options.description.as_deref()
  }

  pub fn export_name(&self) -> Option<&Value> {
    self.options.export_name.as_ref()
  }

  pub fn references(&self) -> Vec<&ResourceHandle> {
    let mut ids = self.value.references();
    if let Some(export) = &self.options.export_name {
      ids.extend(export.references());
    }
    ids
  }
}
