//! Stack container: owns every resource and output created within it.
//!
//! Nodes are created by passing the owning stack and an explicit [Scope];
//! there is no ambient registration. Logical ids are derived from the
//! construction path and checked for uniqueness at creation time.

use std::collections::HashMap;

use indexmap::IndexSet;
use tracing::{debug, instrument};

use crate::error::{Result, SynthError};
use crate::synthesizer::{self, SynthOptions};
use crate::types::logical_id::{derive_logical_id, display_path};
use crate::types::{
  LogicalId, OutputDecl, OutputOptions, Properties, PseudoValue, ResourceHandle, ResourceNode,
  Scope, StackId, TemplateDocument, Token, Value,
};

/// Root scope of one deployment unit.
///
/// Not `Clone`: handles are bound to the [StackId] of the stack that minted them.
#[derive(Debug)]
pub struct Stack {
  id: StackId,
  name: String,
  description: Option<String>,
  resources: Vec<ResourceNode>,
  outputs: Vec<OutputDecl>,
  /// Position of each resource in `resources`.
  resource_index: HashMap<LogicalId, usize>,
  /// Every id in use (resources and outputs) → construction path.
  claimed_ids: HashMap<LogicalId, String>,
}

impl Stack {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      id: StackId::next(),
      name: name.into(),
      description: None,
      resources: Vec::new(),
      outputs: Vec::new(),
      resource_index: HashMap::new(),
      claimed_ids: HashMap::new(),
    }
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  pub fn id(&self) -> StackId {
    self.id
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn description(&self) -> Option<&str> {
    self.description.as_deref()
  }

  /// Resources in creation order.
  pub fn resources(&self) -> &[ResourceNode] {
    &self.resources
  }

  /// Outputs in declaration order.
  pub fn outputs(&self) -> &[OutputDecl] {
    &self.outputs
  }

  pub fn resource(&self, id: &LogicalId) -> Option<&ResourceNode> {
    self.resource_index.get(id).map(|&i| &self.resources[i])
  }

  pub fn contains(&self, id: &LogicalId) -> bool {
    self.resource_index.contains_key(id)
  }

  /// Returns true if `handle` was minted by this stack for one of its resources.
  pub fn owns(&self, handle: &ResourceHandle) -> bool {
    handle.stack() == self.id && self.contains(handle.logical_id())
  }

  pub fn len(&self) -> usize {
    self.resources.len()
  }

  pub fn is_empty(&self) -> bool {
    self.resources.is_empty()
  }

  /// Creates a resource named `local_name` inside `scope`.
  ///
  /// `depends_on` adds explicit dependencies and must hold handles of this
  /// stack; references inside `properties` add implicit ones and are checked
  /// when the stack is synthesized.
  #[instrument(level = "trace", skip(self, scope, type_tag, properties, depends_on))]
  pub fn create_resource(
    &mut self,
    scope: &Scope,
    local_name: &str,
    type_tag: impl Into<String>,
    properties: Properties,
    depends_on: &[&ResourceHandle],
  ) -> Result<ResourceHandle> {
    for on in depends_on {
      self.check_owned(on)?;
    }
    let path = scope.path_of(local_name);
    let logical_id = self.claim_id(&path)?;
    let type_tag = type_tag.into();
    debug!(id = %logical_id, type_tag = %type_tag, "created resource");

    let explicit_dependencies: IndexSet<LogicalId> = depends_on
      .iter()
      .map(|h| h.logical_id().clone())
      .collect();
    self
      .resource_index
      .insert(logical_id.clone(), self.resources.len());
    self.resources.push(ResourceNode {
      logical_id: logical_id.clone(),
      path,
      type_tag,
      properties,
      explicit_dependencies,
    });
    Ok(ResourceHandle::new(self.id, logical_id))
  }

  /// Records that `node` must be created after `on`. Adding the same edge twice is a no-op.
  ///
  /// Both handles must belong to this stack.
  #[instrument(level = "trace", skip(self))]
  pub fn add_dependency(&mut self, node: &ResourceHandle, on: &ResourceHandle) -> Result<()> {
    self.check_owned(on)?;
    let resource = self.resource_mut(node)?;
    if resource.add_dependency(on.logical_id().clone()) {
      debug!(node = %node.logical_id(), on = %on.logical_id(), "added explicit dependency");
    }
    Ok(())
  }

  /// Sets (or replaces) one property of an existing resource.
  pub fn set_property(
    &mut self,
    node: &ResourceHandle,
    name: impl Into<String>,
    value: Value,
  ) -> Result<()> {
    let resource = self.resource_mut(node)?;
    resource.properties.insert(name.into(), value);
    Ok(())
  }

  /// Declares a stack output. Outputs share the logical id namespace with resources.
  #[instrument(level = "trace", skip(self, scope, value, options))]
  pub fn add_output(
    &mut self,
    scope: &Scope,
    name: &str,
    value: Value,
    options: OutputOptions,
  ) -> Result<LogicalId> {
    let path = scope.path_of(name);
    let logical_id = self.claim_id(&path)?;
    debug!(id = %logical_id, "declared output");
    self.outputs.push(OutputDecl {
      logical_id: logical_id.clone(),
      path,
      value,
      options,
    });
    Ok(logical_id)
  }

  /// Region the stack is deployed to.
  pub fn region(&self) -> Value {
    pseudo(PseudoValue::Region)
  }

  /// Account the stack is deployed to.
  pub fn account(&self) -> Value {
    pseudo(PseudoValue::AccountId)
  }

  /// Name of the deployed stack.
  pub fn stack_name(&self) -> Value {
    pseudo(PseudoValue::StackName)
  }

  pub fn partition(&self) -> Value {
    pseudo(PseudoValue::Partition)
  }

  pub fn url_suffix(&self) -> Value {
    pseudo(PseudoValue::UrlSuffix)
  }

  /// Synthesizes the stack into a template document.
  pub fn synthesize(&self, options: &SynthOptions) -> Result<TemplateDocument> {
    synthesizer::synthesize(self, options)
  }

  fn claim_id(&mut self, path: &[String]) -> Result<LogicalId> {
    let display = display_path(path);
    let id = derive_logical_id(path).ok_or_else(|| SynthError::InvalidId {
      path: display.clone(),
    })?;
    if self.claimed_ids.contains_key(&id) {
      return Err(SynthError::DuplicateId { id, path: display });
    }
    self.claimed_ids.insert(id.clone(), display);
    Ok(id)
  }

  fn check_owned(&self, handle: &ResourceHandle) -> Result<()> {
    if self.owns(handle) {
      Ok(())
    } else {
      Err(SynthError::UnknownResource(handle.logical_id().clone()))
    }
  }

  fn resource_mut(&mut self, handle: &ResourceHandle) -> Result<&mut ResourceNode> {
    self.check_owned(handle)?;
    match self.resource_index.get(handle.logical_id()) {
      Some(&i) => Ok(&mut self.resources[i]),
      None => Err(SynthError::UnknownResource(handle.logical_id().clone())),
    }
  }
}

fn pseudo(value: PseudoValue) -> Value {
  Value::Token(Token::Pseudo(value))
}
