//! Optional property validation for known resource kinds.
//!
//! Only required properties and the coarse kind of each known property are
//! checked; anything finer is left to the provisioning backend. Resource kinds
//! without rules are accepted as-is.

use tracing::instrument;

use crate::error::{Result, SynthError};
use crate::resource_types as rt;
use crate::stack::Stack;
use crate::types::{ResourceNode, Value};

/// Coarse shape a property value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
  /// A string or any token.
  String,
  Bool,
  Map,
  List,
  Any,
}

impl PropertyKind {
  fn accepts(&self, value: &Value) -> bool {
    match self {
      PropertyKind::Any => true,
      PropertyKind::String => matches!(value, Value::String(_) | Value::Token(_)),
      PropertyKind::Bool => matches!(value, Value::Bool(_)),
      PropertyKind::Map => matches!(value, Value::Map(_)),
      PropertyKind::List => matches!(value, Value::List(_)),
    }
  }

  fn describe(&self) -> &'static str {
    match self {
      PropertyKind::String => "a string",
      PropertyKind::Bool => "a boolean",
      PropertyKind::Map => "a mapping",
      PropertyKind::List => "a list",
      PropertyKind::Any => "any value",
    }
  }
}

/// Rule for one property of a resource kind.
#[derive(Debug, Clone, Copy)]
pub struct PropertyRule {
  pub name: &'static str,
  pub kind: PropertyKind,
  pub required: bool,
}

const fn req(name: &'static str, kind: PropertyKind) -> PropertyRule {
  PropertyRule {
    name,
    kind,
    required: true,
  }
}

const fn opt(name: &'static str, kind: PropertyKind) -> PropertyRule {
  PropertyRule {
    name,
    kind,
    required: false,
  }
}

use PropertyKind::{Bool, List, Map, String as Str};

const ROLE: &[PropertyRule] = &[
  req("AssumeRolePolicyDocument", Map),
  opt("ManagedPolicyArns", List),
  opt("Policies", List),
  opt("RoleName", Str),
  opt("Path", Str),
];

const FUNCTION: &[PropertyRule] = &[
  req("Code", Map),
  req("Role", Str),
  opt("Handler", Str),
  opt("Runtime", Str),
  opt("FunctionName", Str),
  opt("Environment", Map),
];

const PERMISSION: &[PropertyRule] = &[
  req("Action", Str),
  req("FunctionName", Str),
  req("Principal", Str),
  opt("SourceArn", Str),
];

const REST_API: &[PropertyRule] = &[opt("Name", Str), opt("Description", Str)];

const API_RESOURCE: &[PropertyRule] = &[
  req("RestApiId", Str),
  req("ParentId", Str),
  req("PathPart", Str),
];

const METHOD: &[PropertyRule] = &[
  req("HttpMethod", Str),
  req("ResourceId", Str),
  req("RestApiId", Str),
  opt("AuthorizationType", Str),
  opt("ApiKeyRequired", Bool),
  opt("Integration", Map),
];

const DEPLOYMENT: &[PropertyRule] = &[
  req("RestApiId", Str),
  opt("Description", Str),
  opt("StageName", Str),
];

const STAGE: &[PropertyRule] = &[
  req("RestApiId", Str),
  opt("DeploymentId", Str),
  opt("StageName", Str),
];

/// Rules for a resource kind, if it is known.
pub fn rules_for(type_tag: &str) -> Option<&'static [PropertyRule]> {
  match type_tag {
    rt::IAM_ROLE => Some(ROLE),
    rt::LAMBDA_FUNCTION => Some(FUNCTION),
    rt::LAMBDA_PERMISSION => Some(PERMISSION),
    rt::API_REST_API => Some(REST_API),
    rt::API_RESOURCE => Some(API_RESOURCE),
    rt::API_METHOD => Some(METHOD),
    rt::API_DEPLOYMENT => Some(DEPLOYMENT),
    rt::API_STAGE => Some(STAGE),
    _ => None,
  }
}

/// All rule violations of one resource.
pub fn validate_resource(node: &ResourceNode) -> Vec<SynthError> {
  let Some(rules) = rules_for(node.type_tag()) else {
    return Vec::new();
  };
  let invalid = |property: &str, reason: String| SynthError::InvalidProperty {
    id: node.logical_id().clone(),
    property: property.to_string(),
    reason,
  };
  let mut errors = Vec::new();
  for rule in rules {
    match node.properties().get(rule.name) {
      None if rule.required => {
        errors.push(invalid(rule.name, "required property is missing".to_string()))
      }
      None => {}
      Some(value) if !rule.kind.accepts(value) => errors.push(invalid(
        rule.name,
        format!("expected {}", rule.kind.describe()),
      )),
      Some(_) => {}
    }
  }
  errors
}

/// Validates every resource of the stack, reporting all violations at once.
#[instrument(level = "trace", skip(stack), fields(stack = %stack.name()))]
pub fn validate_stack(stack: &Stack) -> Result<()> {
  let errors = stack
    .resources()
    .iter()
    .flat_map(validate_resource)
    .collect();
  SynthError::aggregate(errors)
}
