//! Reference resolver: expands tokens into intrinsic template expressions.
//!
//! - `Ref` → `{"Ref": id}`
//! - `GetAtt` → `{"Fn::GetAtt": [id, attribute]}`
//! - pseudo values → `{"Ref": "AWS::Region"}` etc., or a literal when overridden
//! - `Join` → `{"Fn::Join": [delimiter, parts]}`, folded to a literal when every part is literal

use serde_json::{Map, Value as JsonValue, json};
use tracing::{instrument, trace};

use crate::error::{Result, SynthError};
use crate::stack::Stack;
use crate::types::{LogicalId, PseudoValue, ResourceHandle, ResourceNode, Token, Value};

/// Concrete values substituted for pseudo values when the deployment target is known.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PseudoOverrides {
  pub account: Option<String>,
  pub region: Option<String>,
  pub stack_name: Option<String>,
  pub partition: Option<String>,
  pub url_suffix: Option<String>,
}

impl PseudoOverrides {
  pub fn get(&self, value: PseudoValue) -> Option<&str> {
    match value {
      PseudoValue::Region => self.region.as_deref(),
      PseudoValue::AccountId => self.account.as_deref(),
      PseudoValue::StackName => self.stack_name.as_deref(),
      PseudoValue::Partition => self.partition.as_deref(),
      PseudoValue::UrlSuffix => self.url_suffix.as_deref(),
    }
  }
}

/// Resolves values of one stack.
pub struct Resolver<'a> {
  stack: &'a Stack,
  overrides: &'a PseudoOverrides,
}

impl<'a> Resolver<'a> {
  pub fn new(stack: &'a Stack, overrides: &'a PseudoOverrides) -> Self {
    Self { stack, overrides }
  }

  /// Resolves every property of `node`, collecting errors across properties.
  #[instrument(level = "trace", skip(self, node), fields(id = %node.logical_id()))]
  pub fn resolve_properties(&self, node: &ResourceNode) -> Result<Map<String, JsonValue>> {
    let mut resolved = Map::new();
    let mut errors = Vec::new();
    for (name, value) in node.properties() {
      match self.resolve(value, node.logical_id(), name) {
        Ok(v) => {
          resolved.insert(name.clone(), v);
        }
        Err(e) => errors.push(e),
      }
    }
    SynthError::aggregate(errors)?;
    Ok(resolved)
  }

  /// Resolves `value`, found in property `property` of `owner`, recursively.
  pub fn resolve(&self, value: &Value, owner: &LogicalId, property: &str) -> Result<JsonValue> {
    match value {
      Value::Null => Ok(JsonValue::Null),
      Value::Bool(b) => Ok(JsonValue::Bool(*b)),
      Value::Number(n) => Ok(JsonValue::Number(n.clone())),
      Value::String(s) => Ok(JsonValue::String(s.clone())),
      Value::List(items) => items
        .iter()
        .map(|item| self.resolve(item, owner, property))
        .collect::<Result<Vec<_>>>()
        .map(JsonValue::Array),
      Value::Map(entries) => {
        let mut out = Map::new();
        for (k, v) in entries {
          out.insert(k.clone(), self.resolve(v, owner, property)?);
        }
        Ok(JsonValue::Object(out))
      }
      Value::Token(token) => self.resolve_token(token, owner, property),
    }
  }

  fn resolve_token(&self, token: &Token, owner: &LogicalId, property: &str) -> Result<JsonValue> {
    match token {
      Token::Ref(target) => {
        self.check_target(owner, target)?;
        Ok(json!({ "Ref": target.logical_id().as_str() }))
      }
      Token::GetAtt { target, attribute } => {
        self.check_target(owner, target)?;
        Ok(json!({ "Fn::GetAtt": [target.logical_id().as_str(), attribute] }))
      }
      Token::Pseudo(p) => Ok(match self.overrides.get(*p) {
        Some(literal) => JsonValue::String(literal.to_string()),
        None => json!({ "Ref": p.template_name() }),
      }),
      Token::Join { delimiter, parts } => self.resolve_join(delimiter, parts, owner, property),
    }
  }

  fn resolve_join(
    &self,
    delimiter: &str,
    parts: &[Value],
    owner: &LogicalId,
    property: &str,
  ) -> Result<JsonValue> {
    let mut folded: Vec<JsonValue> = Vec::new();
    for part in parts {
      if let Some(reason) = unjoinable(part) {
        return Err(SynthError::InvalidProperty {
          id: owner.clone(),
          property: property.to_string(),
          reason: reason.to_string(),
        });
      }
      let resolved = self.resolve(part, owner, property)?;
      if let Some(inner_parts) = nested_join_parts(&resolved, delimiter) {
        for inner in inner_parts {
          push_part(&mut folded, inner.clone(), delimiter);
        }
        continue;
      }
      push_part(&mut folded, stringify_scalar(resolved), delimiter);
    }
    trace!(parts = folded.len(), "folded join");

    match folded.len() {
      0 => Ok(JsonValue::String(String::new())),
      1 => Ok(folded.remove(0)),
      _ => Ok(json!({ "Fn::Join": [delimiter, folded] })),
    }
  }

  fn check_target(&self, owner: &LogicalId, target: &ResourceHandle) -> Result<()> {
    if self.stack.owns(target) {
      Ok(())
    } else {
      Err(SynthError::UnresolvedReference {
        referrer: owner.clone(),
        target: target.logical_id().clone(),
      })
    }
  }
}

/// Parts of a resolved `{"Fn::Join": [delimiter, [parts]]}` using the same delimiter.
fn nested_join_parts<'v>(value: &'v JsonValue, delimiter: &str) -> Option<&'v Vec<JsonValue>> {
  let obj = value.as_object()?;
  if obj.len() != 1 {
    return None;
  }
  match obj.get("Fn::Join")?.as_array()?.as_slice() {
    [JsonValue::String(d), JsonValue::Array(parts)] if d == delimiter => Some(parts),
    _ => None,
  }
}

/// Why `part` cannot appear in a join; only scalars and tokens can.
fn unjoinable(part: &Value) -> Option<&'static str> {
  match part {
    Value::Null => Some("null cannot be joined into a string"),
    Value::List(_) => Some("a list cannot be joined into a string"),
    Value::Map(_) => Some("a mapping cannot be joined into a string"),
    Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Token(_) => None,
  }
}

fn stringify_scalar(value: JsonValue) -> JsonValue {
  match value {
    JsonValue::Number(n) => JsonValue::String(n.to_string()),
    JsonValue::Bool(b) => JsonValue::String(b.to_string()),
    other => other,
  }
}

/// Appends `part`, merging it into the previous part when both are literal strings.
fn push_part(folded: &mut Vec<JsonValue>, part: JsonValue, delimiter: &str) {
  if let (Some(JsonValue::String(prev)), JsonValue::String(next)) = (folded.last_mut(), &part) {
    prev.push_str(delimiter);
    prev.push_str(next);
    return;
  }
  folded.push(part);
}
