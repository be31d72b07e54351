//! Property values: literals, structured values and deferred tokens.

use indexmap::IndexMap;

use super::{PseudoValue, ResourceHandle};

/// Property name → value mapping of a resource, in assignment order.
pub type Properties = IndexMap<String, Value>;

/// A value that is only known at deploy time.
///
/// Tokens are embedded into properties during construction and expanded into
/// intrinsic expressions by the resolver; they never turn into placeholder strings.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
  /// Generated identifier of a resource.
  Ref(ResourceHandle),
  /// Named attribute of a resource (e.g. `Arn`).
  GetAtt {
    target: ResourceHandle,
    attribute: String,
  },
  /// Region, account, stack name and friends.
  Pseudo(PseudoValue),
  /// String concatenation of parts separated by `delimiter`.
  Join { delimiter: String, parts: Vec<Value> },
}

impl Token {
  fn collect_refs<'a>(&'a self, out: &mut Vec<&'a ResourceHandle>) {
    match self {
      Token::Ref(target) => out.push(target),
      Token::GetAtt { target, .. } => out.push(target),
      Token::Pseudo(_) => {}
      Token::Join { parts, .. } => {
        for part in parts {
          part.collect_refs(out);
        }
      }
    }
  }
}

/// A resource property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  Null,
  Bool(bool),
  Number(serde_json::Number),
  String(String),
  List(Vec<Value>),
  Map(IndexMap<String, Value>),
  Token(Token),
}

impl Value {
  /// Concatenation of `parts` with no separator.
  pub fn concat(parts: impl IntoIterator<Item = Value>) -> Self {
    Self::join("", parts)
  }

  pub fn join(delimiter: impl Into<String>, parts: impl IntoIterator<Item = Value>) -> Self {
    Value::Token(Token::Join {
      delimiter: delimiter.into(),
      parts: parts.into_iter().collect(),
    })
  }

  pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
    Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
  }

  pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
    Value::List(items.into_iter().collect())
  }

  pub fn is_token(&self) -> bool {
    matches!(self, Value::Token(_))
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      Value::String(s) => Some(s),
      _ => None,
    }
  }

  /// Every resource referenced anywhere inside this value, in traversal order.
  pub fn references(&self) -> Vec<&ResourceHandle> {
    let mut out = Vec::new();
    self.collect_refs(&mut out);
    out
  }

  fn collect_refs<'a>(&'a self, out: &mut Vec<&'a ResourceHandle>) {
    match self {
      Value::List(items) => {
        for item in items {
          item.collect_refs(out);
        }
      }
      Value::Map(entries) => {
        for value in entries.values() {
          value.collect_refs(out);
        }
      }
      Value::Token(token) => token.collect_refs(out),
      Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
  }
}

/// Builds a [Properties] mapping from `(name, value)` pairs.
pub fn props<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Properties {
  entries.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

impl From<&str> for Value {
  fn from(s: &str) -> Self {
    Value::String(s.to_string())
  }
}

impl From<String> for Value {
  fn from(s: String) -> Self {
    Value::String(s)
  }
}

impl From<bool> for Value {
  fn from(b: bool) -> Self {
    Value::Bool(b)
  }
}

impl From<i64> for Value {
  fn from(n: i64) -> Self {
    Value::Number(n.into())
  }
}

impl From<u32> for Value {
  fn from(n: u32) -> Self {
    Value::Number(n.into())
  }
}

impl From<Token> for Value {
  fn from(token: Token) -> Self {
    Value::Token(token)
  }
}

impl From<Vec<Value>> for Value {
  fn from(items: Vec<Value>) -> Self {
    Value::List(items)
  }
}

impl From<serde_json::Value> for Value {
  fn from(json: serde_json::Value) -> Self {
    match json {
      serde_json::Value::Null => Value::Null,
      serde_json::Value::Bool(b) => Value::Bool(b),
      serde_json::Value::Number(n) => Value::Number(n),
      serde_json::Value::String(s) => Value::String(s),
      serde_json::Value::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
      serde_json::Value::Object(entries) => Value::Map(
        entries
          .into_iter()
          .map(|(k, v)| (k, Value::from(v)))
          .collect(),
      ),
    }
  }
}
