//! Assertions over a synthesized template.
//!
//! Matching is partial: an object pattern matches any object holding at least
//! its keys (recursively), array patterns match element-wise with equal length,
//! scalars match by equality.

use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::types::TemplateDocument;

/// Assertion failure with enough context to see what was compared.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssertionError {
  #[error(
    "no resource of type '{type_tag}' has properties matching {pattern} ({candidates} of that type)"
  )]
  NoMatchingResource {
    type_tag: String,
    pattern: String,
    candidates: usize,
  },

  #[error("expected {expected} resources of type '{type_tag}', found {actual}")]
  CountMismatch {
    type_tag: String,
    expected: usize,
    actual: usize,
  },

  #[error("output '{name}' is missing")]
  MissingOutput { name: String },

  #[error("output '{name}' does not match {pattern}: {actual}")]
  OutputMismatch {
    name: String,
    pattern: String,
    actual: String,
  },
}

/// Returns true if `actual` contains everything `pattern` asks for.
pub fn matches_pattern(actual: &JsonValue, pattern: &JsonValue) -> bool {
  match (actual, pattern) {
    (JsonValue::Object(a), JsonValue::Object(p)) => p
      .iter()
      .all(|(k, pv)| a.get(k).is_some_and(|av| matches_pattern(av, pv))),
    (JsonValue::Array(a), JsonValue::Array(p)) => {
      a.len() == p.len() && a.iter().zip(p).all(|(av, pv)| matches_pattern(av, pv))
    }
    _ => actual == pattern,
  }
}

/// Queryable view of a template document.
#[derive(Debug, Clone)]
pub struct Template {
  json: JsonValue,
}

impl Template {
  pub fn from_document(doc: &TemplateDocument) -> serde_json::Result<Self> {
    Ok(Self {
      json: doc.to_json_value()?,
    })
  }

  pub fn from_json(json: JsonValue) -> Self {
    Self { json }
  }

  pub fn json(&self) -> &JsonValue {
    &self.json
  }

  fn resources_of_type<'a, 't>(
    &'a self,
    type_tag: &'t str,
  ) -> impl Iterator<Item = (&'a str, &'a JsonValue)> + use<'a, 't> {
    self
      .json
      .get("Resources")
      .and_then(JsonValue::as_object)
      .into_iter()
      .flat_map(|resources| resources.iter())
      .filter(move |(_, entry)| entry.get("Type").and_then(JsonValue::as_str) == Some(type_tag))
      .map(|(id, entry)| (id.as_str(), entry))
  }

  /// Logical ids of all resources of `type_tag`, in document order.
  pub fn resource_logical_ids(&self, type_tag: &str) -> Vec<&str> {
    self.resources_of_type(type_tag).map(|(id, _)| id).collect()
  }

  /// Resources of `type_tag` whose properties match `pattern`.
  pub fn find_resources(&self, type_tag: &str, pattern: &JsonValue) -> Vec<(&str, &JsonValue)> {
    let empty = JsonValue::Object(serde_json::Map::new());
    self
      .resources_of_type(type_tag)
      .filter(|(_, entry)| matches_pattern(entry.get("Properties").unwrap_or(&empty), pattern))
      .collect()
  }

  pub fn has_resource_properties(
    &self,
    type_tag: &str,
    pattern: &JsonValue,
  ) -> Result<(), AssertionError> {
    if !self.find_resources(type_tag, pattern).is_empty() {
      return Ok(());
    }
    Err(AssertionError::NoMatchingResource {
      type_tag: type_tag.to_string(),
      pattern: pattern.to_string(),
      candidates: self.resources_of_type(type_tag).count(),
    })
  }

  pub fn resource_count_is(&self, type_tag: &str, expected: usize) -> Result<(), AssertionError> {
    let actual = self.resources_of_type(type_tag).count();
    if actual == expected {
      Ok(())
    } else {
      Err(AssertionError::CountMismatch {
        type_tag: type_tag.to_string(),
        expected,
        actual,
      })
    }
  }

  /// Checks that output `name` exists and its entry matches `pattern`.
  pub fn has_output(&self, name: &str, pattern: &JsonValue) -> Result<(), AssertionError> {
    let output = self
      .json
      .get("Outputs")
      .and_then(|outputs| outputs.get(name))
      .ok_or_else(|| AssertionError::MissingOutput {
        name: name.to_string(),
      })?;
    if matches_pattern(output, pattern) {
      Ok(())
    } else {
      Err(AssertionError::OutputMismatch {
        name: name.to_string(),
        pattern: pattern.to_string(),
        actual: output.to_string(),
      })
    }
  }
}
