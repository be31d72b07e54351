//! The synthesized template document.
//!
//! Serializes to CloudFormation JSON: `Resources` keyed by logical id, each with
//! `Type`, `Properties`, `DependsOn` and `Metadata`, plus declared `Outputs`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// One resource entry of the template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceEntry {
  #[serde(rename = "Type")]
  pub type_tag: String,
  #[serde(rename = "Properties", default, skip_serializing_if = "Map::is_empty")]
  pub properties: Map<String, JsonValue>,
  #[serde(rename = "DependsOn", default, skip_serializing_if = "Vec::is_empty")]
  pub depends_on: Vec<String>,
  #[serde(rename = "Metadata", default, skip_serializing_if = "Map::is_empty")]
  pub metadata: Map<String, JsonValue>,
}

/// Export of an output value under a stack-independent name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportEntry {
  #[serde(rename = "Name")]
  pub name: JsonValue,
}

/// One output entry of the template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputEntry {
  #[serde(rename = "Value")]
  pub value: JsonValue,
  #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(rename = "Export", default, skip_serializing_if = "Option::is_none")]
  pub export: Option<ExportEntry>,
}

/// Deployable template produced by synthesis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateDocument {
  #[serde(rename = "Description", default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(rename = "Resources", default)]
  pub resources: IndexMap<String, ResourceEntry>,
  #[serde(rename = "Outputs", default, skip_serializing_if = "IndexMap::is_empty")]
  pub outputs: IndexMap<String, OutputEntry>,
}

impl TemplateDocument {
  pub fn resource(&self, logical_id: &str) -> Option<&ResourceEntry> {
    self.resources.get(logical_id)
  }

  pub fn output(&self, name: &str) -> Option<&OutputEntry> {
    self.outputs.get(name)
  }

  /// Logical ids in document order.
  pub fn resource_ids(&self) -> impl Iterator<Item = &str> {
    self.resources.keys().map(String::as_str)
  }

  /// Pretty-printed JSON; identical input yields byte-identical output.
  pub fn to_json_string(&self) -> serde_json::Result<String> {
    serde_json::to_string_pretty(self)
  }

  pub fn to_json_value(&self) -> serde_json::Result<JsonValue> {
    serde_json::to_value(self)
  }
}
