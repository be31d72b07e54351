//! Template synthesizer: stack → template document.
//!
//! Steps:
//! 1. check every reference (resources and outputs), errors aggregated
//! 2. order resources topologically, failing fast on a cycle
//! 3. optionally validate properties against [crate::schema]
//! 4. resolve properties and outputs, attach `DependsOn`, assemble the document

use serde_json::{Map, Value as JsonValue};
use tracing::{info, instrument};

use crate::dependency_graph::DependencyGraph;
use crate::error::{Result, SynthError};
use crate::resolver::{PseudoOverrides, Resolver};
use crate::schema;
use crate::stack::Stack;
use crate::types::{ExportEntry, OutputDecl, OutputEntry, ResourceEntry, TemplateDocument};

/// Metadata key holding a resource's construction path.
pub const PATH_METADATA_KEY: &str = "stackweave:path";

/// Options for [synthesize].
#[derive(Debug, Clone)]
pub struct SynthOptions {
  /// Literal values for pseudo values, when the deployment target is known.
  pub overrides: PseudoOverrides,
  /// Check properties of known resource kinds before resolving.
  pub validate_properties: bool,
  /// Record each resource's construction path under [PATH_METADATA_KEY].
  pub path_metadata: bool,
}

impl Default for SynthOptions {
  fn default() -> Self {
    Self {
      overrides: PseudoOverrides::default(),
      validate_properties: false,
      path_metadata: true,
    }
  }
}

/// Synthesizes `stack` into a template document.
///
/// Either returns a complete document or fails; reference and property errors
/// of independent resources are reported together, a cycle on its own.
/// Synthesizing an unmodified stack twice yields identical documents.
#[instrument(level = "trace", skip(stack, options), fields(stack = %stack.name()))]
pub fn synthesize(stack: &Stack, options: &SynthOptions) -> Result<TemplateDocument> {
  info!(
    resource_count = stack.len(),
    output_count = stack.outputs().len(),
    "synthesizing stack"
  );

  let graph = DependencyGraph::build(stack);
  let mut errors = match &graph {
    Ok(_) => Vec::new(),
    Err(e) => e.clone().into_errors(),
  };
  errors.extend(unresolved_output_references(stack));
  SynthError::aggregate(errors)?;
  let graph = graph?;

  let order = graph.topological_order()?;

  if options.validate_properties {
    schema::validate_stack(stack)?;
  }

  let resolver = Resolver::new(stack, &options.overrides);
  let mut doc = TemplateDocument {
    description: stack.description().map(String::from),
    ..TemplateDocument::default()
  };
  let mut errors = Vec::new();

  for id in &order {
    let Some(node) = stack.resource(id) else {
      continue;
    };
    let properties = match resolver.resolve_properties(node) {
      Ok(p) => p,
      Err(e) => {
        errors.push(e);
        continue;
      }
    };
    let mut metadata = Map::new();
    if options.path_metadata {
      metadata.insert(
        PATH_METADATA_KEY.to_string(),
        JsonValue::String(format!("{}/{}", stack.name(), node.path())),
      );
    }
    doc.resources.insert(
      id.to_string(),
      ResourceEntry {
        type_tag: node.type_tag().to_string(),
        properties,
        depends_on: graph
          .dependencies_of(id)
          .into_iter()
          .map(|d| d.to_string())
          .collect(),
        metadata,
      },
    );
  }

  for output in stack.outputs() {
    match resolve_output(&resolver, output) {
      Ok(entry) => {
        doc.outputs.insert(output.logical_id().to_string(), entry);
      }
      Err(e) => errors.push(e),
    }
  }

  SynthError::aggregate(errors)?;
  info!(
    resource_count = doc.resources.len(),
    output_count = doc.outputs.len(),
    "synthesis complete"
  );
  Ok(doc)
}

fn unresolved_output_references(stack: &Stack) -> Vec<SynthError> {
  stack
    .outputs()
    .iter()
    .flat_map(|output| {
      output
        .references()
        .into_iter()
        .filter(move |target| !stack.owns(target))
        .map(move |target| SynthError::UnresolvedReference {
          referrer: output.logical_id().clone(),
          target: target.logical_id().clone(),
        })
    })
    .collect()
}

fn resolve_output(resolver: &Resolver<'_>, output: &OutputDecl) -> Result<OutputEntry> {
  let value = resolver.resolve(output.value(), output.logical_id(), "Value")?;
  let export = match output.export_name() {
    Some(name) => Some(ExportEntry {
      name: resolver.resolve(name, output.logical_id(), "Export")?,
    }),
    None => None,
  };
  Ok(OutputEntry {
    value,
    description: output.description().map(String::from),
    export,
  })
}
