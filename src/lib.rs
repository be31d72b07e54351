//! # stackweave
//!
//! Low-level infrastructure-as-code object model: declare typed resources in a
//! stack, wire them together with reference tokens, and synthesize the graph
//! into a deterministic, dependency-ordered template document.
//!
//! ## Architecture
//!
//! - [Stack]: owns resources and outputs, derives logical ids from construction paths
//! - [resolver]: expands reference and pseudo-value tokens into intrinsic expressions
//! - [dependency_graph]: implicit and explicit edges, topological order, cycle detection
//! - [synthesizer]: resolves, orders and assembles the [TemplateDocument]
//! - [assertions]: partial-match queries over a synthesized template
//!
//! [hello_service] declares a minimal function-behind-REST-endpoint stack with it.

pub mod assertions;
pub mod dependency_graph;
pub mod error;
pub mod hello_service;
pub mod resolver;
#[cfg(test)]
mod resolver_test;
pub mod resource_types;
pub mod schema;
pub mod stack;
pub mod synthesizer;
pub mod template_io;
pub mod types;

pub use assertions::Template;
pub use error::{Result, SynthError};
pub use hello_service::{CodeAsset, HelloService, HelloServiceProps, build_hello_service};
pub use resolver::PseudoOverrides;
pub use stack::Stack;
pub use synthesizer::{SynthOptions, synthesize};
pub use template_io::OutputDir;
pub use types::{
  LogicalId, OutputOptions, Properties, ResourceHandle, Scope, StackId, TemplateDocument, Token,
  Value, props,
};
