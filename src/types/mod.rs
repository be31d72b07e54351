//! Data model of the resource graph and of the synthesized template.

pub(crate) mod logical_id;
mod output;
mod pseudo;
mod resource;
mod stack_id;
mod template;
mod value;

pub use logical_id::{LogicalId, Scope};
pub use output::{OutputDecl, OutputOptions};
pub use pseudo::PseudoValue;
pub use resource::{ResourceHandle, ResourceNode};
pub use stack_id::StackId;
pub use template::{ExportEntry, OutputEntry, ResourceEntry, TemplateDocument};
pub use value::{Properties, Token, Value, props};
