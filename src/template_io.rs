//! Output directory of synthesized templates, one `<stack>.template.json` per stack.

use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::types::TemplateDocument;

/// Suffix of template files written under an output directory.
pub const TEMPLATE_SUFFIX: &str = ".template.json";

/// Directory a synthesis run writes its templates into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDir {
  root: PathBuf,
}

impl OutputDir {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Where the template of `stack_name` lives in this directory.
  pub fn template_path(&self, stack_name: &str) -> PathBuf {
    self.root.join(format!("{stack_name}{TEMPLATE_SUFFIX}"))
  }

  /// Writes the template of `stack_name` as pretty JSON and returns its path.
  ///
  /// Creates the directory on first use. A stack name that is empty or
  /// contains a path separator is rejected so every template stays directly
  /// under the root.
  #[instrument(level = "trace", skip(self, doc), fields(dir = %self.root.display()))]
  pub fn write(&self, stack_name: &str, doc: &TemplateDocument) -> io::Result<PathBuf> {
    check_stack_name(stack_name)?;
    let json = doc.to_json_string().map_err(invalid_data)?;
    std::fs::create_dir_all(&self.root)?;
    let path = self.template_path(stack_name);
    std::fs::write(&path, json)?;
    debug!(
      stack = stack_name,
      resource_count = doc.resources.len(),
      path = %path.display(),
      "template saved"
    );
    Ok(path)
  }

  /// Reads back the template of `stack_name`.
  pub fn read(&self, stack_name: &str) -> io::Result<TemplateDocument> {
    check_stack_name(stack_name)?;
    load_template(&self.template_path(stack_name))
  }

  /// Names of the stacks with a template in this directory, sorted.
  ///
  /// A directory that does not exist yet holds no stacks.
  pub fn stack_names(&self) -> io::Result<Vec<String>> {
    let entries = match std::fs::read_dir(&self.root) {
      Ok(entries) => entries,
      Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
      Err(e) => return Err(e),
    };
    let mut names = Vec::new();
    for entry in entries {
      let entry = entry?;
      if !entry.file_type()?.is_file() {
        continue;
      }
      let file_name = entry.file_name();
      if let Some(stack) = file_name
        .to_str()
        .and_then(|n| n.strip_suffix(TEMPLATE_SUFFIX))
        .filter(|n| !n.is_empty())
      {
        names.push(stack.to_string());
      }
    }
    names.sort();
    Ok(names)
  }
}

/// Loads a template document from any path.
#[instrument(level = "trace")]
pub fn load_template(path: &Path) -> io::Result<TemplateDocument> {
  let bytes = std::fs::read(path)?;
  serde_json::from_slice(&bytes).map_err(invalid_data)
}

fn check_stack_name(stack_name: &str) -> io::Result<()> {
  if stack_name.is_empty() || stack_name.contains(['/', '\\']) {
    return Err(io::Error::new(
      ErrorKind::InvalidInput,
      format!("stack name {stack_name:?} cannot name a template file"),
    ));
  }
  Ok(())
}

fn invalid_data(e: serde_json::Error) -> io::Error {
  io::Error::new(ErrorKind::InvalidData, e)
}
