//! Deployment-context values not owned by any resource.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ambient value of the deployment target, known only once the stack is deployed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PseudoValue {
  Region,
  AccountId,
  StackName,
  Partition,
  UrlSuffix,
}

impl PseudoValue {
  /// Name of the pseudo parameter in the template (`{"Ref": <name>}`).
  pub fn template_name(&self) -> &'static str {
    match self {
      PseudoValue::Region => "AWS::Region",
      PseudoValue::AccountId => "AWS::AccountId",
      PseudoValue::StackName => "AWS::StackName",
      PseudoValue::Partition => "AWS::Partition",
      PseudoValue::UrlSuffix => "AWS::URLSuffix",
    }
  }
}

impl fmt::Display for PseudoValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.template_name())
  }
}
