//! Process-unique identity of a stack.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_STACK_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies the stack a handle or reference token was minted by.
///
/// Logical ids are only unique within one stack; two stacks may both own a
/// `Table`. Handles carry the owner's `StackId` so a foreign handle never
/// binds to a same-named local node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StackId(u64);

impl StackId {
  /// Allocates an id no other stack in this process has.
  pub(crate) fn next() -> Self {
    Self(NEXT_STACK_ID.fetch_add(1, Ordering::Relaxed))
  }
}
