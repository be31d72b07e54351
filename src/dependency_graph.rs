//! Dependency graph of a stack's resources and its topological order.
//!
//! An edge `A → B` means A depends on B (B is created first). Edges come from
//! every reference in A's properties plus A's explicit dependencies.

use std::collections::{BTreeSet, HashMap};

use indexmap::IndexSet;
use tracing::{instrument, trace};

use crate::error::{Result, SynthError};
use crate::stack::Stack;
use crate::types::LogicalId;

/// Directed dependency graph over logical ids, vertices in creation order.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
  ids: Vec<LogicalId>,
  index: HashMap<LogicalId, usize>,
  /// `dependencies[i]`: vertices vertex `i` depends on, deduplicated.
  dependencies: Vec<IndexSet<usize>>,
}

impl DependencyGraph {
  /// Builds the graph from the stack's resources in creation order.
  ///
  /// References to resources the stack does not own (absent ids, or handles
  /// minted by another stack) are reported together as
  /// [SynthError::UnresolvedReference] errors.
  #[instrument(level = "trace", skip(stack), fields(stack = %stack.name()))]
  pub fn build(stack: &Stack) -> Result<Self> {
    let resources = stack.resources();
    let ids: Vec<LogicalId> = resources.iter().map(|r| r.logical_id().clone()).collect();
    let mut edges = Vec::new();
    let mut errors = Vec::new();
    for resource in resources {
      for target in resource.references() {
        if stack.owns(target) {
          edges.push((resource.logical_id().clone(), target.logical_id().clone()));
        } else {
          errors.push(SynthError::UnresolvedReference {
            referrer: resource.logical_id().clone(),
            target: target.logical_id().clone(),
          });
        }
      }
      for target in resource.explicit_dependencies() {
        edges.push((resource.logical_id().clone(), target.clone()));
      }
    }
    let graph = Self::from_edges(ids, edges);
    if let Err(e) = &graph {
      errors.extend(e.clone().into_errors());
    }
    SynthError::aggregate(errors)?;
    graph
  }

  /// Builds the graph from vertices (in insertion order) and `(dependent, dependency)` edges.
  pub fn from_edges(
    ids: Vec<LogicalId>,
    edges: impl IntoIterator<Item = (LogicalId, LogicalId)>,
  ) -> Result<Self> {
    let index: HashMap<LogicalId, usize> = ids
      .iter()
      .enumerate()
      .map(|(i, id)| (id.clone(), i))
      .collect();
    let mut dependencies = vec![IndexSet::new(); ids.len()];
    let mut errors = Vec::new();
    for (from, to) in edges {
      let Some(&from_idx) = index.get(&from) else {
        errors.push(SynthError::UnknownResource(from));
        continue;
      };
      match index.get(&to) {
        Some(&to_idx) => {
          dependencies[from_idx].insert(to_idx);
        }
        None => errors.push(SynthError::UnresolvedReference {
          referrer: from,
          target: to,
        }),
      }
    }
    SynthError::aggregate(errors)?;
    Ok(Self {
      ids,
      index,
      dependencies,
    })
  }

  pub fn len(&self) -> usize {
    self.ids.len()
  }

  pub fn is_empty(&self) -> bool {
    self.ids.is_empty()
  }

  /// Ids `id` depends on (implicit and explicit, deduplicated), sorted by id.
  pub fn dependencies_of(&self, id: &LogicalId) -> Vec<&LogicalId> {
    let Some(&i) = self.index.get(id) else {
      return Vec::new();
    };
    let mut deps: Vec<&LogicalId> = self.dependencies[i].iter().map(|&d| &self.ids[d]).collect();
    deps.sort();
    deps
  }

  /// Returns true if `from` depends directly on `to`.
  pub fn has_edge(&self, from: &LogicalId, to: &LogicalId) -> bool {
    match (self.index.get(from), self.index.get(to)) {
      (Some(&f), Some(&t)) => self.dependencies[f].contains(&t),
      _ => false,
    }
  }

  /// Kahn's algorithm; among ready vertices the earliest inserted goes first.
  ///
  /// Fails with [SynthError::CyclicDependency] naming the members of one cycle.
  #[instrument(level = "trace", skip(self))]
  pub fn topological_order(&self) -> Result<Vec<LogicalId>> {
    let n = self.ids.len();
    let mut remaining: Vec<usize> = self.dependencies.iter().map(IndexSet::len).collect();
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, deps) in self.dependencies.iter().enumerate() {
      for &d in deps {
        dependents[d].push(i);
      }
    }

    let mut ready: BTreeSet<usize> = (0..n).filter(|&i| remaining[i] == 0).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(i) = ready.pop_first() {
      order.push(self.ids[i].clone());
      for &dependent in &dependents[i] {
        remaining[dependent] -= 1;
        if remaining[dependent] == 0 {
          ready.insert(dependent);
        }
      }
    }

    if order.len() != n {
      let cycle = self.find_cycle(&remaining);
      trace!(?cycle, "dependency cycle detected");
      return Err(SynthError::CyclicDependency { cycle });
    }
    Ok(order)
  }

  /// Walks unresolved dependencies from the first stuck vertex until one repeats.
  ///
  /// Every vertex left with `remaining > 0` has at least one dependency that is
  /// also stuck, so the walk always closes a cycle.
  fn find_cycle(&self, remaining: &[usize]) -> Vec<LogicalId> {
    let Some(start) = (0..self.ids.len()).find(|&i| remaining[i] > 0) else {
      return Vec::new();
    };
    let mut walk: Vec<usize> = Vec::new();
    let mut position: HashMap<usize, usize> = HashMap::new();
    let mut current = start;
    loop {
      if let Some(&at) = position.get(&current) {
        return walk[at..].iter().map(|&i| self.ids[i].clone()).collect();
      }
      position.insert(current, walk.len());
      walk.push(current);
      match self.dependencies[current]
        .iter()
        .copied()
        .find(|&d| remaining[d] > 0)
      {
        Some(next) => current = next,
        None => return walk.iter().map(|&i| self.ids[i].clone()).collect(),
      }
    }
  }
}
