//! Transitive composition through the merged tree
//!
//! Prototypes may reference each other cyclically, so expansion keeps a
//! visited set for the whole call and a depth budget. A prototype is expanded
//! at most once per call; later occurrences are marked, not walked again.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use super::analyze;
use crate::ast::ComponentTree;
use crate::core::LensResult;

/// Outcome for one position in the resolved outline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResolveStatus {
    /// Looked up and expanded
    Expanded,
    /// Already expanded earlier in this call
    Revisited,
    /// Depth budget exhausted
    DepthLimit,
    /// No prototype of that name in the tree
    Unresolved,
}

/// Resolved composition outline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedComposition {
    pub prototype_name: String,
    /// Role inside the parent; `None` for the root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub status: ResolveStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    pub composed_of: Vec<ResolvedComposition>,
}

impl ResolvedComposition {
    /// Number of positions in the outline, root included
    pub fn position_count(&self) -> usize {
        1 + self
            .composed_of
            .iter()
            .map(ResolvedComposition::position_count)
            .sum::<usize>()
    }
}

/// Expand `name` through the tree, at most `max_depth` levels below the root
pub fn resolve(tree: &ComponentTree, name: &str, max_depth: usize) -> LensResult<ResolvedComposition> {
    // the root must exist; everything below may be missing
    tree.prototype(name)?;
    let mut resolver = Resolver {
        tree,
        max_depth,
        visited: HashSet::new(),
    };
    let resolved = resolver.expand(name, None, 0);
    debug!("Resolved {} into {} positions", name, resolved.position_count());
    Ok(resolved)
}

struct Resolver<'a> {
    tree: &'a ComponentTree,
    max_depth: usize,
    visited: HashSet<String>,
}

impl<'a> Resolver<'a> {
    fn leaf(name: &str, role: Option<String>, status: ResolveStatus) -> ResolvedComposition {
        ResolvedComposition {
            prototype_name: name.to_string(),
            role,
            status,
            extends: None,
            composed_of: Vec::new(),
        }
    }

    fn expand(&mut self, name: &str, role: Option<String>, depth: usize) -> ResolvedComposition {
        let node = match self.tree.prototypes.get(name) {
            Some(node) => node,
            None => return Self::leaf(name, role, ResolveStatus::Unresolved),
        };
        if depth > self.max_depth {
            return Self::leaf(name, role, ResolveStatus::DepthLimit);
        }
        if !self.visited.insert(name.to_string()) {
            return Self::leaf(name, role, ResolveStatus::Revisited);
        }

        let summary = analyze(node);
        let composed_of = summary
            .entries
            .into_iter()
            .map(|entry| self.expand(&entry.referenced_prototype, Some(entry.role), depth + 1))
            .collect();

        ResolvedComposition {
            prototype_name: name.to_string(),
            role,
            status: ResolveStatus::Expanded,
            extends: summary.extends,
            composed_of,
        }
    }
}
