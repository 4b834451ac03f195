//! Structural invariant checks

use std::collections::HashSet;

use serde::Serialize;

use super::Tree;
use crate::id::NodeId;

/// A structural problem found in a tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeProblem {
    /// Spine references an id with no node
    MissingSpineNode { id: NodeId },
    /// Same id appears more than once on the spine
    DuplicateSpineEntry { id: NodeId },
    /// A link points at a node that does not exist
    DanglingLink { from: NodeId, target: NodeId },
    /// Spine node with depth != 0, or branch node with depth 0
    DepthMismatch { id: NodeId, depth: u32 },
}

impl std::fmt::Display for TreeProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeProblem::MissingSpineNode { id } => {
                write!(f, "spine references unknown node {}", id)
            }
            TreeProblem::DuplicateSpineEntry { id } => {
                write!(f, "node {} appears on the spine more than once", id)
            }
            TreeProblem::DanglingLink { from, target } => {
                write!(f, "node {} links to unknown node {}", from, target)
            }
            TreeProblem::DepthMismatch { id, depth } => {
                write!(f, "node {} has inconsistent depth {}", id, depth)
            }
        }
    }
}

impl Tree {
    /// Check structural invariants. An empty list means the tree is healthy.
    pub fn validate(&self) -> Vec<TreeProblem> {
        let mut problems = Vec::new();
        let mut seen: HashSet<&NodeId> = HashSet::new();

        for id in &self.spine {
            if !seen.insert(id) {
                problems.push(TreeProblem::DuplicateSpineEntry { id: id.clone() });
                continue;
            }
            match self.nodes.get(id) {
                None => problems.push(TreeProblem::MissingSpineNode { id: id.clone() }),
                Some(node) if node.depth != 0 => problems.push(TreeProblem::DepthMismatch {
                    id: id.clone(),
                    depth: node.depth,
                }),
                Some(_) => {}
            }
        }

        for node in self.nodes.values() {
            if node.depth == 0 && !seen.contains(&node.id) {
                problems.push(TreeProblem::DepthMismatch {
                    id: node.id.clone(),
                    depth: 0,
                });
            }
            for link in &node.links {
                if !self.nodes.contains_key(&link.target_id) {
                    problems.push(TreeProblem::DanglingLink {
                        from: node.id.clone(),
                        target: link.target_id.clone(),
                    });
                }
            }
        }

        problems
    }
}
