//! The memory tree: a spine of ingested nodes (newest first) with branches
//! hanging off it through labelled links.
//!
//! The tree is an explicit handle. Whoever owns it (usually
//! [`crate::curation::Curator`]) is responsible for persisting it.

mod node;
mod validation;

pub use node::{CompressionLevel, Link, Node};
pub use validation::TreeProblem;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CairnError, Result};
use crate::id::{IdScheme, NodeId};

/// Current snapshot format version
pub const TREE_FORMAT_VERSION: u32 = 1;

fn default_version() -> u32 {
    TREE_FORMAT_VERSION
}

/// Map of nodes plus the newest-first spine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    #[serde(default)]
    nodes: BTreeMap<NodeId, Node>,
    #[serde(default)]
    spine: Vec<NodeId>,
    #[serde(default = "default_version")]
    version: u32,
    #[serde(skip)]
    id_scheme: IdScheme,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Empty graph, empty spine
    pub fn new() -> Self {
        Self::with_id_scheme(IdScheme::default())
    }

    pub fn with_id_scheme(id_scheme: IdScheme) -> Self {
        Self {
            nodes: BTreeMap::new(),
            spine: Vec::new(),
            version: TREE_FORMAT_VERSION,
            id_scheme,
        }
    }

    /// Change how new ids are minted (not persisted; comes from config)
    pub fn set_id_scheme(&mut self, id_scheme: IdScheme) {
        self.id_scheme = id_scheme;
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// All nodes, ordered by id
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Spine ids, newest first
    pub fn spine(&self) -> &[NodeId] {
        &self.spine
    }

    /// Spine nodes in spine order, skipping ids missing from the map
    pub fn spine_nodes(&self) -> impl Iterator<Item = &Node> {
        self.spine.iter().filter_map(|id| self.nodes.get(id))
    }

    /// The most recently ingested node
    pub fn head(&self) -> Option<&Node> {
        self.spine.first().and_then(|id| self.nodes.get(id))
    }

    /// Append ingested content as the new spine head
    pub fn append_spine_node(&mut self, content: impl Into<String>) -> NodeId {
        self.append_spine_node_at(content, Utc::now())
    }

    /// Same as [`Tree::append_spine_node`] with an explicit creation time
    pub fn append_spine_node_at(&mut self, content: impl Into<String>, at: DateTime<Utc>) -> NodeId {
        let content = content.into();
        let id = NodeId::generate(self.id_scheme, &content, &self.nodes);
        self.nodes
            .insert(id.clone(), Node::new(id.clone(), content, 0, at));
        self.spine.insert(0, id.clone());
        tracing::debug!(node_id = %id, spine_len = self.spine.len(), "append_spine_node");
        id
    }

    /// Attach a new branch node below `parent`
    pub fn add_branch(
        &mut self,
        parent: &NodeId,
        content: impl Into<String>,
        label: impl Into<String>,
    ) -> Result<NodeId> {
        self.add_branch_at(parent, content, label, Utc::now())
    }

    /// Same as [`Tree::add_branch`] with an explicit creation time
    pub fn add_branch_at(
        &mut self,
        parent: &NodeId,
        content: impl Into<String>,
        label: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Result<NodeId> {
        let depth = match self.nodes.get(parent) {
            Some(p) => p.depth + 1,
            None => return Err(CairnError::not_found(parent)),
        };

        let content = content.into();
        let id = NodeId::generate(self.id_scheme, &content, &self.nodes);
        self.nodes
            .insert(id.clone(), Node::new(id.clone(), content, depth, at));

        if let Some(p) = self.nodes.get_mut(parent) {
            p.links.push(Link::new(id.clone(), label));
            p.updated_at = at.max(p.updated_at);
        }

        tracing::debug!(node_id = %id, parent = %parent, depth, "add_branch");
        Ok(id)
    }

    /// Replace a node's content with a more compressed rendition.
    ///
    /// `target` must sit strictly above the current level; otherwise the
    /// node is left untouched and `InvalidTransition` is returned.
    pub fn compress(
        &mut self,
        id: &NodeId,
        content: impl Into<String>,
        target: CompressionLevel,
    ) -> Result<()> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| CairnError::not_found(id))?;

        let from = node.compression_level;
        if target.index() <= from.index() {
            return Err(CairnError::InvalidTransition {
                id: id.to_string(),
                from,
                to: target,
            });
        }

        node.content = content.into();
        node.compression_level = target;
        node.updated_at = Utc::now().max(node.updated_at);
        tracing::debug!(node_id = %id, %from, to = %target, "compress");
        Ok(())
    }

    /// Compress a node whose new content already folds in `absorbed` children,
    /// then drop its links to them. Content is written before any link is
    /// removed, so absorbed nodes are only orphaned once their detail lives
    /// on in the parent. Returns the number of links removed.
    pub fn compress_absorbing(
        &mut self,
        id: &NodeId,
        content: impl Into<String>,
        target: CompressionLevel,
        absorbed: &[NodeId],
    ) -> Result<usize> {
        self.compress(id, content, target)?;
        let mut removed = 0;
        for child in absorbed {
            removed += self.unlink(id, child)?;
        }
        Ok(removed)
    }

    /// Remove every link from `from` to `target`. Returns how many were removed.
    pub fn unlink(&mut self, from: &NodeId, target: &NodeId) -> Result<usize> {
        let node = self
            .nodes
            .get_mut(from)
            .ok_or_else(|| CairnError::not_found(from))?;

        let before = node.links.len();
        node.links.retain(|l| &l.target_id != target);
        let removed = before - node.links.len();
        if removed > 0 {
            node.updated_at = Utc::now().max(node.updated_at);
            tracing::debug!(from = %from, target = %target, removed, "unlink");
        }
        Ok(removed)
    }

    /// Drop a node from the map. Only the pruner evicts nodes.
    pub(crate) fn remove(&mut self, id: &NodeId) -> Option<Node> {
        self.nodes.remove(id)
    }

    #[cfg(test)]
    pub(crate) fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }
}
