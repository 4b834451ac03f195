//! Link-graph reachability and orphan eviction
//!
//! Reachability is structural: a node is reachable when it sits on the spine
//! or when any node's links name it. No traversal happens, so link cycles
//! need no special handling.

mod prune;

pub use prune::{prune, PruneReport};

use std::collections::{BTreeSet, VecDeque};

use crate::id::NodeId;
use crate::tree::Tree;

/// Spine ids plus every link target in the tree
pub fn reachable_set(tree: &Tree) -> BTreeSet<NodeId> {
    let mut reachable: BTreeSet<NodeId> = tree.spine().iter().cloned().collect();
    for node in tree.nodes() {
        reachable.extend(node.links.iter().map(|l| l.target_id.clone()));
    }
    reachable
}

/// Ids of nodes outside the reachable set, in id order
pub fn orphans(tree: &Tree) -> Vec<NodeId> {
    let reachable = reachable_set(tree);
    tree.nodes()
        .filter(|n| !reachable.contains(&n.id))
        .map(|n| n.id.clone())
        .collect()
}

/// Branch nodes that hang off `root` and nothing else, breadth-first.
///
/// Starts from `root`'s links and follows branch links downward. A node that
/// some other node outside the result still links to is left out, along with
/// everything below it, since it stays reachable once `root` lets go.
pub fn exclusive_subtree(tree: &Tree, root: &NodeId) -> Vec<NodeId> {
    let Some(start) = tree.get(root) else {
        return Vec::new();
    };

    let mut order = Vec::new();
    let mut seen = BTreeSet::new();
    let mut queue: VecDeque<NodeId> = start.links.iter().map(|l| l.target_id.clone()).collect();
    while let Some(id) = queue.pop_front() {
        if &id == root || !seen.insert(id.clone()) {
            continue;
        }
        let Some(node) = tree.get(&id).filter(|n| n.is_branch()) else {
            continue;
        };
        queue.extend(node.links.iter().map(|l| l.target_id.clone()));
        order.push(id);
    }

    let candidates: BTreeSet<NodeId> = order.iter().cloned().collect();
    let mut pending: Vec<NodeId> = tree
        .nodes()
        .filter(|n| &n.id != root && !candidates.contains(&n.id))
        .flat_map(|n| n.links.iter())
        .filter(|l| candidates.contains(&l.target_id))
        .map(|l| l.target_id.clone())
        .collect();

    let mut shared = BTreeSet::new();
    while let Some(id) = pending.pop() {
        if !shared.insert(id.clone()) {
            continue;
        }
        if let Some(node) = tree.get(&id) {
            pending.extend(
                node.links
                    .iter()
                    .filter(|l| candidates.contains(&l.target_id))
                    .map(|l| l.target_id.clone()),
            );
        }
    }

    order.retain(|id| !shared.contains(id));
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Link;

    #[test]
    fn test_reachable_includes_spine_and_link_targets() {
        let mut tree = Tree::new();
        let root = tree.append_spine_node("root");
        let branch = tree.add_branch(&root, "branch", "b").unwrap();
        let leaf = tree.add_branch(&branch, "leaf", "l").unwrap();

        let reachable = reachable_set(&tree);
        assert!(reachable.contains(&root));
        assert!(reachable.contains(&branch));
        assert!(reachable.contains(&leaf));
        assert!(orphans(&tree).is_empty());
    }

    #[test]
    fn test_unlinked_branch_is_orphan() {
        let mut tree = Tree::new();
        let root = tree.append_spine_node("root");
        let branch = tree.add_branch(&root, "branch", "b").unwrap();
        tree.unlink(&root, &branch).unwrap();

        assert_eq!(orphans(&tree), vec![branch]);
    }

    #[test]
    fn test_exclusive_subtree_follows_grandchildren() {
        let mut tree = Tree::new();
        let root = tree.append_spine_node("root");
        let branch = tree.add_branch(&root, "branch", "b").unwrap();
        let leaf = tree.add_branch(&branch, "leaf", "l").unwrap();

        assert_eq!(exclusive_subtree(&tree, &root), vec![branch, leaf]);
    }

    #[test]
    fn test_exclusive_subtree_skips_shared_nodes() {
        let mut tree = Tree::new();
        let root = tree.append_spine_node("root");
        let other = tree.append_spine_node("other");
        let mine = tree.add_branch(&root, "mine", "m").unwrap();
        let shared = tree.add_branch(&mine, "shared", "s").unwrap();
        let below_shared = tree.add_branch(&shared, "below", "b").unwrap();
        let foreign = tree.add_branch(&other, "foreign", "f").unwrap();
        tree.node_mut(&other)
            .unwrap()
            .links
            .push(Link::new(shared.clone(), "s"));
        tree.node_mut(&root).unwrap().links.push(Link::new(foreign, "f"));

        let subtree = exclusive_subtree(&tree, &root);
        assert_eq!(subtree, vec![mine]);
        assert!(!subtree.contains(&below_shared));
    }

    #[test]
    fn test_cycles_do_not_loop() {
        let json = serde_json::json!({
            "nodes": {
                "cn-a": {"id": "cn-a", "created_at": "2026-01-01T00:00:00Z",
                         "updated_at": "2026-01-01T00:00:00Z", "depth": 1, "content": "a",
                         "links": [{"target_id": "cn-b", "label": "x"}],
                         "compression_level": "full"},
                "cn-b": {"id": "cn-b", "created_at": "2026-01-01T00:00:00Z",
                         "updated_at": "2026-01-01T00:00:00Z", "depth": 2, "content": "b",
                         "links": [{"target_id": "cn-a", "label": "y"}],
                         "compression_level": "full"}
            },
            "spine": [],
            "version": 1
        });
        let tree: Tree = serde_json::from_value(json).unwrap();
        // each names the other, so both count as reachable
        assert!(orphans(&tree).is_empty());
        assert_eq!(
            tree.get(&NodeId::new("cn-a").unwrap()).unwrap().links,
            vec![Link::new(NodeId::new("cn-b").unwrap(), "x")]
        );
    }
}
