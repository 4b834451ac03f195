use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::reachable_set;
use crate::id::NodeId;
use crate::tree::Tree;

/// Outcome of a prune sweep
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PruneReport {
    /// Evicted ids, sorted
    pub removed: Vec<NodeId>,
    /// Unreachable ids kept because they are younger than the threshold
    pub retained_orphans: Vec<NodeId>,
}

/// Evict every unreachable node older than `max_orphan_age`.
///
/// Spine nodes and link targets are never touched. A zero threshold evicts
/// every currently unreachable node. Nodes that only an evicted node linked
/// to become orphans on the next sweep.
pub fn prune(tree: &mut Tree, max_orphan_age: Duration, now: DateTime<Utc>) -> PruneReport {
    let reachable = reachable_set(tree);
    let mut report = PruneReport::default();

    let candidates: Vec<(NodeId, Duration)> = tree
        .nodes()
        .filter(|n| !reachable.contains(&n.id))
        .map(|n| (n.id.clone(), n.age(now)))
        .collect();

    for (id, age) in candidates {
        if age > max_orphan_age || max_orphan_age <= Duration::zero() {
            tree.remove(&id);
            tracing::debug!(node_id = %id, age_secs = age.num_seconds(), "prune_orphan");
            report.removed.push(id);
        } else {
            report.retained_orphans.push(id);
        }
    }

    if !report.removed.is_empty() {
        tracing::info!(removed = report.removed.len(), "pruned orphaned nodes");
    }
    report
}
