//! Age-based selection of spine nodes due for their next compression step.
//!
//! Selection is a pure query over a settled tree: it never mutates, so it can
//! be re-run any number of times before the caller applies `compress()`.
//! Branch nodes are never selected; they keep their detail until absorbed.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::id::NodeId;
use crate::tree::{CompressionLevel, Tree};

/// Minimum age before a node at a given level steps down to the next one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeThresholds {
    /// full -> summary
    pub summary: Duration,
    /// summary -> oneliner
    pub oneliner: Duration,
    /// oneliner -> tag
    pub tag: Duration,
}

impl Default for AgeThresholds {
    fn default() -> Self {
        Self {
            summary: Duration::hours(1),
            oneliner: Duration::days(1),
            tag: Duration::weeks(1),
        }
    }
}

impl AgeThresholds {
    /// Threshold for leaving `level`, or `None` at the end of the ladder
    pub fn for_level(&self, level: CompressionLevel) -> Option<Duration> {
        match level {
            CompressionLevel::Full => Some(self.summary),
            CompressionLevel::Summary => Some(self.oneliner),
            CompressionLevel::Oneliner => Some(self.tag),
            CompressionLevel::Tag => None,
        }
    }
}

/// One pending step down the ladder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompactionTarget {
    pub id: NodeId,
    pub from: CompressionLevel,
    pub to: CompressionLevel,
    /// Node age in seconds at selection time
    pub age_secs: i64,
}

/// List spine nodes whose age exceeds the threshold for their current level.
///
/// Each node yields at most one target, always the single next rung.
/// Results follow spine order (newest first).
pub fn select_targets(
    tree: &Tree,
    thresholds: &AgeThresholds,
    now: DateTime<Utc>,
) -> Vec<CompactionTarget> {
    let mut targets = Vec::new();

    for node in tree.spine_nodes() {
        let from = node.compression_level;
        let (Some(to), Some(threshold)) = (from.next(), thresholds.for_level(from)) else {
            continue;
        };

        let age = node.age(now);
        if age > threshold {
            tracing::debug!(node_id = %node.id, %from, %to, age_secs = age.num_seconds(), "compaction_target");
            targets.push(CompactionTarget {
                id: node.id.clone(),
                from,
                to,
                age_secs: age.num_seconds(),
            });
        }
    }

    targets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets_for(tree: &Tree, now: DateTime<Utc>) -> Vec<(NodeId, CompressionLevel, CompressionLevel)> {
        select_targets(tree, &AgeThresholds::default(), now)
            .into_iter()
            .map(|t| (t.id, t.from, t.to))
            .collect()
    }

    #[test]
    fn test_young_node_is_not_selected() {
        let now = Utc::now();
        let mut tree = Tree::new();
        tree.append_spine_node_at("fresh", now - Duration::minutes(30));
        assert!(targets_for(&tree, now).is_empty());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let now = Utc::now();
        let mut tree = Tree::new();
        tree.append_spine_node_at("edge", now - Duration::hours(1));
        assert!(targets_for(&tree, now).is_empty());
    }

    #[test]
    fn test_selection_is_idempotent() {
        let now = Utc::now();
        let mut tree = Tree::new();
        let id = tree.append_spine_node_at("old", now - Duration::minutes(90));

        let first = targets_for(&tree, now);
        for _ in 0..5 {
            assert_eq!(targets_for(&tree, now), first);
        }
        assert_eq!(
            first,
            vec![(id, CompressionLevel::Full, CompressionLevel::Summary)]
        );
    }

    #[test]
    fn test_never_skips_levels() {
        let now = Utc::now();
        let mut tree = Tree::new();
        // old enough for every rung, still only one step
        let id = tree.append_spine_node_at("ancient", now - Duration::days(30));
        assert_eq!(
            targets_for(&tree, now),
            vec![(id, CompressionLevel::Full, CompressionLevel::Summary)]
        );
    }

    #[test]
    fn test_mixed_spine_scenario() {
        let now = Utc::now();
        let mut tree = Tree::new();
        let n1 = tree.append_spine_node_at("n1", now - Duration::days(10));
        let n2 = tree.append_spine_node_at("n2", now - Duration::days(2));
        let n3 = tree.append_spine_node_at("n3", now - Duration::hours(2));
        tree.compress(&n1, "n1-tag", CompressionLevel::Tag).unwrap();
        tree.compress(&n2, "n2-summary", CompressionLevel::Summary).unwrap();

        assert_eq!(
            targets_for(&tree, now),
            vec![
                (n3, CompressionLevel::Full, CompressionLevel::Summary),
                (n2, CompressionLevel::Summary, CompressionLevel::Oneliner),
            ]
        );
    }

    #[test]
    fn test_branches_are_not_aged() {
        let now = Utc::now();
        let mut tree = Tree::new();
        let root = tree.append_spine_node_at("root", now - Duration::minutes(5));
        tree.add_branch_at(&root, "branch", "b", now - Duration::days(30))
            .unwrap();
        assert!(targets_for(&tree, now).is_empty());
    }

    #[test]
    fn test_selection_does_not_mutate() {
        let now = Utc::now();
        let mut tree = Tree::new();
        tree.append_spine_node_at("old", now - Duration::days(3));
        let before = tree.clone();
        let _ = select_targets(&tree, &AgeThresholds::default(), now);
        assert_eq!(tree, before);
    }
}
