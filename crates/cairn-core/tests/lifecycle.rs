//! Compaction, pruning and rendering working together over time

use cairn_core::compaction::{select_targets, AgeThresholds};
use cairn_core::graph::{orphans, prune};
use cairn_core::render::{render, RenderOptions};
use cairn_core::summarize::{ExtractiveSummarizer, Summarizer};
use cairn_core::tree::{CompressionLevel, Tree};
use chrono::{DateTime, Duration, TimeZone, Utc};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 10, 8, 0, 0).unwrap()
}

fn compact_once(tree: &mut Tree, now: DateTime<Utc>) -> usize {
    let targets = select_targets(tree, &AgeThresholds::default(), now);
    for target in &targets {
        let content = tree.get(&target.id).unwrap().content.clone();
        let text = ExtractiveSummarizer.summarize(&content, target.to).unwrap();
        tree.compress(&target.id, text, target.to).unwrap();
    }
    targets.len()
}

#[test]
fn test_old_nodes_walk_the_ladder_one_step_per_pass() {
    let mut tree = Tree::new();
    let old = tree.append_spine_node_at(
        "We agreed to freeze the API on Friday. Docs follow next week.",
        t0(),
    );
    let now = t0() + Duration::days(30);

    let mut levels = Vec::new();
    while compact_once(&mut tree, now) > 0 {
        levels.push(tree.get(&old).unwrap().compression_level);
    }
    assert_eq!(
        levels,
        vec![
            CompressionLevel::Summary,
            CompressionLevel::Oneliner,
            CompressionLevel::Tag
        ]
    );
}

#[test]
fn test_fresh_head_is_not_compacted() {
    let mut tree = Tree::new();
    let head = tree.append_spine_node_at("just now", t0());
    assert_eq!(compact_once(&mut tree, t0() + Duration::minutes(5)), 0);
    assert_eq!(
        tree.get(&head).unwrap().compression_level,
        CompressionLevel::Full
    );
}

#[test]
fn test_unlinked_topic_is_pruned_after_grace() {
    let mut tree = Tree::new();
    let head = tree.append_spine_node_at("session", t0());
    let topic = tree
        .add_branch_at(&head, "flaky test notes", "tests", t0())
        .unwrap();
    tree.unlink(&head, &topic).unwrap();
    assert_eq!(orphans(&tree), vec![topic.clone()]);

    let early = prune(&mut tree, Duration::days(7), t0() + Duration::days(1));
    assert!(early.removed.is_empty());
    assert!(tree.contains(&topic));

    let late = prune(&mut tree, Duration::days(7), t0() + Duration::days(8));
    assert_eq!(late.removed, vec![topic.clone()]);
    assert!(!tree.contains(&topic));
    assert!(tree.contains(&head));
}

#[test]
fn test_briefing_reflects_compacted_history() {
    let mut tree = Tree::new();
    tree.append_spine_node_at("Migrated billing to Postgres. It took hours.", t0());
    tree.append_spine_node_at("Working on the export job now.", t0() + Duration::days(3));
    compact_once(&mut tree, t0() + Duration::days(3));

    let briefing = render(&tree, &RenderOptions::default());
    let text = briefing.as_str();
    assert!(text.contains("## Latest\n\nWorking on the export job now."));
    assert!(text.contains("- [summary] 2026-01-10T08:00:00Z Migrated billing to Postgres."));
    assert!(!briefing.is_truncated());
}

#[test]
fn test_tight_budget_truncates_with_single_marker() {
    let mut tree = Tree::new();
    for i in 0..20 {
        tree.append_spine_node_at(format!("entry number {}", i), t0() + Duration::minutes(i));
    }
    let briefing = render(&tree, &RenderOptions::default().with_max_chars(200));
    assert!(briefing.is_truncated());
    assert_eq!(briefing.text.matches("truncated:").count(), 1);
    assert!(briefing.text.contains("entry number 19"));
}
