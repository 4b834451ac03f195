//! Bounded-size briefing renderer
//!
//! Layout:
//! - fixed header
//! - `## Latest`: the spine head's full content (always emitted)
//! - `## Topics`: the head's direct links, one line each
//! - `## Earlier`: remaining spine nodes in spine order, tagged with their level
//!
//! Everything after the head is subject to the character budget. The first
//! entry that would overflow is replaced by a single truncation marker and
//! rendering stops. Sizes are measured in bytes, which never undercounts
//! characters.

use crate::config::types::default_header;
use crate::text::{single_line, truncate_chars};
use crate::tree::{Node, Tree};

/// Longest rendered content per earlier-spine entry, in characters
const MAX_ENTRY_CHARS: usize = 600;

/// Longest topic preview, in characters
const MAX_TOPIC_CHARS: usize = 120;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub header: String,
    /// Budget for the whole document
    pub max_chars: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from_tokens(2000, 4)
    }
}

impl RenderOptions {
    /// Derive a character budget from a token estimate
    pub fn from_tokens(tokens: usize, chars_per_token: usize) -> Self {
        Self {
            header: default_header(),
            max_chars: tokens.saturating_mul(chars_per_token),
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }
}

/// A rendered briefing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Briefing {
    pub text: String,
    /// Entries left out because of the budget
    pub omitted: usize,
}

impl Briefing {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_truncated(&self) -> bool {
        self.omitted > 0
    }
}

/// Render the truncation marker for `remaining` omitted entries
pub fn truncation_marker(remaining: usize) -> String {
    format!("\n… (truncated: {} more entries)\n", remaining)
}

fn topic_line(label: &str, target: &Node) -> String {
    let label = if label.trim().is_empty() {
        "related"
    } else {
        label.trim()
    };
    format!(
        "- {} ({}): {}\n",
        label,
        target.id,
        truncate_chars(&single_line(target.first_line()), MAX_TOPIC_CHARS)
    )
}

fn spine_line(node: &Node) -> String {
    format!(
        "- [{}] {} {}\n",
        node.compression_level,
        node.created_at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        truncate_chars(&single_line(&node.content), MAX_ENTRY_CHARS)
    )
}

/// Budgeted entries after the head, with section headings folded into the
/// first entry of each section
fn budgeted_entries(tree: &Tree, head: &Node) -> Vec<String> {
    let mut entries = Vec::new();

    let topics: Vec<String> = head
        .links
        .iter()
        .filter_map(|l| tree.get(&l.target_id).map(|t| topic_line(&l.label, t)))
        .collect();
    for (i, line) in topics.into_iter().enumerate() {
        if i == 0 {
            entries.push(format!("\n## Topics\n\n{}", line));
        } else {
            entries.push(line);
        }
    }

    for (i, node) in tree.spine_nodes().skip(1).enumerate() {
        let line = spine_line(node);
        if i == 0 {
            entries.push(format!("\n## Earlier\n\n{}", line));
        } else {
            entries.push(line);
        }
    }

    entries
}

/// Flatten the tree into a deterministic, budget-bounded briefing
pub fn render(tree: &Tree, options: &RenderOptions) -> Briefing {
    let mut text = String::new();
    text.push_str(options.header.trim_end());
    text.push('\n');

    let Some(head) = tree.head() else {
        return Briefing { text, omitted: 0 };
    };

    text.push_str("\n## Latest\n\n");
    text.push_str(head.content.trim_end());
    text.push('\n');

    let entries = budgeted_entries(tree, head);
    let total = entries.len();
    let mut omitted = 0;

    for (i, entry) in entries.into_iter().enumerate() {
        if text.len() + entry.len() > options.max_chars {
            omitted = total - i;
            text.push_str(&truncation_marker(omitted));
            break;
        }
        text.push_str(&entry);
    }

    tracing::debug!(
        chars = text.len(),
        budget = options.max_chars,
        omitted,
        "render_briefing"
    );
    Briefing { text, omitted }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::CompressionLevel;
    use chrono::{Duration, TimeZone, Utc};

    fn sample_tree() -> Tree {
        let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let mut tree = Tree::new();
        let old = tree.append_spine_node_at("Discussed the release plan.", t0);
        tree.compress(&old, "release plan", CompressionLevel::Oneliner)
            .unwrap();
        tree.append_spine_node_at("Fixed the flaky login test.", t0 + Duration::hours(1));
        let head = tree.append_spine_node_at(
            "Now migrating the billing service.\nSecond line of detail.",
            t0 + Duration::hours(2),
        );
        tree.add_branch_at(&head, "Billing schema v2 notes", "schema", t0)
            .unwrap();
        tree
    }

    #[test]
    fn test_empty_tree_renders_header_only() {
        let briefing = render(&Tree::new(), &RenderOptions::default());
        assert_eq!(briefing.text, "# Memory briefing\n");
        assert!(!briefing.is_truncated());
    }

    #[test]
    fn test_layout() {
        let tree = sample_tree();
        let briefing = render(&tree, &RenderOptions::default());
        let text = briefing.as_str();

        assert!(text.starts_with("# Memory briefing\n\n## Latest\n\nNow migrating the billing service.\nSecond line of detail.\n"));
        assert!(text.contains("\n## Topics\n\n- schema (cn-"));
        assert!(text.contains("): Billing schema v2 notes\n"));
        let fixed = text.find("[full] 2026-03-01T13:00:00Z Fixed the flaky login test.").unwrap();
        let plan = text.find("[oneliner] 2026-03-01T12:00:00Z release plan").unwrap();
        assert!(fixed < plan);
        assert!(!text.contains("truncated"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let tree = sample_tree();
        let options = RenderOptions::default().with_max_chars(150);
        assert_eq!(render(&tree, &options), render(&tree, &options));
    }

    #[test]
    fn test_budget_truncates_with_single_marker() {
        let mut tree = Tree::new();
        for i in 0..50 {
            tree.append_spine_node(format!("entry number {} with some padding text", i));
        }
        let options = RenderOptions::default().with_max_chars(400);
        let briefing = render(&tree, &options);

        assert!(briefing.is_truncated());
        assert_eq!(briefing.text.matches("(truncated:").count(), 1);
        assert!(briefing.text.ends_with("more entries)\n"));
        assert!(briefing.text.len() <= 400 + truncation_marker(briefing.omitted).len());
    }

    #[test]
    fn test_head_is_kept_even_over_budget() {
        let mut tree = Tree::new();
        tree.append_spine_node("older");
        tree.append_spine_node("x".repeat(500));
        let briefing = render(&tree, &RenderOptions::default().with_max_chars(10));
        assert!(briefing.text.contains(&"x".repeat(500)));
        assert_eq!(briefing.omitted, 1);
    }

    #[test]
    fn test_dangling_topic_links_are_skipped() {
        let mut tree = Tree::new();
        let head = tree.append_spine_node("head");
        let branch = tree.add_branch(&head, "gone", "lost").unwrap();
        tree.remove(&branch);
        let briefing = render(&tree, &RenderOptions::default());
        assert!(!briefing.text.contains("## Topics"));
    }

    #[test]
    fn test_custom_header() {
        let options = RenderOptions::from_tokens(100, 4).with_header("# Boot notes\n\n");
        assert_eq!(render(&Tree::new(), &options).text, "# Boot notes\n");
        assert_eq!(options.max_chars, 400);
    }
}
