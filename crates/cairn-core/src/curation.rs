//! One curation pass: ingest -> compact -> prune -> render -> persist.
//!
//! A [`Curator`] owns the tree handle and the ingestion cursor for one data
//! dir. Nothing is persisted mid-pass; an interrupted pass loses only the
//! work done since the last snapshot.

use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::compaction::{select_targets, CompactionTarget};
use crate::config::CairnConfig;
use crate::deadline::Deadline;
use crate::error::Result;
use crate::graph::{exclusive_subtree, prune, PruneReport};
use crate::id::NodeId;
use crate::ingest::{Cursor, IngestOutcome, IngestionTracker};
use crate::render::{render, Briefing};
use crate::store::Store;
use crate::summarize::Summarizer;
use crate::tree::{CompressionLevel, Tree};

/// A compaction target the summarizer could not serve this pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedTarget {
    pub id: NodeId,
    pub to: CompressionLevel,
    pub reason: String,
}

/// Outcome of the compaction step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompactionOutcome {
    pub compressed: Vec<CompactionTarget>,
    pub failed: Vec<FailedTarget>,
    /// Branch links dropped after their content was folded into a parent
    pub absorbed_links: usize,
    /// Targets left for the next pass because the deadline passed
    pub deferred: usize,
}

/// Summary of one full pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct PassReport {
    pub ingest: Option<IngestOutcome>,
    /// Set when reading the source failed; retried next pass
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingest_error: Option<String>,
    pub compaction: CompactionOutcome,
    pub prune: PruneReport,
    /// Size of the rendered briefing in bytes
    pub briefing_bytes: usize,
    pub briefing_truncated: bool,
    /// Set when the briefing could not be written; retried next pass
    #[serde(skip_serializing_if = "Option::is_none")]
    pub briefing_error: Option<String>,
}

/// Owner of one agent's memory tree
#[derive(Debug)]
pub struct Curator {
    config: CairnConfig,
    store: Store,
    tree: Tree,
    cursor: Cursor,
}

impl Curator {
    /// Load state from `data_dir`; a missing or unreadable snapshot starts fresh
    pub fn open(config: CairnConfig, data_dir: &Path) -> Result<Self> {
        let store = Store::new(data_dir, &config.paths);
        let mut tree = store.load_tree_or_default()?;
        tree.set_id_scheme(config.id_scheme);
        let cursor = store.load_cursor()?;
        tracing::debug!(
            nodes = tree.len(),
            spine = tree.spine().len(),
            offset = cursor.offset,
            "curator_open"
        );
        Ok(Self {
            config,
            store,
            tree,
            cursor,
        })
    }

    pub fn config(&self) -> &CairnConfig {
        &self.config
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn ingest(&mut self, tracker: &IngestionTracker, now: DateTime<Utc>) -> Result<IngestOutcome> {
        tracker.poll(&mut self.tree, &mut self.cursor, now)
    }

    /// Step every due spine node one rung down the ladder.
    ///
    /// Targets are selected up front from the settled tree. Summarizer
    /// failures leave their node untouched; it is selected again next pass.
    pub fn compact(
        &mut self,
        summarizer: &dyn Summarizer,
        now: DateTime<Utc>,
    ) -> Result<CompactionOutcome> {
        self.compact_within(summarizer, now, &Deadline::none())
    }

    /// [`Curator::compact`], starting no new target once `deadline` passes.
    /// Deferred targets are still due and come back next pass.
    pub fn compact_within(
        &mut self,
        summarizer: &dyn Summarizer,
        now: DateTime<Utc>,
        deadline: &Deadline,
    ) -> Result<CompactionOutcome> {
        let targets = select_targets(&self.tree, &self.config.age_thresholds(), now);
        let total = targets.len();
        let mut outcome = CompactionOutcome::default();

        for (i, target) in targets.into_iter().enumerate() {
            if deadline.is_expired() {
                outcome.deferred = total - i;
                tracing::info!(deferred = outcome.deferred, "deadline reached, deferring compaction");
                break;
            }
            let (input, absorbed) = self.summarizer_input(&target);

            match summarizer.summarize_within(&input, target.to, deadline) {
                Ok(text) => {
                    outcome.absorbed_links +=
                        self.tree
                            .compress_absorbing(&target.id, text, target.to, &absorbed)?;
                    outcome.compressed.push(target);
                }
                Err(e) if e.is_transient() => {
                    tracing::warn!(node_id = %target.id, to = %target.to, error = %e, "summarization failed, will retry next pass");
                    outcome.failed.push(FailedTarget {
                        id: target.id,
                        to: target.to,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(outcome)
    }

    /// Content to summarize, plus the direct links to drop afterwards.
    ///
    /// When absorbing, every node that hangs only off the target is folded
    /// in, so nothing the later sweeps evict is lost from the summary.
    fn summarizer_input(&self, target: &CompactionTarget) -> (String, Vec<NodeId>) {
        let Some(node) = self.tree.get(&target.id) else {
            return (String::new(), Vec::new());
        };
        if !(self.config.compaction.absorb_branches && target.to == CompressionLevel::Oneliner) {
            return (node.content.clone(), Vec::new());
        }

        let subtree = exclusive_subtree(&self.tree, &node.id);
        let mut input = node.content.clone();
        for branch in subtree.iter().filter_map(|id| self.tree.get(id)) {
            input.push_str("\n\n");
            input.push_str(&branch.content);
        }

        let mut direct: Vec<NodeId> = Vec::new();
        for link in &node.links {
            if subtree.contains(&link.target_id) && !direct.contains(&link.target_id) {
                direct.push(link.target_id.clone());
            }
        }
        (input, direct)
    }

    pub fn prune(&mut self, now: DateTime<Utc>) -> PruneReport {
        prune(&mut self.tree, self.config.max_orphan_age(), now)
    }

    pub fn render(&self) -> Briefing {
        render(&self.tree, &self.config.render_options())
    }

    /// Snapshot first, cursor second
    pub fn persist(&self) -> Result<()> {
        self.store.save_tree(&self.tree)?;
        self.store.save_cursor(&self.cursor)?;
        Ok(())
    }

    /// Run one full curation pass and persist the result
    pub fn run_pass(
        &mut self,
        tracker: Option<&IngestionTracker>,
        summarizer: &dyn Summarizer,
        now: DateTime<Utc>,
    ) -> Result<PassReport> {
        self.run_pass_within(tracker, summarizer, now, &Deadline::none())
    }

    /// [`Curator::run_pass`] with summarizer work bounded by `deadline`.
    /// Pruning, rendering and persisting always run.
    #[tracing::instrument(skip_all)]
    pub fn run_pass_within(
        &mut self,
        tracker: Option<&IngestionTracker>,
        summarizer: &dyn Summarizer,
        now: DateTime<Utc>,
        deadline: &Deadline,
    ) -> Result<PassReport> {
        let start = Instant::now();
        let mut report = PassReport::default();

        if let Some(tracker) = tracker {
            match self.ingest(tracker, now) {
                Ok(outcome) => report.ingest = Some(outcome),
                Err(e) if e.is_transient() => {
                    tracing::warn!(error = %e, "ingestion failed, will retry next pass");
                    report.ingest_error = Some(e.to_string());
                }
                Err(e) => return Err(e),
            }
        }
        crate::trace_time!(start, "pass_ingest");

        report.compaction = self.compact_within(summarizer, now, deadline)?;
        crate::trace_time!(start, "pass_compact");

        report.prune = self.prune(now);

        let briefing = self.render();
        report.briefing_bytes = briefing.text.len();
        report.briefing_truncated = briefing.is_truncated();
        if let Err(e) = self.store.write_briefing(&briefing.text) {
            tracing::warn!(error = %e, "briefing write failed, will retry next pass");
            report.briefing_error = Some(e.to_string());
        }

        self.persist()?;

        tracing::info!(
            ingested = report.ingest.as_ref().and_then(|i| i.node.as_ref()).is_some(),
            compressed = report.compaction.compressed.len(),
            failed = report.compaction.failed.len(),
            pruned = report.prune.removed.len(),
            elapsed = ?start.elapsed(),
            "curation pass complete"
        );
        Ok(report)
    }
}
