//! `cairn pass` - run one curation pass

use chrono::Utc;

use crate::cli::format::output_by_format;
use crate::commands::dispatch::CommandContext;
use crate::commands::helpers::print_json;
use cairn_core::curation::{Curator, PassReport};
use cairn_core::deadline::Deadline;
use cairn_core::error::Result;
use cairn_core::ingest::IngestionTracker;
use cairn_core::summarize;

/// Run a single pass against an open curator
pub fn run_once(curator: &mut Curator, deadline: &Deadline) -> Result<PassReport> {
    let tracker = IngestionTracker::from_config(&curator.config().ingest);
    let summarizer = summarize::from_config(&curator.config().summarizer)?;
    curator.run_pass_within(tracker.as_ref(), summarizer.as_ref(), Utc::now(), deadline)
}

pub fn execute(ctx: &CommandContext) -> Result<()> {
    let mut curator = ctx.open_curator()?;
    let report = run_once(&mut curator, &Deadline::none())?;
    output(ctx, &report)
}

pub fn output(ctx: &CommandContext, report: &PassReport) -> Result<()> {
    output_by_format!(ctx.cli.format,
        json => print_json(report),
        human => {
            if !ctx.cli.quiet {
                print_human(report);
            }
        }
    )
}

fn print_human(report: &PassReport) {
    match report.ingest.as_ref().and_then(|i| i.node.as_ref()) {
        Some(id) => println!("Ingested {}", id),
        None => println!("Nothing new to ingest"),
    }
    if let Some(e) = &report.ingest_error {
        println!("Ingestion failed: {}", e);
    }
    for target in &report.compaction.compressed {
        println!("Compressed {} {} -> {}", target.id, target.from, target.to);
    }
    for failed in &report.compaction.failed {
        println!("Could not compress {} to {}: {}", failed.id, failed.to, failed.reason);
    }
    if report.compaction.deferred > 0 {
        println!("Deferred {} target(s) to the next pass", report.compaction.deferred);
    }
    if !report.prune.removed.is_empty() {
        println!("Pruned {} orphan(s)", report.prune.removed.len());
    }
    println!(
        "Briefing: {} bytes{}",
        report.briefing_bytes,
        if report.briefing_truncated {
            " (truncated)"
        } else {
            ""
        }
    );
    if let Some(e) = &report.briefing_error {
        println!("Briefing write failed: {}", e);
    }
}
