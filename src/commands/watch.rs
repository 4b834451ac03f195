//! `cairn watch` - run curation passes on a timer
//!
//! Ctrl-C or SIGTERM stops the loop. A pass in flight stops starting new
//! summarizer work and still persists. One final pass then runs with all
//! summarizer work bounded by the grace period, and the process exits 0.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::cli::OutputFormat;
use crate::commands::dispatch::CommandContext;
use crate::commands::pass;
use cairn_core::curation::{Curator, PassReport};
use cairn_core::deadline::Deadline;
use cairn_core::error::{CairnError, Result};

const POLL_STEP: Duration = Duration::from_millis(100);

pub fn execute(ctx: &CommandContext, interval_secs: u64, grace_secs: u64) -> Result<()> {
    let stop = Arc::new(AtomicBool::new(false));
    let flag = stop.clone();
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
        .map_err(|e| CairnError::Other(format!("failed to install signal handler: {}", e)))?;

    let mut curator = ctx.open_curator()?;
    let interval = Duration::from_secs(interval_secs.max(1));
    tracing::info!(interval_secs = interval.as_secs(), grace_secs, "watch started");

    let in_flight = Deadline::none().or_cancelled(stop.clone());
    loop {
        match pass::run_once(&mut curator, &in_flight) {
            Ok(report) => emit(ctx, &report)?,
            Err(e) if e.is_transient() => {
                tracing::warn!(error = %e, "pass failed, will retry next interval")
            }
            Err(e) => return Err(e),
        }
        if sleep_unless_stopped(&stop, interval) {
            break;
        }
    }

    tracing::info!("shutdown requested, running final pass");
    if let Some(report) = final_pass(&mut curator, grace_secs)? {
        emit(ctx, &report)?;
    }
    Ok(())
}

/// Sleep for `total`, waking early on a stop request. Returns whether one arrived.
fn sleep_unless_stopped(stop: &AtomicBool, total: Duration) -> bool {
    let Some(deadline) = Instant::now().checked_add(total) else {
        while !stop.load(Ordering::SeqCst) {
            thread::sleep(POLL_STEP);
        }
        return true;
    };
    while Instant::now() < deadline {
        if stop.load(Ordering::SeqCst) {
            return true;
        }
        thread::sleep(POLL_STEP.min(deadline.saturating_duration_since(Instant::now())));
    }
    stop.load(Ordering::SeqCst)
}

/// The shutdown pass; targets left over when the grace period runs out
/// are deferred to the next start
fn final_pass(curator: &mut Curator, grace_secs: u64) -> Result<Option<PassReport>> {
    if grace_secs == 0 {
        return Ok(None);
    }
    let deadline = Deadline::after(Duration::from_secs(grace_secs));
    pass::run_once(curator, &deadline).map(Some)
}

/// One JSON line per pass, or the human pass summary
fn emit(ctx: &CommandContext, report: &PassReport) -> Result<()> {
    match ctx.cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(report)?);
            Ok(())
        }
        OutputFormat::Human => pass::output(ctx, report),
    }
}
