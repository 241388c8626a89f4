//! queue-congestion -- decide which HTCondor queues are full.
//!
//! This crate turns an already-exported snapshot of job ads into a per-queue
//! full / not-full verdict for an autoscaling or pilot-submission loop, plus
//! the per-queue state summary, job listing and slot listing used when
//! diagnosing one.

pub mod classify;
pub mod config;
pub mod diagnostics;
pub mod jobs;
pub mod queues;
pub mod report;
pub mod slots;
pub mod snapshot;

use tracing::{info, warn};

use crate::classify::{Classification, Pipeline};
use crate::snapshot::{Snapshot, SnapshotError, SnapshotSource};

/// Fetch a snapshot and classify it.
///
/// A source that cannot produce a snapshot yields an empty classification
/// (nothing is reported full) with the failure recorded in the diagnostics.
pub fn assess(source: &dyn SnapshotSource, pipeline: &Pipeline) -> Classification {
    info!(origin = %source.describe(), "fetching snapshot");
    match source.fetch() {
        Ok(snapshot) => pipeline.run(&snapshot),
        Err(e) => {
            let message = error_chain(e);
            warn!(origin = %source.describe(), error = %message, "snapshot unavailable, reporting no congestion");
            let mut classification = pipeline.run(&Snapshot::default());
            classification.diagnostics.snapshot_error = Some(message);
            classification
        }
    }
}

/// Fetch a snapshot, treating failure as an empty one.
pub fn fetch_or_empty(source: &dyn SnapshotSource) -> Snapshot {
    source.fetch().unwrap_or_else(|e| {
        warn!(origin = %source.describe(), error = %error_chain(e), "snapshot unavailable");
        Snapshot::default()
    })
}

fn error_chain(e: SnapshotError) -> String {
    format!("{:#}", anyhow::Error::new(e))
}
