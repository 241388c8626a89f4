//! End-to-end classification of one snapshot.
//!
//! normalize -> filter -> group -> reduce -> age -> classify. Queues are
//! classified independently on the rayon pool and merged afterwards.

use std::collections::{BTreeMap, BTreeSet};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::age::{record_age, AgeError};
use super::policy::Thresholds;
use super::TargetInfo;
use crate::diagnostics::{Diagnostics, Extremum, InvalidAge};
use crate::jobs::extremum::{newest, oldest};
use crate::jobs::filter::{filter, IS_IDLE, IS_RUNNING};
use crate::jobs::group::{group_by_queue, Groups};
use crate::jobs::normalize::{AttributeNames, Normalizer};
use crate::jobs::JobRecord;
use crate::snapshot::Snapshot;

/// Result of one run: per-queue verdicts plus what was skipped on the way.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Classification {
    pub targets: BTreeMap<String, TargetInfo>,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    normalizer: Normalizer,
    thresholds: Thresholds,
}

impl Pipeline {
    pub fn new(names: AttributeNames, thresholds: Thresholds) -> Self {
        Self {
            normalizer: Normalizer::new(names),
            thresholds,
        }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn run(&self, snapshot: &Snapshot) -> Classification {
        info!(
            records = snapshot.len(),
            required = ?self.normalizer.names().required(),
            "classifying snapshot"
        );
        let mut diagnostics = Diagnostics {
            rejected_entries: snapshot.rejected().to_vec(),
            ..Diagnostics::default()
        };
        let records = self.normalizer.normalize_all(snapshot.records(), &mut diagnostics);
        let (targets, invalid_ages) = self.classify_records(&records);
        diagnostics.invalid_ages = invalid_ages;

        let full = targets.values().filter(|t| t.is_full).count();
        info!(queues = targets.len(), full, "classification complete");
        Classification { targets, diagnostics }
    }

    /// Classify already-normalized records.
    pub fn classify_records(&self, records: &[JobRecord]) -> (BTreeMap<String, TargetInfo>, Vec<InvalidAge>) {
        let running = group_by_queue(filter(records, &IS_RUNNING));
        let idle = group_by_queue(filter(records, &IS_IDLE));

        let queues: Vec<&str> = running
            .keys()
            .chain(idle.keys())
            .map(String::as_str)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let per_queue: Vec<(String, TargetInfo, Vec<InvalidAge>)> = queues
            .par_iter()
            .map(|queue| {
                let (info, invalid) = self.classify_queue(queue, &running, &idle);
                (queue.to_string(), info, invalid)
            })
            .collect();

        let mut targets = BTreeMap::new();
        let mut invalid_ages = Vec::new();
        for (queue, info, invalid) in per_queue {
            targets.insert(queue, info);
            invalid_ages.extend(invalid);
        }
        (targets, invalid_ages)
    }

    fn classify_queue(&self, queue: &str, running: &Groups, idle: &Groups) -> (TargetInfo, Vec<InvalidAge>) {
        let mut invalid = Vec::new();

        let newest_running = running.get(queue).and_then(|g| newest(g));
        let oldest_idle = idle.get(queue).and_then(|g| oldest(g));

        let newest_running = checked_age(queue, newest_running, Extremum::NewestRunning, &mut invalid);
        let oldest_idle = checked_age(queue, oldest_idle, Extremum::OldestIdle, &mut invalid);

        let newest_running_age = newest_running.map(|(_, age)| age);
        let oldest_idle_age = oldest_idle.map(|(_, age)| age);
        let verdict = self.thresholds.classify(oldest_idle_age, newest_running_age);

        debug!(
            queue,
            ?oldest_idle_age,
            ?newest_running_age,
            is_full = verdict.is_full,
            reason = %verdict.reason,
            "classified queue"
        );

        let info = TargetInfo {
            is_full: verdict.is_full,
            how_full: self.thresholds.how_full(oldest_idle_age, newest_running_age),
            newest_running_age,
            oldest_idle_age,
            newest_running_job: newest_running.and_then(|(r, _)| r.job_id()),
            oldest_idle_job: oldest_idle.and_then(|(r, _)| r.job_id()),
            reason: verdict.reason,
        };
        (info, invalid)
    }
}

/// Age of the selected extremum; a skewed timestamp makes the extremum absent.
fn checked_age<'a>(
    queue: &str,
    selected: Option<&'a JobRecord>,
    extremum: Extremum,
    invalid: &mut Vec<InvalidAge>,
) -> Option<(&'a JobRecord, u64)> {
    let record = selected?;
    match record_age(record) {
        Ok(age) => Some((record, age)),
        Err(AgeError::InvalidAge { entered, as_of }) => {
            warn!(queue, %extremum, entered, as_of, "negative job age, ignoring extremum");
            invalid.push(InvalidAge {
                queue: queue.to_string(),
                extremum,
                entered_current_status: entered,
                as_of,
            });
            None
        }
    }
}
