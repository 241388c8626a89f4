//! Per-queue job counts by state.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::jobs::normalize::{NormalizeError, Normalizer};
use crate::jobs::JobStatus;
use crate::snapshot::Snapshot;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StateCounts {
    pub unsub: u64,
    pub idle: u64,
    pub running: u64,
    pub removed: u64,
    pub completed: u64,
    pub held: u64,
    pub error: u64,
}

impl StateCounts {
    pub fn get(&self, status: JobStatus) -> u64 {
        match status {
            JobStatus::Unsubmitted => self.unsub,
            JobStatus::Idle => self.idle,
            JobStatus::Running => self.running,
            JobStatus::Removed => self.removed,
            JobStatus::Completed => self.completed,
            JobStatus::Held => self.held,
            JobStatus::Error => self.error,
        }
    }

    fn bump(&mut self, status: JobStatus) {
        let slot = match status {
            JobStatus::Unsubmitted => &mut self.unsub,
            JobStatus::Idle => &mut self.idle,
            JobStatus::Running => &mut self.running,
            JobStatus::Removed => &mut self.removed,
            JobStatus::Completed => &mut self.completed,
            JobStatus::Held => &mut self.held,
            JobStatus::Error => &mut self.error,
        };
        *slot += 1;
    }

    pub fn total(&self) -> u64 {
        JobStatus::ALL.iter().map(|s| self.get(*s)).sum()
    }
}

/// Count jobs per queue. Jobs without the queue attribute were not submitted
/// by the factory and are skipped quietly; other bad records are logged.
pub fn summarize(snapshot: &Snapshot, normalizer: &Normalizer) -> BTreeMap<String, StateCounts> {
    let key_attr = &normalizer.names().queue_key;
    let mut queues: BTreeMap<String, StateCounts> = BTreeMap::new();

    for (index, raw) in snapshot.records().iter().enumerate() {
        match normalizer.queue_and_status(raw) {
            Ok((queue, status)) => queues.entry(queue).or_default().bump(status),
            Err(NormalizeError::MissingField { ref field }) if field == key_attr => {
                debug!(index, "job has no queue attribute, ignoring");
            }
            Err(e) => warn!(index, error = %e, "skipping job in queue summary"),
        }
    }
    queues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::json::parse_document;

    #[test]
    fn test_summarize_counts_every_state() {
        let snapshot = parse_document(
            r#"[
                {"JobStatus": 1, "MATCH_APF_QUEUE": "q1"},
                {"JobStatus": 1, "MATCH_APF_QUEUE": "q1"},
                {"JobStatus": 2, "MATCH_APF_QUEUE": "q1"},
                {"JobStatus": 5, "MATCH_APF_QUEUE": "q2"},
                {"JobStatus": 4, "MATCH_APF_QUEUE": "q2"},
                {"JobStatus": 2}
            ]"#,
        )
        .unwrap();

        let queues = summarize(&snapshot, &Normalizer::default());

        assert_eq!(queues.len(), 2);
        assert_eq!(queues["q1"].idle, 2);
        assert_eq!(queues["q1"].running, 1);
        assert_eq!(queues["q1"].total(), 3);
        assert_eq!(queues["q2"].held, 1);
        assert_eq!(queues["q2"].get(JobStatus::Completed), 1);
    }

    #[test]
    fn test_summarize_skips_unknown_status() {
        let snapshot = parse_document(
            r#"[
                {"JobStatus": 17, "MATCH_APF_QUEUE": "q1"},
                {"JobStatus": "2", "MATCH_APF_QUEUE": "q1"}
            ]"#,
        )
        .unwrap();

        let queues = summarize(&snapshot, &Normalizer::default());
        assert_eq!(queues["q1"], StateCounts { running: 1, ..StateCounts::default() });
    }
}
