//! `condor_q`-style job listing.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use super::{cell, render};
use crate::classify::age::record_age;
use crate::jobs::normalize::Normalizer;
use crate::jobs::{JobDetails, JobId, JobRecord, JobStatus};
use crate::snapshot::Snapshot;

pub const HEADERS: [&str; 8] = [
    "ID",
    "OWNER",
    "QDATE",
    "CMD",
    "STATUS",
    "IN_STATUS",
    "EC2AMIID",
    "QUEUE",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobRow {
    pub id: Option<JobId>,
    pub owner: Option<String>,
    pub qdate: Option<String>,
    pub cmd: Option<String>,
    pub status: char,
    /// Time in current status; only tracked for running jobs.
    pub in_status_seconds: u64,
    pub ec2_ami_id: Option<String>,
    pub queue: String,
}

impl JobRow {
    pub fn from_record(record: &JobRecord, details: JobDetails) -> Self {
        let in_status_seconds = match record.status {
            JobStatus::Running => record_age(record).unwrap_or(0),
            _ => 0,
        };
        Self {
            id: record.job_id(),
            owner: details.owner,
            qdate: record.queue_date.and_then(format_epoch),
            cmd: details.cmd,
            status: record.status.letter(),
            in_status_seconds,
            ec2_ami_id: details.ec2_ami_id,
            queue: record.queue_key.clone(),
        }
    }
}

/// One row per normalizable job, ordered by `(cluster, proc)`; jobs without
/// an id sort last.
pub fn rows(snapshot: &Snapshot, normalizer: &Normalizer) -> Vec<JobRow> {
    let mut rows: Vec<JobRow> = snapshot
        .records()
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| match normalizer.normalize(raw) {
            Ok(record) => Some(JobRow::from_record(&record, normalizer.details(raw))),
            Err(e) => {
                warn!(index, error = %e, "skipping job in listing");
                None
            }
        })
        .collect();
    rows.sort_by_key(|r| (r.id.is_none(), r.id));
    rows
}

pub fn table(rows: &[JobRow], with_headers: bool) -> String {
    let cells = rows
        .iter()
        .map(|row| {
            vec![
                cell(row.id),
                cell(row.owner.as_deref()),
                cell(row.qdate.as_deref()),
                cell(row.cmd.as_deref()),
                row.status.to_string(),
                format_duration(row.in_status_seconds),
                cell(row.ec2_ami_id.as_deref()),
                row.queue.clone(),
            ]
        })
        .collect();
    render(&HEADERS, cells, with_headers)
}

/// `D+HH:MM:SS`, as `condor_q` prints run times.
pub fn format_duration(seconds: u64) -> String {
    let days = seconds / 86_400;
    let rest = seconds % 86_400;
    let (h, m, s) = (rest / 3600, (rest % 3600) / 60, rest % 60);
    format!("{}+{:02}:{:02}:{:02}", days, h, m, s)
}

fn format_epoch(secs: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(secs, 0).map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
}
