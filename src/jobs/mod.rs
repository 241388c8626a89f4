//! Typed job records projected out of raw scheduler snapshots.

pub mod extremum;
pub mod filter;
pub mod group;
pub mod normalize;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTCondor `JobStatus` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Unsubmitted = 0,
    Idle = 1,
    Running = 2,
    Removed = 3,
    Completed = 4,
    Held = 5,
    Error = 6,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown job status code {0}")]
pub struct UnknownStatus(pub i64);

impl JobStatus {
    pub const ALL: [JobStatus; 7] = [
        JobStatus::Unsubmitted,
        JobStatus::Idle,
        JobStatus::Running,
        JobStatus::Removed,
        JobStatus::Completed,
        JobStatus::Held,
        JobStatus::Error,
    ];

    pub fn code(self) -> i64 {
        self as i64
    }

    /// Single-letter form used by `condor_q` listings.
    pub fn letter(self) -> char {
        match self {
            JobStatus::Unsubmitted => 'U',
            JobStatus::Idle => 'I',
            JobStatus::Running => 'R',
            JobStatus::Removed => 'X',
            JobStatus::Completed => 'C',
            JobStatus::Held => 'H',
            JobStatus::Error => 'E',
        }
    }
}

impl TryFrom<i64> for JobStatus {
    type Error = UnknownStatus;

    fn try_from(code: i64) -> Result<Self, UnknownStatus> {
        JobStatus::ALL
            .into_iter()
            .find(|s| s.code() == code)
            .ok_or(UnknownStatus(code))
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Unsubmitted => write!(f, "unsub"),
            JobStatus::Idle => write!(f, "idle"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Removed => write!(f, "removed"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Held => write!(f, "held"),
            JobStatus::Error => write!(f, "error"),
        }
    }
}

/// `cluster.proc` job identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId {
    pub cluster: i64,
    pub proc: i64,
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.cluster, self.proc)
    }
}

impl Serialize for JobId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A validated job record. Timestamps are epoch seconds and never negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobRecord {
    pub status: JobStatus,
    pub queue_key: String,
    pub entered_current_status: i64,
    pub as_of: i64,
    pub cluster_id: Option<i64>,
    pub proc_id: Option<i64>,
    pub queue_date: Option<i64>,
}

/// Attributes carried only for display in job listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobDetails {
    pub owner: Option<String>,
    pub cmd: Option<String>,
    pub ec2_ami_id: Option<String>,
}

impl JobRecord {
    pub fn job_id(&self) -> Option<JobId> {
        Some(JobId {
            cluster: self.cluster_id?,
            proc: self.proc_id?,
        })
    }
}
