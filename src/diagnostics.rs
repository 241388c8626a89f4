//! Structured record of everything a run skipped or discarded.

use serde::Serialize;

use crate::jobs::normalize::NormalizeError;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    pub rejected_entries: Vec<RejectedEntry>,
    pub dropped_records: Vec<DroppedRecord>,
    pub invalid_ages: Vec<InvalidAge>,
    pub snapshot_error: Option<String>,
}

/// A snapshot document entry that could not be read as a job ad at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedEntry {
    /// Array index, or zero-based line number for JSON Lines.
    pub entry: usize,
    pub error: String,
}

/// A raw record excluded by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroppedRecord {
    /// Position of the record in the snapshot.
    pub index: usize,
    pub error: NormalizeError,
}

/// An extremum whose computed age came out negative (clock skew).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidAge {
    pub queue: String,
    pub extremum: Extremum,
    pub entered_current_status: i64,
    pub as_of: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Extremum {
    NewestRunning,
    OldestIdle,
}

impl std::fmt::Display for Extremum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Extremum::NewestRunning => write!(f, "newest running"),
            Extremum::OldestIdle => write!(f, "oldest idle"),
        }
    }
}

impl Diagnostics {
    pub fn record_dropped(&mut self, index: usize, error: NormalizeError) {
        self.dropped_records.push(DroppedRecord { index, error });
    }

    pub fn is_clean(&self) -> bool {
        self.rejected_entries.is_empty()
            && self.dropped_records.is_empty()
            && self.invalid_ages.is_empty()
            && self.snapshot_error.is_none()
    }
}
