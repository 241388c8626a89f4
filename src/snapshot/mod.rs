//! Snapshot acquisition boundary.
//!
//! A snapshot is an ordered list of raw job ads as exported by the schedd
//! (`condor_q -json` or equivalent). Querying a live scheduler is not done
//! here; sources only read an already-exported document.

pub mod json;

use serde_json::Value;
use thiserror::Error;

use crate::diagnostics::RejectedEntry;

pub use self::json::{JsonSnapshot, SnapshotPath};

/// One job ad: attribute name to value.
pub type RawRecord = serde_json::Map<String, Value>;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read snapshot from {origin}")]
    Io {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse snapshot document")]
    Parse(#[source] serde_json::Error),
}

/// An immutable, already-fetched set of job ads, plus the document entries
/// that could not be read as one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    records: Vec<RawRecord>,
    rejected: Vec<RejectedEntry>,
}

impl Snapshot {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self {
            records,
            rejected: Vec::new(),
        }
    }

    pub fn with_rejected(records: Vec<RawRecord>, rejected: Vec<RejectedEntry>) -> Self {
        Self { records, rejected }
    }

    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    pub fn rejected(&self) -> &[RejectedEntry] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Anything that can produce a snapshot.
pub trait SnapshotSource {
    /// Human-readable origin, used in logs.
    fn describe(&self) -> String;

    fn fetch(&self) -> Result<Snapshot, SnapshotError>;
}
