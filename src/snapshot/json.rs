//! JSON snapshot documents read from a file or stdin.
//!
//! Two layouts are accepted: a single JSON array of job ads (what
//! `condor_q -json` prints) or JSON Lines with one ad per line.

use std::io::Read;
use std::path::PathBuf;

use serde_json::Value;
use tracing::{debug, warn};

use super::{RawRecord, Snapshot, SnapshotError, SnapshotSource};
use crate::diagnostics::RejectedEntry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotPath {
    Stdin,
    File(PathBuf),
}

impl SnapshotPath {
    /// `-` means stdin; anything else is a file path.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            SnapshotPath::Stdin
        } else {
            SnapshotPath::File(PathBuf::from(arg))
        }
    }
}

impl std::fmt::Display for SnapshotPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotPath::Stdin => write!(f, "<stdin>"),
            SnapshotPath::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JsonSnapshot {
    path: SnapshotPath,
}

impl JsonSnapshot {
    pub fn new(path: SnapshotPath) -> Self {
        Self { path }
    }

    fn read_document(&self) -> Result<String, SnapshotError> {
        let io_err = |source: std::io::Error| SnapshotError::Io {
            origin: self.path.to_string(),
            source,
        };
        match &self.path {
            SnapshotPath::Stdin => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf).map_err(io_err)?;
                Ok(buf)
            }
            SnapshotPath::File(path) => std::fs::read_to_string(path).map_err(io_err),
        }
    }
}

impl SnapshotSource for JsonSnapshot {
    fn describe(&self) -> String {
        self.path.to_string()
    }

    fn fetch(&self) -> Result<Snapshot, SnapshotError> {
        let document = self.read_document()?;
        let snapshot = parse_document(&document)?;
        debug!(
            origin = %self.path,
            records = snapshot.len(),
            rejected = snapshot.rejected().len(),
            "read snapshot"
        );
        Ok(snapshot)
    }
}

/// Parse a snapshot document in either accepted layout.
///
/// Only a document that cannot be read as a whole is an error. A JSON Lines
/// line that fails to parse, or an entry that is not an object, is rejected
/// on its own and the rest of the document is kept.
pub fn parse_document(document: &str) -> Result<Snapshot, SnapshotError> {
    let trimmed = document.trim_start();
    if trimmed.is_empty() {
        return Ok(Snapshot::default());
    }

    let mut records = Vec::new();
    let mut rejected = Vec::new();

    if trimmed.starts_with('[') {
        let entries: Vec<Value> = serde_json::from_str(trimmed).map_err(SnapshotError::Parse)?;
        for (entry, value) in entries.into_iter().enumerate() {
            match into_record(value) {
                Ok(record) => records.push(record),
                Err(error) => reject(&mut rejected, entry, error),
            }
        }
    } else {
        for (entry, line) in document.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let parsed = serde_json::from_str::<Value>(line).map_err(|e| e.to_string());
            match parsed.and_then(into_record) {
                Ok(record) => records.push(record),
                Err(error) => reject(&mut rejected, entry, error),
            }
        }
    }

    Ok(Snapshot::with_rejected(records, rejected))
}

fn into_record(value: Value) -> Result<RawRecord, String> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(format!("expected a JSON object, found {}", kind(&other))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn reject(rejected: &mut Vec<RejectedEntry>, entry: usize, error: String) {
    warn!(entry, error = %error, "rejecting snapshot entry");
    rejected.push(RejectedEntry { entry, error });
}
