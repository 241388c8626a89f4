use thiserror::Error;

use crate::jobs::JobRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AgeError {
    /// The record entered its status after the snapshot was taken.
    #[error("job entered its status at {entered} but the snapshot is stamped {as_of}")]
    InvalidAge { entered: i64, as_of: i64 },
}

/// Seconds between `as_of` and the moment `record` entered its current status.
pub fn age(record: &JobRecord, as_of: i64) -> Result<u64, AgeError> {
    let entered = record.entered_current_status;
    as_of
        .checked_sub(entered)
        .and_then(|delta| u64::try_from(delta).ok())
        .ok_or(AgeError::InvalidAge { entered, as_of })
}

/// Age relative to the record's own snapshot stamp.
pub fn record_age(record: &JobRecord) -> Result<u64, AgeError> {
    age(record, record.as_of)
}
